use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Lit, LitStr, Meta, Type};

/// Derive CSV column metadata for a dataset row struct.
///
/// Each named field becomes one `CsvField`:
/// - `name`: the serde `rename` if present, else the field name
/// - `aliases`: every serde `alias`, so alternative headers can be documented
/// - `required`: false for `Option<T>` fields and fields with `#[serde(default)]`
/// - `description`: the field's doc comment
///
/// Generates `csv_schema() -> &'static [CsvField]` and `csv_header() -> String`.
/// `CsvField` is resolved as `crate::core::CsvField`.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvSchema requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvSchema can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let entries = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let serde = SerdeField::parse(&field.attrs);
        if serde.skip {
            return None;
        }
        let column = serde.rename.unwrap_or_else(|| ident.to_string());
        let aliases = serde.aliases;
        let required = !serde.default && !is_option(&field.ty);
        let description = doc_comment(&field.attrs);
        Some(quote! {
            crate::core::CsvField {
                name: #column,
                aliases: &[#(#aliases),*],
                required: #required,
                description: #description,
            }
        })
    });

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [crate::core::CsvField] {
                static SCHEMA: &[crate::core::CsvField] = &[#(#entries),*];
                SCHEMA
            }

            pub fn csv_header() -> String {
                Self::csv_schema()
                    .iter()
                    .map(|f| f.name)
                    .collect::<Vec<_>>()
                    .join(",")
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    aliases: Vec<String>,
    default: bool,
    skip: bool,
}

impl SerdeField {
    fn parse(attrs: &[Attribute]) -> Self {
        let mut field = SerdeField::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            // Unsupported serde forms are ignored; serde itself reports them.
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    field.rename = Some(value.value());
                } else if meta.path.is_ident("alias") {
                    let value: LitStr = meta.value()?.parse()?;
                    field.aliases.push(value.value());
                } else if meta.path.is_ident("default") {
                    field.default = true;
                    if meta.input.peek(syn::Token![=]) {
                        let _: LitStr = meta.value()?.parse()?;
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                    field.skip = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: Expr = meta.value()?.parse()?;
                }
                Ok(())
            });
        }
        field
    }
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
