//! Corporate income tax projection with fixed asset depreciation.
//!
//! [`core`] holds the calculation library; [`cmd`] the command line front end.

pub mod cmd;
pub mod core;
