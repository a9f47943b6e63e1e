#![warn(missing_docs)]
//! Various helper functions and macros
pub mod uom_macros;
