#![warn(missing_docs)]
//! PARAX specific error structures
use std::{error::Error, fmt::Display};

/// PARAX application specific Result type
pub type ParaxResult<T> = std::result::Result<T, ParaxError>;

/// Errors that can be returned by various PARAX functions.
#[derive(Debug, PartialEq, Eq)]
pub enum ParaxError {
    /// malformed or out-of-domain input (e.g. negative diameter, non-finite radius)
    InvalidArgument(String),
    /// mathematically undefined configuration (e.g. zero focal length or radius of curvature)
    Domain(String),
    /// a ray trace was attempted on a system without any elements
    EmptySystem(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for ParaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(m) => {
                write!(f, "InvalidArgument:{m}")
            }
            Self::Domain(m) => {
                write!(f, "Domain:{m}")
            }
            Self::EmptySystem(m) => {
                write!(f, "EmptySystem:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "Parax Error:Other:{m}"),
        }
    }
}
impl Error for ParaxError {}

impl std::convert::From<String> for ParaxError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
