//! Definition of errors.

use core::fmt;

use alloc::string::String;

#[cfg(feature = "std")]
use std::error::Error;

pub type Result<T, E = TaggerError> = core::result::Result<T, E>;

/// Errors raised at the textual surface of the tagger.
///
/// Estimation and decoding never fail; degenerate inputs produce empty tables or empty
/// predictions instead.
#[derive(Debug)]
pub enum TaggerError {
    InvalidArgument(InvalidArgumentError),
}

impl TaggerError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

impl fmt::Display for TaggerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "std")]
impl Error for TaggerError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

#[cfg(feature = "std")]
impl Error for InvalidArgumentError {}
