use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes an operation may raise for a bad argument.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentErrorKind {
    MissingReference,
    OutOfRange,
}

impl ArgumentErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingReference => "missing_reference",
            Self::OutOfRange => "out_of_range",
        }
    }
}

impl fmt::Display for ArgumentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument validation failure raised by an operation under test.
///
/// Carries the name of the offending parameter so callers can tell exactly
/// which argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("argument '{parameter}' cannot be null")]
    Missing { parameter: String },
    #[error("argument '{parameter}' is out of range: {reason}")]
    OutOfRange { parameter: String, reason: String },
}

impl ArgumentError {
    pub fn missing(parameter: impl Into<String>) -> Self {
        Self::Missing {
            parameter: parameter.into(),
        }
    }

    pub fn out_of_range(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ArgumentErrorKind {
        match self {
            Self::Missing { .. } => ArgumentErrorKind::MissingReference,
            Self::OutOfRange { .. } => ArgumentErrorKind::OutOfRange,
        }
    }

    pub fn parameter(&self) -> &str {
        match self {
            Self::Missing { parameter } | Self::OutOfRange { parameter, .. } => parameter,
        }
    }

    /// Wraps the error in an `io::Error` the way stream operations report it.
    pub fn into_io(self) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, self)
    }
}

impl From<ArgumentError> for std::io::Error {
    fn from(error: ArgumentError) -> Self {
        error.into_io()
    }
}

/// A failure value that may carry an [`ArgumentError`] at most one level deep.
pub trait ArgumentFailure: std::error::Error {
    fn argument_error(&self) -> Option<&ArgumentError>;

    /// True for values that only wrap another failure. An envelope never
    /// looks through a nested envelope.
    fn is_envelope(&self) -> bool {
        false
    }
}

impl ArgumentFailure for ArgumentError {
    fn argument_error(&self) -> Option<&ArgumentError> {
        Some(self)
    }
}

impl ArgumentFailure for std::io::Error {
    fn argument_error(&self) -> Option<&ArgumentError> {
        self.get_ref()
            .and_then(|inner| inner.downcast_ref::<ArgumentError>())
    }

    fn is_envelope(&self) -> bool {
        true
    }
}
