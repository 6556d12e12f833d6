//! Uniform invocation of operations under test and failure normalization.
//!
//! Every suite funnels its calls through [`invoke`], so filter, stream and
//! discovered parser probes share one observation shape and one assertion path.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::argument::{ArgumentError, ArgumentErrorKind, ArgumentFailure};

/// What happened when a probe invoked its target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Observation {
    Completed,
    Argument {
        kind: ArgumentErrorKind,
        parameter: String,
    },
    Failed {
        description: String,
    },
    Panicked {
        message: String,
    },
}

impl Observation {
    pub fn from_argument_error(error: &ArgumentError) -> Self {
        Self::Argument {
            kind: error.kind(),
            parameter: error.parameter().to_string(),
        }
    }

    pub fn is_argument_failure(&self) -> bool {
        matches!(self, Self::Argument { .. })
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("no failure"),
            Self::Argument { kind, parameter } => {
                write!(f, "{kind} failure on '{parameter}'")
            }
            Self::Failed { description } => write!(f, "non-argument failure ({description})"),
            Self::Panicked { message } => write!(f, "panic ({message})"),
        }
    }
}

/// Envelope produced when an operation is called through a registered entry point.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("target operation failed: {0}")]
    Target(Box<dyn ArgumentFailure + Send + Sync>),
    #[error("argument {position} expected {expected} but received {received}")]
    Signature {
        position: usize,
        expected: &'static str,
        received: &'static str,
    },
}

impl InvocationError {
    pub fn target<E>(error: E) -> Self
    where
        E: ArgumentFailure + Send + Sync + 'static,
    {
        Self::Target(Box::new(error))
    }
}

impl ArgumentFailure for InvocationError {
    fn argument_error(&self) -> Option<&ArgumentError> {
        match self {
            Self::Target(inner) if inner.is_envelope() => None,
            Self::Target(inner) => inner.argument_error(),
            Self::Signature { .. } => None,
        }
    }

    fn is_envelope(&self) -> bool {
        true
    }
}

/// Calls `call` once and reduces its outcome to an [`Observation`].
///
/// Panics are caught and reported instead of unwinding through the suite.
pub fn invoke<T, E, F>(call: F) -> Observation
where
    F: FnOnce() -> Result<T, E>,
    E: ArgumentFailure,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(_)) => Observation::Completed,
        Ok(Err(error)) => normalize_failure(&error),
        Err(payload) => Observation::Panicked {
            message: panic_message(payload.as_ref()),
        },
    }
}

/// Unwraps one level of envelope and keeps only kind and parameter identity.
pub fn normalize_failure<E>(error: &E) -> Observation
where
    E: ArgumentFailure + ?Sized,
{
    match error.argument_error() {
        Some(argument) => Observation::from_argument_error(argument),
        None => Observation::Failed {
            description: error.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}
