use mimeprobe_contract::{ArgumentError, ArgumentFailure};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("address groups nested deeper than {limit}")]
    GroupTooDeep { limit: usize },
    #[error("expected a single {expected} but found {found}")]
    UnexpectedCount { expected: &'static str, found: usize },
}

impl ParseError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}

impl ArgumentFailure for ParseError {
    fn argument_error(&self) -> Option<&ArgumentError> {
        match self {
            Self::Argument(error) => Some(error),
            _ => None,
        }
    }
}
