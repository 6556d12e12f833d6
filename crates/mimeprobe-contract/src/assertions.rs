use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::argument::ArgumentErrorKind;
use crate::invoke::Observation;

/// Failure a boundary probe must provoke.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectedFailure {
    pub kind: ArgumentErrorKind,
    pub parameter: String,
}

impl ExpectedFailure {
    pub fn missing(parameter: impl Into<String>) -> Self {
        Self {
            kind: ArgumentErrorKind::MissingReference,
            parameter: parameter.into(),
        }
    }

    pub fn out_of_range(parameter: impl Into<String>) -> Self {
        Self {
            kind: ArgumentErrorKind::OutOfRange,
            parameter: parameter.into(),
        }
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        match observation {
            Observation::Argument { kind, parameter } => {
                *kind == self.kind && parameter == &self.parameter
            }
            _ => false,
        }
    }
}

impl fmt::Display for ExpectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure on '{}'", self.kind, self.parameter)
    }
}

/// Identity of a single probe: concrete type, operation and boundary case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeCase {
    pub type_name: String,
    pub operation: String,
    pub case: String,
}

impl ProbeCase {
    pub fn new(
        type_name: impl Into<String>,
        operation: impl Into<String>,
        case: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            operation: operation.into(),
            case: case.into(),
        }
    }
}

impl fmt::Display for ProbeCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} [{}]", self.type_name, self.operation, self.case)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("{probe} expected {expected} but observed {observed}")]
    UnexpectedOutcome {
        probe: ProbeCase,
        expected: ExpectedFailure,
        observed: Observation,
    },
    #[error("{probe} rejected a valid argument list with {observed}")]
    RejectedValidArguments {
        probe: ProbeCase,
        observed: Observation,
    },
}

impl ContractViolation {
    pub fn probe(&self) -> &ProbeCase {
        match self {
            Self::UnexpectedOutcome { probe, .. } | Self::RejectedValidArguments { probe, .. } => {
                probe
            }
        }
    }
}

pub fn assert_expected_failure(
    probe: &ProbeCase,
    expected: &ExpectedFailure,
    observed: &Observation,
) -> Result<(), ContractViolation> {
    if expected.matches(observed) {
        return Ok(());
    }
    Err(ContractViolation::UnexpectedOutcome {
        probe: probe.clone(),
        expected: expected.clone(),
        observed: observed.clone(),
    })
}

/// A valid argument list may still fail for content reasons, never for argument reasons.
pub fn assert_no_argument_failure(
    probe: &ProbeCase,
    observed: &Observation,
) -> Result<(), ContractViolation> {
    match observed {
        Observation::Argument { .. } | Observation::Panicked { .. } => {
            Err(ContractViolation::RejectedValidArguments {
                probe: probe.clone(),
                observed: observed.clone(),
            })
        }
        Observation::Completed | Observation::Failed { .. } => Ok(()),
    }
}
