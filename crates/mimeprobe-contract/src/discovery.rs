//! Registration table and discovery of parsing entry points.
//!
//! Types publish their entry points as a [`TypeSurface`]: a name, declared
//! parameter metadata, and a uniform invoke function. Discovery filters the
//! surface down to the parsing convention and classifies every parameter into
//! a [`RoleKind`]. A parameter that cannot be classified fails discovery for
//! the whole type.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::invoke::InvocationError;
use crate::synthesis::ArgValue;

pub const PARSE_ENTRY_POINT_PREFIX: &str = "parse";
pub const START_INDEX_PARAMETER: &str = "start_index";
pub const LENGTH_PARAMETER: &str = "length";

/// Declared type of an entry point parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Options,
    Bytes,
    Text,
    Int,
}

impl ParameterType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Options => "options",
            Self::Bytes => "bytes",
            Self::Text => "text",
            Self::Int => "int",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub ty: ParameterType,
}

impl ParameterInfo {
    pub const fn new(name: &'static str, ty: ParameterType) -> Self {
        Self { name, ty }
    }
}

type EntryPointFn<O> = Box<dyn Fn(&[ArgValue<O>]) -> Result<(), InvocationError> + Send + Sync>;

/// One registered public operation of a type.
pub struct EntryPoint<O> {
    pub name: &'static str,
    pub parameters: Vec<ParameterInfo>,
    invoke: EntryPointFn<O>,
}

impl<O> EntryPoint<O> {
    pub fn new<F>(name: &'static str, parameters: Vec<ParameterInfo>, invoke: F) -> Self
    where
        F: Fn(&[ArgValue<O>]) -> Result<(), InvocationError> + Send + Sync + 'static,
    {
        Self {
            name,
            parameters,
            invoke: Box::new(invoke),
        }
    }

    /// Calls the operation with a positional argument list of any arity.
    pub fn call(&self, args: &[ArgValue<O>]) -> Result<(), InvocationError> {
        if args.len() != self.parameters.len() {
            return Err(InvocationError::Signature {
                position: args.len().min(self.parameters.len()),
                expected: "matching arity",
                received: "wrong argument count",
            });
        }
        (self.invoke)(args)
    }
}

impl<O> fmt::Debug for EntryPoint<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Registration table entry mapping a type to its public operations.
#[derive(Debug)]
pub struct TypeSurface<O> {
    pub type_name: &'static str,
    pub entry_points: Vec<EntryPoint<O>>,
}

impl<O> TypeSurface<O> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            entry_points: Vec::new(),
        }
    }

    pub fn with_entry_point(mut self, entry_point: EntryPoint<O>) -> Self {
        self.entry_points.push(entry_point);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Options,
    Buffer,
    StartIndex,
    Length,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Options => "options",
            Self::Buffer => "buffer",
            Self::StartIndex => "start_index",
            Self::Length => "length",
        }
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, Self::Options | Self::Buffer)
    }

    pub fn is_bounded(self) -> bool {
        matches!(self, Self::StartIndex | Self::Length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterRole {
    pub kind: RoleKind,
    /// Declared parameter name; also the identity an argument failure must carry.
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BufferKind {
    Binary,
    Textual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub type_name: &'static str,
    pub name: &'static str,
    /// Position of the entry point in its [`TypeSurface`].
    pub index: usize,
    pub roles: Vec<ParameterRole>,
    pub buffer_kind: BufferKind,
}

impl OperationDescriptor {
    pub fn role(&self, kind: RoleKind) -> Option<&ParameterRole> {
        self.roles.iter().find(|role| role.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("type '{type_name}' registers no parse entry points")]
    NoEntryPoints { type_name: String },
    #[error("unknown parameter '{parameter}' for {type_name}.{operation}")]
    UnknownParameter {
        type_name: String,
        operation: String,
        parameter: String,
    },
    #[error("{type_name}.{operation} has no byte or text buffer parameter")]
    MissingBuffer {
        type_name: String,
        operation: String,
    },
    #[error(
        "{type_name}.{operation} parameter '{parameter}' must be {expected} but is declared {found}"
    )]
    UnexpectedParameterType {
        type_name: String,
        operation: String,
        parameter: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{type_name}.{operation} declares role '{role}' more than once")]
    DuplicateRole {
        type_name: String,
        operation: String,
        role: &'static str,
    },
}

pub fn is_parse_entry_point(name: &str) -> bool {
    name == PARSE_ENTRY_POINT_PREFIX
        || name
            .strip_prefix(PARSE_ENTRY_POINT_PREFIX)
            .is_some_and(|rest| rest.starts_with('_'))
}

/// Discovers and classifies every parsing entry point of `surface`.
pub fn discover_operations<O>(
    surface: &TypeSurface<O>,
) -> Result<Vec<OperationDescriptor>, DiscoveryError> {
    let mut descriptors = Vec::new();
    for (index, entry_point) in surface.entry_points.iter().enumerate() {
        if !is_parse_entry_point(entry_point.name) {
            continue;
        }
        descriptors.push(describe_entry_point(
            surface.type_name,
            index,
            entry_point,
        )?);
    }
    if descriptors.is_empty() {
        return Err(DiscoveryError::NoEntryPoints {
            type_name: surface.type_name.to_string(),
        });
    }
    Ok(descriptors)
}

fn describe_entry_point<O>(
    type_name: &'static str,
    index: usize,
    entry_point: &EntryPoint<O>,
) -> Result<OperationDescriptor, DiscoveryError> {
    let operation = entry_point.name;
    let parameters = &entry_point.parameters;
    let mut roles = Vec::with_capacity(parameters.len());
    let mut position = 0;

    if parameters
        .first()
        .is_some_and(|parameter| parameter.ty == ParameterType::Options)
    {
        roles.push(ParameterRole {
            kind: RoleKind::Options,
            name: parameters[0].name,
        });
        position = 1;
    }

    let Some(buffer) = parameters.get(position) else {
        return Err(DiscoveryError::MissingBuffer {
            type_name: type_name.to_string(),
            operation: operation.to_string(),
        });
    };
    let buffer_kind = match buffer.ty {
        ParameterType::Bytes => BufferKind::Binary,
        ParameterType::Text => BufferKind::Textual,
        ParameterType::Options | ParameterType::Int => {
            return Err(DiscoveryError::MissingBuffer {
                type_name: type_name.to_string(),
                operation: operation.to_string(),
            });
        }
    };
    roles.push(ParameterRole {
        kind: RoleKind::Buffer,
        name: buffer.name,
    });

    for parameter in &parameters[position + 1..] {
        let kind = match parameter.name {
            START_INDEX_PARAMETER => RoleKind::StartIndex,
            LENGTH_PARAMETER => RoleKind::Length,
            unknown => {
                return Err(DiscoveryError::UnknownParameter {
                    type_name: type_name.to_string(),
                    operation: operation.to_string(),
                    parameter: unknown.to_string(),
                });
            }
        };
        if parameter.ty != ParameterType::Int {
            return Err(DiscoveryError::UnexpectedParameterType {
                type_name: type_name.to_string(),
                operation: operation.to_string(),
                parameter: parameter.name.to_string(),
                expected: ParameterType::Int.as_str(),
                found: parameter.ty.as_str(),
            });
        }
        if roles.iter().any(|role| role.kind == kind) {
            return Err(DiscoveryError::DuplicateRole {
                type_name: type_name.to_string(),
                operation: operation.to_string(),
                role: kind.as_str(),
            });
        }
        roles.push(ParameterRole {
            kind,
            name: parameter.name,
        });
    }

    Ok(OperationDescriptor {
        type_name,
        name: operation,
        index,
        roles,
        buffer_kind,
    })
}
