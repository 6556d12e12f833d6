//! Argument synthesis for boundary probes.
//!
//! A probe holds every argument valid except exactly one. The base list is
//! built from the probe payloads; each variant perturbs a single nullable or
//! bounded role.

use std::fmt;

use crate::assertions::ExpectedFailure;
use crate::config::ProbeConfig;
use crate::discovery::{BufferKind, OperationDescriptor, ParameterRole, RoleKind};
use crate::invoke::InvocationError;

/// Positional argument passed through an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue<O> {
    Options(Option<O>),
    Bytes(Option<Vec<u8>>),
    Text(Option<String>),
    Int(i32),
}

impl<O> ArgValue<O> {
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Options(_) => "options",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Int(_) => "int",
        }
    }

    fn absent(&self) -> Option<Self> {
        match self {
            Self::Options(_) => Some(Self::Options(None)),
            Self::Bytes(_) => Some(Self::Bytes(None)),
            Self::Text(_) => Some(Self::Text(None)),
            Self::Int(_) => None,
        }
    }
}

fn signature_error<O>(
    position: usize,
    expected: &'static str,
    received: Option<&ArgValue<O>>,
) -> InvocationError {
    InvocationError::Signature {
        position,
        expected,
        received: received.map_or("nothing", ArgValue::type_label),
    }
}

pub fn options_arg<O>(
    args: &[ArgValue<O>],
    position: usize,
) -> Result<Option<&O>, InvocationError> {
    match args.get(position) {
        Some(ArgValue::Options(value)) => Ok(value.as_ref()),
        other => Err(signature_error(position, "options", other)),
    }
}

pub fn bytes_arg<O>(
    args: &[ArgValue<O>],
    position: usize,
) -> Result<Option<&[u8]>, InvocationError> {
    match args.get(position) {
        Some(ArgValue::Bytes(value)) => Ok(value.as_deref()),
        other => Err(signature_error(position, "bytes", other)),
    }
}

pub fn text_arg<O>(
    args: &[ArgValue<O>],
    position: usize,
) -> Result<Option<&str>, InvocationError> {
    match args.get(position) {
        Some(ArgValue::Text(value)) => Ok(value.as_deref()),
        other => Err(signature_error(position, "text", other)),
    }
}

pub fn int_arg<O>(args: &[ArgValue<O>], position: usize) -> Result<i32, InvocationError> {
    match args.get(position) {
        Some(ArgValue::Int(value)) => Ok(*value),
        other => Err(signature_error(position, "int", other)),
    }
}

/// Baseline buffers every probe starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePayloads {
    pub binary: Vec<u8>,
    pub text: String,
}

impl ProbePayloads {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            binary: vec![0; config.binary_payload_len],
            text: config.text_payload.clone(),
        }
    }

    /// Payload length N in bytes. Config validation keeps the text payload
    /// ASCII, so this is also its character count.
    pub fn len_for(&self, kind: BufferKind) -> usize {
        match kind {
            BufferKind::Binary => self.binary.len(),
            BufferKind::Textual => self.text.len(),
        }
    }
}

impl Default for ProbePayloads {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCase {
    MissingReference,
    BelowLowerBound,
    AboveUpperBound,
}

impl BoundaryCase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingReference => "missing_reference",
            Self::BelowLowerBound => "below_lower_bound",
            Self::AboveUpperBound => "above_upper_bound",
        }
    }
}

impl fmt::Display for BoundaryCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryVariant<O> {
    pub role: ParameterRole,
    pub case: BoundaryCase,
    /// Human-readable perturbation, e.g. `start_index = -1`.
    pub label: String,
    pub args: Vec<ArgValue<O>>,
    pub expected: ExpectedFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedProbe<O> {
    pub base: Vec<ArgValue<O>>,
    pub variants: Vec<BoundaryVariant<O>>,
}

/// Builds the valid argument list and its boundary variants for `descriptor`.
pub fn synthesize<O>(
    descriptor: &OperationDescriptor,
    payloads: &ProbePayloads,
) -> SynthesizedProbe<O>
where
    O: Default + Clone,
{
    let payload_len = payloads.len_for(descriptor.buffer_kind);
    let base = descriptor
        .roles
        .iter()
        .map(|role| match role.kind {
            RoleKind::Options => ArgValue::Options(Some(O::default())),
            RoleKind::Buffer => match descriptor.buffer_kind {
                BufferKind::Binary => ArgValue::Bytes(Some(payloads.binary.clone())),
                BufferKind::Textual => ArgValue::Text(Some(payloads.text.clone())),
            },
            RoleKind::StartIndex => ArgValue::Int(0),
            RoleKind::Length => ArgValue::Int(clamp_to_i32(payload_len)),
        })
        .collect::<Vec<_>>();

    let mut variants = Vec::new();
    for (position, role) in descriptor.roles.iter().enumerate() {
        if role.kind.is_nullable() {
            if let Some(absent) = base[position].absent() {
                let mut args = base.clone();
                args[position] = absent;
                variants.push(BoundaryVariant {
                    role: *role,
                    case: BoundaryCase::MissingReference,
                    label: format!("{} = null", role.name),
                    args,
                    expected: ExpectedFailure::missing(role.name),
                });
            }
        }
        if role.kind.is_bounded() {
            let above = clamp_to_i32(payload_len.saturating_add(1));
            for (case, value) in [
                (BoundaryCase::BelowLowerBound, -1),
                (BoundaryCase::AboveUpperBound, above),
            ] {
                let mut args = base.clone();
                args[position] = ArgValue::Int(value);
                variants.push(BoundaryVariant {
                    role: *role,
                    case,
                    label: format!("{} = {}", role.name, value),
                    args,
                    expected: ExpectedFailure::out_of_range(role.name),
                });
            }
        }
    }

    SynthesizedProbe { base, variants }
}

/// Names of the (buffer, index, count) triple shared by filters and streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeParameterNames {
    pub buffer: &'static str,
    pub start: &'static str,
    pub length: &'static str,
}

pub const FILTER_RANGE_PARAMETERS: RangeParameterNames = RangeParameterNames {
    buffer: "buffer",
    start: "start_index",
    length: "length",
};

pub const STREAM_RANGE_PARAMETERS: RangeParameterNames = RangeParameterNames {
    buffer: "buffer",
    start: "offset",
    length: "count",
};

/// One fixed-shape probe of a (buffer, start, length) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeVariant {
    pub case: BoundaryCase,
    pub label: String,
    pub buffer_present: bool,
    pub start: i32,
    pub length: i32,
    pub expected: ExpectedFailure,
}

/// The five fixed-shape boundary probes for a buffer of `buffer_len` bytes.
pub fn range_variants(names: RangeParameterNames, buffer_len: usize) -> Vec<RangeVariant> {
    let above = clamp_to_i32(buffer_len.saturating_add(1));
    let bounded =
        |name: &'static str, case: BoundaryCase, value: i32, on_start: bool| RangeVariant {
            case,
            label: format!("{name} = {value}"),
            buffer_present: true,
            start: if on_start { value } else { 0 },
            length: if on_start { 0 } else { value },
            expected: ExpectedFailure::out_of_range(name),
        };
    vec![
        RangeVariant {
            case: BoundaryCase::MissingReference,
            label: format!("{} = null", names.buffer),
            buffer_present: false,
            start: 0,
            length: 0,
            expected: ExpectedFailure::missing(names.buffer),
        },
        bounded(names.start, BoundaryCase::BelowLowerBound, -1, true),
        bounded(names.start, BoundaryCase::AboveUpperBound, above, true),
        bounded(names.length, BoundaryCase::BelowLowerBound, -1, false),
        bounded(names.length, BoundaryCase::AboveUpperBound, above, false),
    ]
}

fn clamp_to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        bytes_arg, int_arg, options_arg, range_variants, synthesize, text_arg, ArgValue,
        BoundaryCase, ProbePayloads, FILTER_RANGE_PARAMETERS, STREAM_RANGE_PARAMETERS,
    };
    use crate::argument::ArgumentErrorKind;
    use crate::discovery::{BufferKind, OperationDescriptor, ParameterRole, RoleKind};

    fn descriptor(
        roles: &[(RoleKind, &'static str)],
        buffer_kind: BufferKind,
    ) -> OperationDescriptor {
        OperationDescriptor {
            type_name: "Sample",
            name: "parse",
            index: 0,
            roles: roles
                .iter()
                .map(|(kind, name)| ParameterRole {
                    kind: *kind,
                    name: *name,
                })
                .collect(),
            buffer_kind,
        }
    }

    #[test]
    fn unit_default_payloads_match_probe_baselines() {
        let payloads = ProbePayloads::default();
        assert_eq!(payloads.binary.len(), 1024);
        assert_eq!(payloads.text, "this is a dummy text buffer");
        assert_eq!(payloads.len_for(BufferKind::Textual), 27);
    }

    #[test]
    fn functional_synthesize_builds_valid_base_and_linear_variants() {
        let descriptor = descriptor(
            &[
                (RoleKind::Options, "options"),
                (RoleKind::Buffer, "buffer"),
                (RoleKind::StartIndex, "start_index"),
                (RoleKind::Length, "length"),
            ],
            BufferKind::Binary,
        );
        let probe = synthesize::<String>(&descriptor, &ProbePayloads::default());

        assert_eq!(probe.base.len(), 4);
        assert_eq!(probe.base[0], ArgValue::Options(Some(String::new())));
        assert_eq!(probe.base[1], ArgValue::Bytes(Some(vec![0; 1024])));
        assert_eq!(probe.base[2], ArgValue::Int(0));
        assert_eq!(probe.base[3], ArgValue::Int(1024));

        let labels = probe
            .variants
            .iter()
            .map(|variant| variant.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                "options = null",
                "buffer = null",
                "start_index = -1",
                "start_index = 1025",
                "length = -1",
                "length = 1025",
            ]
        );
        for variant in &probe.variants {
            let perturbed = variant
                .args
                .iter()
                .zip(&probe.base)
                .filter(|(left, right)| left != right)
                .count();
            assert_eq!(perturbed, 1, "variant {} must perturb one argument", variant.label);
            assert_eq!(variant.expected.parameter, variant.role.name);
        }
        assert_eq!(
            probe.variants[0].expected.kind,
            ArgumentErrorKind::MissingReference
        );
        assert_eq!(probe.variants[5].expected.kind, ArgumentErrorKind::OutOfRange);
    }

    #[test]
    fn functional_synthesize_uses_text_length_for_textual_buffers() {
        let descriptor = descriptor(
            &[(RoleKind::Buffer, "text"), (RoleKind::StartIndex, "start_index")],
            BufferKind::Textual,
        );
        let probe = synthesize::<()>(&descriptor, &ProbePayloads::default());
        assert_eq!(
            probe.base[0],
            ArgValue::Text(Some("this is a dummy text buffer".to_string()))
        );
        assert_eq!(probe.variants.len(), 3);
        assert_eq!(probe.variants[0].label, "text = null");
        assert_eq!(probe.variants[2].args[1], ArgValue::Int(28));
        assert_eq!(probe.variants[2].case, BoundaryCase::AboveUpperBound);
    }

    #[test]
    fn unit_range_variants_cover_the_five_fixed_cases() {
        let variants = range_variants(FILTER_RANGE_PARAMETERS, 1024);
        let shapes = variants
            .iter()
            .map(|variant| {
                (
                    variant.buffer_present,
                    variant.start,
                    variant.length,
                    variant.expected.parameter.as_str(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            shapes,
            vec![
                (false, 0, 0, "buffer"),
                (true, -1, 0, "start_index"),
                (true, 1025, 0, "start_index"),
                (true, 0, -1, "length"),
                (true, 0, 1025, "length"),
            ]
        );

        let stream = range_variants(STREAM_RANGE_PARAMETERS, 16);
        assert_eq!(stream[2].label, "offset = 17");
        assert_eq!(stream[4].label, "count = 17");
    }

    #[test]
    fn regression_argument_accessors_reject_mismatched_types() {
        let args: Vec<ArgValue<()>> = vec![ArgValue::Int(3), ArgValue::Bytes(None)];
        assert_eq!(int_arg(&args, 0).expect("int"), 3);
        assert_eq!(bytes_arg(&args, 1).expect("bytes"), None);
        assert!(text_arg(&args, 0).is_err());
        assert!(options_arg(&args, 1).is_err());
        assert!(int_arg(&args, 5).is_err());
    }
}
