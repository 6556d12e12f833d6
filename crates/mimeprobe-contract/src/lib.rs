//! Argument contract verification for filters, streams and parsers.
//!
//! Probes operations with boundary-violating arguments and checks that each
//! one fails early with the right failure kind and names the offending
//! parameter. Filter and stream probes use fixed shapes; parser entry points
//! are discovered from a registration table and their argument lists are
//! synthesized per descriptor.

pub mod argument;
pub mod assertions;
pub mod config;
pub mod discovery;
pub mod filter_suite;
pub mod invoke;
pub mod parse_suite;
pub mod report;
pub mod stream_suite;
pub mod synthesis;

pub use argument::{ArgumentError, ArgumentErrorKind, ArgumentFailure};
pub use assertions::{
    assert_expected_failure, assert_no_argument_failure, ContractViolation, ExpectedFailure,
    ProbeCase,
};
pub use config::{load_probe_config, parse_probe_config, validate_probe_config, ProbeConfig};
pub use discovery::{
    discover_operations, is_parse_entry_point, BufferKind, DiscoveryError, EntryPoint,
    OperationDescriptor, ParameterInfo, ParameterRole, ParameterType, RoleKind, TypeSurface,
};
pub use filter_suite::{
    run_filter_contract, run_filter_contracts, FilterOperation, FilterOutput, MimeFilter,
};
pub use invoke::{invoke, normalize_failure, InvocationError, Observation};
pub use parse_suite::{run_parse_contract, run_parse_contracts};
pub use report::{render_report_text, CheckOutcome, CheckStatus, ContractReport, ContractSummary};
pub use stream_suite::{run_stream_contract, run_stream_contracts, MimeStream, SeekOrigin};
pub use synthesis::{
    bytes_arg, int_arg, options_arg, synthesize, text_arg, ArgValue, BoundaryCase,
    BoundaryVariant, ProbePayloads, SynthesizedProbe,
};
