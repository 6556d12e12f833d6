//! Argument contract for discovered parsing entry points.

use crate::assertions::{assert_expected_failure, assert_no_argument_failure, ProbeCase};
use crate::config::ProbeConfig;
use crate::discovery::{discover_operations, TypeSurface};
use crate::invoke::invoke;
use crate::report::ContractReport;
use crate::synthesis::{synthesize, ProbePayloads};

pub const VALID_ARGUMENTS_CASE: &str = "valid arguments";

/// Discovers, synthesizes and probes every parsing entry point of one type.
///
/// A discovery failure is recorded as fatal for this type; no entry point of
/// the type is probed afterwards.
#[tracing::instrument(level = "debug", skip_all, fields(type_name = surface.type_name))]
pub fn run_parse_contract<O>(surface: &TypeSurface<O>, config: &ProbeConfig) -> ContractReport
where
    O: Default + Clone,
{
    let mut report = ContractReport::default();
    let descriptors = match discover_operations(surface) {
        Ok(descriptors) => descriptors,
        Err(error) => {
            report.record_fatal(surface.type_name, error.to_string());
            return report;
        }
    };
    tracing::debug!(entry_points = descriptors.len(), "discovered parse entry points");

    let payloads = ProbePayloads::from_config(config);
    for descriptor in &descriptors {
        let entry_point = &surface.entry_points[descriptor.index];
        let probe = synthesize::<O>(descriptor, &payloads);

        let observation = invoke(|| entry_point.call(&probe.base));
        let case = ProbeCase::new(surface.type_name, descriptor.name, VALID_ARGUMENTS_CASE);
        let result = assert_no_argument_failure(&case, &observation);
        report.record(case, result);

        for variant in &probe.variants {
            let observation = invoke(|| entry_point.call(&variant.args));
            tracing::debug!(
                operation = descriptor.name,
                case = %variant.label,
                observed = %observation,
                "parse probe"
            );
            let case = ProbeCase::new(surface.type_name, descriptor.name, variant.label.clone());
            let result = assert_expected_failure(&case, &variant.expected, &observation);
            report.record(case, result);
        }
    }
    report
}

/// Runs [`run_parse_contract`] for each surface; one type's fatal discovery
/// failure does not suppress the checks of the others.
pub fn run_parse_contracts<O>(surfaces: &[TypeSurface<O>], config: &ProbeConfig) -> ContractReport
where
    O: Default + Clone,
{
    let mut report = ContractReport::default();
    for surface in surfaces {
        report.merge(run_parse_contract(surface, config));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{run_parse_contract, run_parse_contracts};
    use crate::argument::ArgumentError;
    use crate::config::ProbeConfig;
    use crate::discovery::{EntryPoint, ParameterInfo, ParameterType, TypeSurface};
    use crate::invoke::InvocationError;
    use crate::report::CheckStatus;
    use crate::synthesis::{bytes_arg, int_arg, options_arg, text_arg};

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Options;

    fn range_check(len: usize, start_index: i32, length: i32) -> Result<(), ArgumentError> {
        if start_index < 0 || start_index as usize > len {
            return Err(ArgumentError::out_of_range("start_index", "outside buffer"));
        }
        if length < 0 || length as usize > len - start_index as usize {
            return Err(ArgumentError::out_of_range("length", "outside buffer"));
        }
        Ok(())
    }

    fn token_surface() -> TypeSurface<Options> {
        TypeSurface::<Options>::new("Token")
            .with_entry_point(EntryPoint::new(
                "parse_with_options_range",
                vec![
                    ParameterInfo::new("options", ParameterType::Options),
                    ParameterInfo::new("buffer", ParameterType::Bytes),
                    ParameterInfo::new("start_index", ParameterType::Int),
                    ParameterInfo::new("length", ParameterType::Int),
                ],
                |args| {
                    if options_arg(args, 0)?.is_none() {
                        return Err(InvocationError::target(ArgumentError::missing("options")));
                    }
                    let Some(buffer) = bytes_arg(args, 1)? else {
                        return Err(InvocationError::target(ArgumentError::missing("buffer")));
                    };
                    range_check(buffer.len(), int_arg(args, 2)?, int_arg(args, 3)?)
                        .map_err(InvocationError::target)
                },
            ))
            .with_entry_point(EntryPoint::new(
                "parse_str",
                vec![ParameterInfo::new("text", ParameterType::Text)],
                |args| match text_arg(args, 0)? {
                    Some(_) => Ok(()),
                    None => Err(InvocationError::target(ArgumentError::missing("text"))),
                },
            ))
    }

    #[test]
    fn functional_parse_contract_probes_every_discovered_entry_point() {
        let report = run_parse_contract(&token_surface(), &ProbeConfig::default());
        let summary = report.summary();
        // 1 valid + 6 variants for the range entry point, 1 valid + 1 variant for parse_str
        assert_eq!(summary.total, 9);
        assert!(report.is_success(), "{report:#?}");
        let cases = report
            .checks
            .iter()
            .filter(|check| check.probe.operation == "parse_str")
            .map(|check| check.probe.case.as_str())
            .collect::<Vec<_>>();
        assert_eq!(cases, vec!["valid arguments", "text = null"]);
    }

    #[test]
    fn regression_entry_point_blaming_wrong_parameter_fails() {
        let surface = TypeSurface::new("Lenient").with_entry_point(EntryPoint::new(
            "parse",
            vec![
                ParameterInfo::new("buffer", ParameterType::Bytes),
                ParameterInfo::new("start_index", ParameterType::Int),
            ],
            |args: &[crate::synthesis::ArgValue<Options>]| {
                bytes_arg(args, 0)?
                    .ok_or_else(|| InvocationError::target(ArgumentError::missing("input")))?;
                Ok(())
            },
        ));
        let report = run_parse_contract(&surface, &ProbeConfig::default());
        let summary = report.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 3);
        let CheckStatus::Failed { detail } = &report.checks[1].status else {
            panic!("buffer probe must fail");
        };
        assert!(detail.contains("expected missing_reference failure on 'buffer'"));
        assert!(detail.contains("observed missing_reference failure on 'input'"));
    }

    #[test]
    fn regression_unknown_parameter_aborts_only_its_own_type() {
        let broken = TypeSurface::new("Broken").with_entry_point(EntryPoint::new(
            "parse",
            vec![
                ParameterInfo::new("buffer", ParameterType::Bytes),
                ParameterInfo::new("end_index", ParameterType::Int),
            ],
            |_: &[crate::synthesis::ArgValue<Options>]| Ok(()),
        ));
        let report = run_parse_contracts(&[broken, token_surface()], &ProbeConfig::default());
        let summary = report.summary();
        assert_eq!(summary.fatal, 1);
        assert_eq!(summary.passed, 9);
        assert_eq!(report.checks[0].probe.type_name, "Broken");
        let CheckStatus::Fatal { detail } = &report.checks[0].status else {
            panic!("discovery failure must be fatal");
        };
        assert_eq!(detail, "unknown parameter 'end_index' for Broken.parse");
    }

    #[test]
    fn integration_parse_contract_is_identical_across_runs() {
        let config = ProbeConfig::default();
        let first = run_parse_contract(&token_surface(), &config);
        let second = run_parse_contract(&token_surface(), &config);
        assert_eq!(first, second);
    }
}
