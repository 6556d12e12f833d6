use std::fs;

use anyhow::Result;
use mimeprobe_contract::{
    load_probe_config, render_report_text, run_filter_contracts, run_parse_contracts,
    run_stream_contracts, CheckStatus, ContractReport, EntryPoint, ParameterInfo, ParameterType,
    ProbeConfig, TypeSurface,
};
use mimeprobe_io::{reference_filters, reference_streams};
use mimeprobe_parse::{parse_surface, reference_surfaces, MailboxAddress, ParserOptions};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_test_writer()
        .compact()
        .try_init();
}

fn run_all(config: &ProbeConfig) -> ContractReport {
    let mut report = run_filter_contracts(reference_filters(), config);
    report.merge(run_stream_contracts(reference_streams(), config));
    report.merge(run_parse_contracts(&reference_surfaces(), config));
    report
}

fn assert_clean(report: &ContractReport) {
    assert!(report.is_success(), "{}", render_report_text(report));
}

#[test]
fn integration_reference_filters_reject_bad_arguments() {
    init_tracing();
    let report = run_filter_contracts(reference_filters(), &ProbeConfig::default());
    assert_clean(&report);
    // 14 filters, two operations, five boundary cases each
    assert_eq!(report.summary().passed, 14 * 2 * 5);
}

#[test]
fn integration_reference_streams_reject_bad_arguments() {
    init_tracing();
    let report = run_stream_contracts(reference_streams(), &ProbeConfig::default());
    assert_clean(&report);
    assert!(report
        .checks
        .iter()
        .any(|check| check.probe.operation == "seek" && check.probe.case == "origin = 255"));

    let memory_block = report
        .checks
        .iter()
        .filter(|check| check.probe.type_name == "MemoryBlockStream")
        .collect::<Vec<_>>();
    let count = |operation: &str| {
        memory_block
            .iter()
            .filter(|check| check.probe.operation == operation)
            .count()
    };
    assert_eq!(
        (count("read"), count("write"), count("seek")),
        (5, 5, 1)
    );
    assert_eq!(memory_block.len(), 11);
}

#[test]
fn integration_reference_parsers_reject_bad_arguments() {
    init_tracing();
    let report = run_parse_contracts(&reference_surfaces(), &ProbeConfig::default());
    assert_clean(&report);
    assert_eq!(report.summary().fatal, 0);
    assert!(report
        .checks
        .iter()
        .all(|check| check.probe.operation != "try_parse_str"));
}

#[test]
fn integration_reports_are_identical_across_runs() {
    init_tracing();
    let config = ProbeConfig::default();
    let first = run_all(&config);
    let second = run_all(&config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).expect("serialize first"),
        serde_json::to_value(&second).expect("serialize second")
    );
}

#[test]
fn integration_suites_honor_a_probe_config_file() -> Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("probe-config.json");
    fs::write(
        &path,
        r#"{"schema_version":1,"binary_payload_len":64,"text_payload":"not a header"}"#,
    )?;
    let config = load_probe_config(&path)?;
    assert_eq!(config.invalid_seek_origin, 255);

    let summary = run_all(&config).into_result()?;
    assert_eq!(summary.failed + summary.fatal, 0);
    assert!(summary.total > 0);
    Ok(())
}

#[test]
fn regression_unknown_parameter_is_fatal_for_that_type_only() {
    init_tracing();
    let broken = TypeSurface::<ParserOptions>::new("Broken").with_entry_point(EntryPoint::new(
        "parse_range",
        vec![
            ParameterInfo::new("buffer", ParameterType::Bytes),
            ParameterInfo::new("startIndex", ParameterType::Int),
            ParameterInfo::new("length", ParameterType::Int),
        ],
        |_| Ok(()),
    ));
    let surfaces = vec![broken, parse_surface::<MailboxAddress>()];
    let report = run_parse_contracts(&surfaces, &ProbeConfig::default());

    let summary = report.summary();
    assert_eq!(summary.fatal, 1);
    assert_eq!(summary.failed, 0);
    let fatal = report
        .failures()
        .next()
        .expect("fatal outcome for the broken type");
    assert_eq!(fatal.probe.type_name, "Broken");
    let CheckStatus::Fatal { detail } = &fatal.status else {
        panic!("expected a fatal outcome, got {:?}", fatal.status);
    };
    assert!(detail.contains("startIndex"), "{detail}");
    assert!(report
        .checks
        .iter()
        .any(|check| check.probe.type_name == "MailboxAddress"
            && check.status == CheckStatus::Passed));
}
