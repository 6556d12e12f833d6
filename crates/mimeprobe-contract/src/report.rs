use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::assertions::{ContractViolation, ProbeCase};

pub const FATAL_OPERATION: &str = "*";
pub const FATAL_CASE: &str = "discovery";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed { detail: String },
    Fatal { detail: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckOutcome {
    #[serde(flatten)]
    pub probe: ProbeCase,
    #[serde(flatten)]
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub fatal: usize,
}

/// Ordered outcomes of every probe a suite ran.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractReport {
    pub checks: Vec<CheckOutcome>,
}

impl ContractReport {
    pub fn record(&mut self, probe: ProbeCase, result: Result<(), ContractViolation>) {
        let status = match result {
            Ok(()) => CheckStatus::Passed,
            Err(violation) => {
                tracing::warn!(probe = %probe, "contract violation: {violation}");
                CheckStatus::Failed {
                    detail: violation.to_string(),
                }
            }
        };
        self.checks.push(CheckOutcome { probe, status });
    }

    /// Records a harness failure that stopped every check of `type_name`.
    pub fn record_fatal(&mut self, type_name: &str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(type_name, "contract checks aborted: {detail}");
        self.checks.push(CheckOutcome {
            probe: ProbeCase::new(type_name, FATAL_OPERATION, FATAL_CASE),
            status: CheckStatus::Fatal { detail },
        });
    }

    pub fn merge(&mut self, other: ContractReport) {
        self.checks.extend(other.checks);
    }

    pub fn summary(&self) -> ContractSummary {
        let mut summary = ContractSummary {
            total: self.checks.len(),
            ..ContractSummary::default()
        };
        for check in &self.checks {
            match check.status {
                CheckStatus::Passed => summary.passed = summary.passed.saturating_add(1),
                CheckStatus::Failed { .. } => summary.failed = summary.failed.saturating_add(1),
                CheckStatus::Fatal { .. } => summary.fatal = summary.fatal.saturating_add(1),
            }
        }
        summary
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks
            .iter()
            .filter(|check| check.status != CheckStatus::Passed)
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Converts any failed or fatal check into an error listing all of them.
    pub fn into_result(self) -> Result<ContractSummary> {
        let summary = self.summary();
        if self.is_success() {
            return Ok(summary);
        }
        let details = self
            .failures()
            .map(render_check_line)
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "{} of {} argument contract checks failed:\n{}",
            summary.failed + summary.fatal,
            summary.total,
            details
        );
    }
}

pub fn render_report_text(report: &ContractReport) -> String {
    let summary = report.summary();
    let mut lines = vec![format!(
        "argument contracts: total={} passed={} failed={} fatal={}",
        summary.total, summary.passed, summary.failed, summary.fatal
    )];
    lines.extend(report.failures().map(render_check_line));
    lines.join("\n")
}

fn render_check_line(check: &CheckOutcome) -> String {
    match &check.status {
        CheckStatus::Passed => format!("pass {}", check.probe),
        CheckStatus::Failed { detail } => format!("fail {detail}"),
        CheckStatus::Fatal { detail } => format!("fatal {}: {detail}", check.probe.type_name),
    }
}

#[cfg(test)]
mod tests {
    use super::{render_report_text, CheckStatus, ContractReport};
    use crate::assertions::{ContractViolation, ExpectedFailure, ProbeCase};
    use crate::invoke::Observation;

    fn violation(probe: &ProbeCase) -> ContractViolation {
        ContractViolation::UnexpectedOutcome {
            probe: probe.clone(),
            expected: ExpectedFailure::missing("buffer"),
            observed: Observation::Completed,
        }
    }

    #[test]
    fn unit_summary_counts_each_status() {
        let mut report = ContractReport::default();
        let pass = ProbeCase::new("BoundStream", "read", "buffer = null");
        let fail = ProbeCase::new("BoundStream", "write", "buffer = null");
        report.record(pass, Ok(()));
        report.record(fail.clone(), Err(violation(&fail)));
        report.record_fatal("ContentType", "unknown parameter 'end_index'");

        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.fatal, 1);
        assert!(!report.is_success());
        assert!(matches!(report.checks[2].status, CheckStatus::Fatal { .. }));
    }

    #[test]
    fn functional_into_result_lists_every_failure() {
        let mut report = ContractReport::default();
        let fail = ProbeCase::new("ChainedStream", "read", "buffer = null");
        report.record(fail.clone(), Err(violation(&fail)));
        report.record_fatal("GroupAddress", "unknown parameter 'count'");

        let error = report.into_result().expect_err("failures");
        let rendered = format!("{error:#}");
        assert!(rendered.contains("2 of 2 argument contract checks failed"));
        assert!(rendered.contains("ChainedStream.read [buffer = null]"));
        assert!(rendered.contains("fatal GroupAddress: unknown parameter 'count'"));
    }

    #[test]
    fn unit_report_serializes_flat_check_records() {
        let mut report = ContractReport::default();
        report.record(ProbeCase::new("MeasuringStream", "seek", "origin = 255"), Ok(()));
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["checks"][0]["type_name"], "MeasuringStream");
        assert_eq!(value["checks"][0]["status"], "passed");
        assert_eq!(
            render_report_text(&report),
            "argument contracts: total=1 passed=1 failed=0 fatal=0"
        );
    }
}
