//! Fixed-shape argument contract for streaming transform filters.

use crate::argument::ArgumentError;
use crate::assertions::{assert_expected_failure, ProbeCase};
use crate::config::ProbeConfig;
use crate::invoke::invoke;
use crate::report::ContractReport;
use crate::synthesis::{range_variants, FILTER_RANGE_PARAMETERS};

/// Window of filtered bytes; `buffer[index..index + length]` is the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutput<'a> {
    pub buffer: &'a [u8],
    pub index: usize,
    pub length: usize,
}

impl<'a> FilterOutput<'a> {
    pub fn new(buffer: &'a [u8], index: usize, length: usize) -> Self {
        Self {
            buffer,
            index,
            length,
        }
    }

    pub fn whole(buffer: &'a [u8]) -> Self {
        Self::new(buffer, 0, buffer.len())
    }

    pub fn bytes(&self) -> &'a [u8] {
        &self.buffer[self.index..self.index + self.length]
    }
}

/// Incremental byte transform with an explicit end-of-input flush.
pub trait MimeFilter {
    fn name(&self) -> &'static str;

    fn filter<'a>(
        &'a mut self,
        input: Option<&'a [u8]>,
        start_index: i32,
        length: i32,
    ) -> Result<FilterOutput<'a>, ArgumentError>;

    fn flush<'a>(
        &'a mut self,
        input: Option<&'a [u8]>,
        start_index: i32,
        length: i32,
    ) -> Result<FilterOutput<'a>, ArgumentError>;

    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperation {
    Filter,
    Flush,
}

impl FilterOperation {
    pub const ALL: [FilterOperation; 2] = [FilterOperation::Filter, FilterOperation::Flush];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Flush => "flush",
        }
    }
}

/// Probes `filter` and `flush` of one filter instance with the five boundary cases each.
#[tracing::instrument(level = "debug", skip_all, fields(filter = filter.name()))]
pub fn run_filter_contract(filter: &mut dyn MimeFilter, config: &ProbeConfig) -> ContractReport {
    let input = vec![0_u8; config.binary_payload_len];
    let mut report = ContractReport::default();

    for operation in FilterOperation::ALL {
        for variant in range_variants(FILTER_RANGE_PARAMETERS, input.len()) {
            filter.reset();
            let buffer = variant.buffer_present.then_some(input.as_slice());
            let observation = invoke(|| match operation {
                FilterOperation::Filter => filter
                    .filter(buffer, variant.start, variant.length)
                    .map(|_| ()),
                FilterOperation::Flush => filter
                    .flush(buffer, variant.start, variant.length)
                    .map(|_| ()),
            });
            tracing::debug!(
                operation = operation.as_str(),
                case = %variant.label,
                observed = %observation,
                "filter probe"
            );
            let probe = ProbeCase::new(filter.name(), operation.as_str(), variant.label.clone());
            let result = assert_expected_failure(&probe, &variant.expected, &observation);
            report.record(probe, result);
        }
    }
    report
}

pub fn run_filter_contracts<I>(filters: I, config: &ProbeConfig) -> ContractReport
where
    I: IntoIterator<Item = Box<dyn MimeFilter>>,
{
    let mut report = ContractReport::default();
    for mut filter in filters {
        report.merge(run_filter_contract(filter.as_mut(), config));
    }
    report
}
