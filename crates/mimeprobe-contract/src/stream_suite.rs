//! Fixed-shape argument contract for byte streams.

use std::io;

use crate::assertions::{assert_expected_failure, ExpectedFailure, ProbeCase};
use crate::config::ProbeConfig;
use crate::invoke::invoke;
use crate::report::ContractReport;
use crate::synthesis::{range_variants, STREAM_RANGE_PARAMETERS};

pub const ORIGIN_PARAMETER: &str = "origin";

/// Legal seek origins and their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    Begin,
    Current,
    End,
}

impl SeekOrigin {
    pub fn code(self) -> i32 {
        match self {
            Self::Begin => 0,
            Self::Current => 1,
            Self::End => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Begin),
            1 => Some(Self::Current),
            2 => Some(Self::End),
            _ => None,
        }
    }
}

/// Byte stream with queryable capabilities.
///
/// Argument failures are reported as `io::Error` values wrapping an
/// [`crate::ArgumentError`].
pub trait MimeStream {
    fn name(&self) -> &'static str;

    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    fn can_seek(&self) -> bool;

    fn read(&mut self, buffer: Option<&mut [u8]>, offset: i32, count: i32) -> io::Result<usize>;

    fn write(&mut self, buffer: Option<&[u8]>, offset: i32, count: i32) -> io::Result<()>;

    /// `origin` is a raw [`SeekOrigin`] code; unknown codes must be rejected.
    fn seek(&mut self, offset: i64, origin: i32) -> io::Result<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamOperation {
    Read,
    Write,
}

impl StreamOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Probes every capability `stream` reports.
#[tracing::instrument(level = "debug", skip_all, fields(stream = stream.name()))]
pub fn run_stream_contract(stream: &mut dyn MimeStream, config: &ProbeConfig) -> ContractReport {
    let mut report = ContractReport::default();
    if stream.can_read() {
        probe_range_operation(stream, StreamOperation::Read, config, &mut report);
    }
    if stream.can_write() {
        probe_range_operation(stream, StreamOperation::Write, config, &mut report);
    }
    if stream.can_seek() {
        let origin = config.invalid_seek_origin;
        let observation = invoke(|| stream.seek(0, origin));
        tracing::debug!(origin, observed = %observation, "seek probe");
        let probe = ProbeCase::new(
            stream.name(),
            "seek",
            format!("{ORIGIN_PARAMETER} = {origin}"),
        );
        let expected = ExpectedFailure::out_of_range(ORIGIN_PARAMETER);
        let result = assert_expected_failure(&probe, &expected, &observation);
        report.record(probe, result);
    }
    report
}

fn probe_range_operation(
    stream: &mut dyn MimeStream,
    operation: StreamOperation,
    config: &ProbeConfig,
    report: &mut ContractReport,
) {
    let mut buffer = vec![0_u8; config.binary_payload_len];
    for variant in range_variants(STREAM_RANGE_PARAMETERS, buffer.len()) {
        let observation = match operation {
            StreamOperation::Read => {
                let target = if variant.buffer_present {
                    Some(buffer.as_mut_slice())
                } else {
                    None
                };
                invoke(|| stream.read(target, variant.start, variant.length))
            }
            StreamOperation::Write => {
                let source = variant.buffer_present.then_some(buffer.as_slice());
                invoke(|| stream.write(source, variant.start, variant.length))
            }
        };
        tracing::debug!(
            operation = operation.as_str(),
            case = %variant.label,
            observed = %observation,
            "stream probe"
        );
        let probe = ProbeCase::new(stream.name(), operation.as_str(), variant.label.clone());
        let result = assert_expected_failure(&probe, &variant.expected, &observation);
        report.record(probe, result);
    }
}

/// Probes each stream and drops it before moving to the next one.
pub fn run_stream_contracts<I>(streams: I, config: &ProbeConfig) -> ContractReport
where
    I: IntoIterator<Item = Box<dyn MimeStream>>,
{
    let mut report = ContractReport::default();
    for mut stream in streams {
        report.merge(run_stream_contract(stream.as_mut(), config));
    }
    report
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{run_stream_contract, MimeStream, SeekOrigin};
    use crate::argument::{ArgumentError, ArgumentFailure};
    use crate::config::ProbeConfig;

    /// Write-only sink that validates its arguments.
    struct CountingSink {
        written: usize,
        validate_origin: bool,
    }

    fn check_range(buffer_len: Option<usize>, offset: i32, count: i32) -> io::Result<usize> {
        let len = buffer_len.ok_or_else(|| ArgumentError::missing("buffer"))?;
        if offset < 0 || offset as usize > len {
            return Err(ArgumentError::out_of_range("offset", "outside buffer").into());
        }
        if count < 0 || count as usize > len - offset as usize {
            return Err(ArgumentError::out_of_range("count", "outside buffer").into());
        }
        Ok(count as usize)
    }

    impl MimeStream for CountingSink {
        fn name(&self) -> &'static str {
            "CountingSink"
        }

        fn can_read(&self) -> bool {
            false
        }

        fn can_write(&self) -> bool {
            true
        }

        fn can_seek(&self) -> bool {
            true
        }

        fn read(
            &mut self,
            _buffer: Option<&mut [u8]>,
            _offset: i32,
            _count: i32,
        ) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "sink is write-only"))
        }

        fn write(&mut self, buffer: Option<&[u8]>, offset: i32, count: i32) -> io::Result<()> {
            self.written += check_range(buffer.map(<[u8]>::len), offset, count)?;
            Ok(())
        }

        fn seek(&mut self, offset: i64, origin: i32) -> io::Result<u64> {
            match SeekOrigin::from_code(origin) {
                Some(_) => Ok(offset.max(0) as u64),
                None if self.validate_origin => {
                    Err(ArgumentError::out_of_range("origin", "unknown origin").into())
                }
                None => Ok(0),
            }
        }
    }

    /// Read-only source that reports `offset` failures under the name `index`.
    struct MislabeledSource;

    impl MimeStream for MislabeledSource {
        fn name(&self) -> &'static str {
            "MislabeledSource"
        }

        fn can_read(&self) -> bool {
            true
        }

        fn can_write(&self) -> bool {
            false
        }

        fn can_seek(&self) -> bool {
            false
        }

        fn read(
            &mut self,
            buffer: Option<&mut [u8]>,
            offset: i32,
            count: i32,
        ) -> io::Result<usize> {
            let len = buffer.map(|buffer| buffer.len());
            check_range(len, offset, count).map_err(|error| {
                let renamed = match error.argument_error() {
                    Some(ArgumentError::OutOfRange { parameter, reason }) if parameter == "offset" => {
                        Some(ArgumentError::out_of_range("index", reason.clone()))
                    }
                    _ => None,
                };
                renamed.map_or(error, io::Error::from)
            })?;
            Ok(0)
        }

        fn write(&mut self, _buffer: Option<&[u8]>, _offset: i32, _count: i32) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "source is read-only"))
        }

        fn seek(&mut self, _offset: i64, _origin: i32) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "source is not seekable"))
        }
    }

    #[test]
    fn unit_seek_origin_codes_round_trip() {
        for origin in [SeekOrigin::Begin, SeekOrigin::Current, SeekOrigin::End] {
            assert_eq!(SeekOrigin::from_code(origin.code()), Some(origin));
        }
        assert_eq!(SeekOrigin::from_code(255), None);
    }

    #[test]
    fn functional_stream_contract_probes_only_reported_capabilities() {
        let mut sink = CountingSink {
            written: 0,
            validate_origin: true,
        };
        let report = run_stream_contract(&mut sink, &ProbeConfig::default());
        let operations = report
            .checks
            .iter()
            .map(|check| check.probe.operation.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            operations,
            vec!["write", "write", "write", "write", "write", "seek"]
        );
        assert!(report.is_success(), "{report:?}");
        assert_eq!(sink.written, 0);
    }

    #[test]
    fn regression_unvalidated_seek_origin_is_reported() {
        let mut sink = CountingSink {
            written: 0,
            validate_origin: false,
        };
        let report = run_stream_contract(&mut sink, &ProbeConfig::default());
        let summary = report.summary();
        assert_eq!(summary.failed, 1);
        let failure = report.failures().next().expect("seek failure");
        assert_eq!(failure.probe.case, "origin = 255");
    }

    #[test]
    fn regression_read_checks_catch_misnamed_offset() {
        let report = run_stream_contract(&mut MislabeledSource, &ProbeConfig::default());
        let summary = report.summary();
        assert_eq!(summary.total, 5);
        assert!(report
            .checks
            .iter()
            .all(|check| check.probe.operation == "read"));
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 2);
        let cases = report
            .failures()
            .map(|check| check.probe.case.as_str())
            .collect::<Vec<_>>();
        assert_eq!(cases, vec!["offset = -1", "offset = 1025"]);
    }
}
