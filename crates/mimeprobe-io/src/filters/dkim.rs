//! DKIM body canonicalization (RFC 6376 section 3.4).

use super::ByteTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Simple,
    Relaxed,
}

/// Line-buffered canonicalizer; trailing empty lines are held back until
/// more content proves they are not at the end of the body.
#[derive(Debug, Clone)]
struct BodyCanonicalizer {
    mode: BodyMode,
    line: Vec<u8>,
    empty_lines: usize,
    saw_content: bool,
}

impl BodyCanonicalizer {
    fn new(mode: BodyMode) -> Self {
        Self {
            mode,
            line: Vec::new(),
            empty_lines: 0,
            saw_content: false,
        }
    }

    fn canonical_line(&self) -> Vec<u8> {
        let line = self.line.strip_suffix(b"\r").unwrap_or(&self.line);
        if self.mode == BodyMode::Simple {
            return line.to_vec();
        }
        let mut canonical = Vec::with_capacity(line.len());
        let mut in_whitespace = false;
        for &byte in line {
            if byte == b' ' || byte == b'\t' {
                in_whitespace = true;
                continue;
            }
            if in_whitespace {
                canonical.push(b' ');
                in_whitespace = false;
            }
            canonical.push(byte);
        }
        canonical
    }

    fn finish_line(&mut self, output: &mut Vec<u8>) {
        let canonical = self.canonical_line();
        self.line.clear();
        if canonical.is_empty() {
            self.empty_lines += 1;
            return;
        }
        for _ in 0..self.empty_lines {
            output.extend_from_slice(b"\r\n");
        }
        self.empty_lines = 0;
        output.extend_from_slice(&canonical);
        output.extend_from_slice(b"\r\n");
        self.saw_content = true;
    }

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            if byte == b'\n' {
                self.finish_line(output);
            } else {
                self.line.push(byte);
            }
        }
        if flush {
            if !self.line.is_empty() {
                self.finish_line(output);
            }
            if !self.saw_content && self.mode == BodyMode::Simple {
                output.extend_from_slice(b"\r\n");
            }
            self.reset();
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.mode);
    }
}

#[derive(Debug, Clone)]
pub struct DkimSimpleBody(BodyCanonicalizer);

impl Default for DkimSimpleBody {
    fn default() -> Self {
        Self(BodyCanonicalizer::new(BodyMode::Simple))
    }
}

impl ByteTransform for DkimSimpleBody {
    const NAME: &'static str = "DkimSimpleBodyFilter";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        self.0.transform(input, flush, output);
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

#[derive(Debug, Clone)]
pub struct DkimRelaxedBody(BodyCanonicalizer);

impl Default for DkimRelaxedBody {
    fn default() -> Self {
        Self(BodyCanonicalizer::new(BodyMode::Relaxed))
    }
}

impl ByteTransform for DkimRelaxedBody {
    const NAME: &'static str = "DkimRelaxedBodyFilter";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        self.0.transform(input, flush, output);
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::{DkimRelaxedBody, DkimSimpleBody};
    use crate::filters::ByteTransform;

    fn canonicalize<T: ByteTransform>(mut transform: T, chunks: &[&[u8]]) -> Vec<u8> {
        let mut output = Vec::new();
        for chunk in chunks {
            transform.transform(chunk, false, &mut output);
        }
        transform.transform(&[], true, &mut output);
        output
    }

    #[test]
    fn unit_empty_bodies_follow_rfc_6376() {
        assert_eq!(canonicalize(DkimSimpleBody::default(), &[]), b"\r\n");
        assert_eq!(canonicalize(DkimRelaxedBody::default(), &[b"\r\n\r\n"]), b"");
    }

    #[test]
    fn functional_simple_body_drops_only_trailing_empty_lines() {
        let output = canonicalize(
            DkimSimpleBody::default(),
            &[b"Hi \r\n\r\n", b"there\r\n\r\n\r\n"],
        );
        assert_eq!(output, b"Hi \r\n\r\nthere\r\n");
    }

    #[test]
    fn functional_relaxed_body_collapses_whitespace() {
        let output = canonicalize(
            DkimRelaxedBody::default(),
            &[b" C \r\nD \t E\t", b"\r\n\r\n"],
        );
        assert_eq!(output, b" C\r\nD E\r\n");
    }

    #[test]
    fn regression_missing_final_line_break_is_added() {
        let output = canonicalize(DkimSimpleBody::default(), &[b"no newline"]);
        assert_eq!(output, b"no newline\r\n");
    }
}
