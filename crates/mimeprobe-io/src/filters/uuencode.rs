use super::ByteTransform;

/// Raw bytes per uuencoded line.
pub const UU_LINE_BYTES: usize = 45;
const UU_TRAILER: &[u8] = b"`\nend\n";

fn uu_char(bits: u8) -> u8 {
    match bits & 0x3f {
        0 => b'`',
        bits => bits + b' ',
    }
}

fn uu_bits(symbol: u8) -> u8 {
    symbol.wrapping_sub(b' ') & 0x3f
}

fn encode_line(line: &[u8], output: &mut Vec<u8>) {
    // line length is at most 45, so it always fits the length character
    output.push(uu_char(line.len() as u8));
    for group in line.chunks(3) {
        let mut triple = [0_u8; 3];
        triple[..group.len()].copy_from_slice(group);
        let [a, b, c] = triple;
        output.extend_from_slice(&[
            uu_char(a >> 2),
            uu_char((a << 4) | (b >> 4)),
            uu_char((b << 2) | (c >> 6)),
            uu_char(c),
        ]);
    }
    output.push(b'\n');
}

/// Uuencodes the body of a file; the `begin` line is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct UuEncoder {
    pending: Vec<u8>,
}

impl ByteTransform for UuEncoder {
    const NAME: &'static str = "UuEncoder";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        self.pending.extend_from_slice(input);
        let full = self.pending.len() / UU_LINE_BYTES * UU_LINE_BYTES;
        for line in self.pending[..full].chunks(UU_LINE_BYTES) {
            encode_line(line, output);
        }
        self.pending.drain(..full);
        if flush {
            if !self.pending.is_empty() {
                encode_line(&self.pending, output);
                self.pending.clear();
            }
            output.extend_from_slice(UU_TRAILER);
        }
    }

    fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Decodes uuencoded lines, skipping a `begin` header and stopping at `end`.
#[derive(Debug, Clone, Default)]
pub struct UuDecoder {
    line: Vec<u8>,
    finished: bool,
}

impl UuDecoder {
    fn decode_line(&mut self, output: &mut Vec<u8>) {
        let line = self.line.strip_suffix(b"\r").unwrap_or(&self.line);
        if line.is_empty() || line.starts_with(b"begin ") {
            return;
        }
        if line == b"end" {
            self.finished = true;
            return;
        }
        let mut remaining = usize::from(uu_bits(line[0]));
        for group in line[1..].chunks(4) {
            if remaining == 0 {
                break;
            }
            let mut quad = [b'`'; 4];
            quad[..group.len()].copy_from_slice(group);
            let [a, b, c, d] = quad.map(uu_bits);
            let bytes = [(a << 2) | (b >> 4), (b << 4) | (c >> 2), (c << 6) | d];
            let take = remaining.min(3);
            output.extend_from_slice(&bytes[..take]);
            remaining -= take;
        }
    }
}

impl ByteTransform for UuDecoder {
    const NAME: &'static str = "UuDecoder";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            if self.finished {
                break;
            }
            if byte == b'\n' {
                self.decode_line(output);
                self.line.clear();
            } else {
                self.line.push(byte);
            }
        }
        if flush && !self.finished {
            self.decode_line(output);
            self.line.clear();
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{UuDecoder, UuEncoder};
    use crate::filters::ByteTransform;

    #[test]
    fn unit_encoder_emits_length_prefixed_lines_and_trailer() {
        let mut output = Vec::new();
        UuEncoder::default().transform(b"Cat", true, &mut output);
        assert_eq!(output, b"#0V%T\n`\nend\n");
    }

    #[test]
    fn functional_decoder_skips_header_and_ignores_text_after_end() {
        let mut decoder = UuDecoder::default();
        let mut output = Vec::new();
        decoder.transform(b"begin 644 cat.txt\r\n#0V", false, &mut output);
        decoder.transform(b"%T\r\n`\r\nend\r\ntrailing garbage\n", true, &mut output);
        assert_eq!(output, b"Cat");
    }
}
