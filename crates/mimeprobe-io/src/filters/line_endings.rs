use super::ByteTransform;

/// Converts CRLF line endings to LF.
#[derive(Debug, Clone, Default)]
pub struct Dos2Unix {
    pending_cr: bool,
}

impl ByteTransform for Dos2Unix {
    const NAME: &'static str = "Dos2UnixFilter";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            if self.pending_cr {
                self.pending_cr = false;
                if byte != b'\n' {
                    output.push(b'\r');
                }
            }
            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                output.push(byte);
            }
        }
        if flush && self.pending_cr {
            self.pending_cr = false;
            output.push(b'\r');
        }
    }

    fn reset(&mut self) {
        self.pending_cr = false;
    }
}

/// Converts bare LF line endings to CRLF.
#[derive(Debug, Clone, Default)]
pub struct Unix2Dos {
    last_was_cr: bool,
}

impl ByteTransform for Unix2Dos {
    const NAME: &'static str = "Unix2DosFilter";

    fn transform(&mut self, input: &[u8], _flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            if byte == b'\n' && !self.last_was_cr {
                output.push(b'\r');
            }
            output.push(byte);
            self.last_was_cr = byte == b'\r';
        }
    }

    fn reset(&mut self) {
        self.last_was_cr = false;
    }
}

/// Strips spaces and tabs preceding each line ending and at end of input.
#[derive(Debug, Clone, Default)]
pub struct TrailingWhitespace {
    whitespace: Vec<u8>,
}

impl ByteTransform for TrailingWhitespace {
    const NAME: &'static str = "TrailingWhitespaceFilter";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            match byte {
                b' ' | b'\t' => self.whitespace.push(byte),
                b'\r' | b'\n' => {
                    self.whitespace.clear();
                    output.push(byte);
                }
                _ => {
                    output.append(&mut self.whitespace);
                    output.push(byte);
                }
            }
        }
        if flush {
            self.whitespace.clear();
        }
    }

    fn reset(&mut self) {
        self.whitespace.clear();
    }
}

const FROM_MARKER: &[u8] = b"From ";
const ARMORED_FROM: &[u8] = b"=46rom ";

/// Armors lines starting with `From ` as `=46rom ` so mbox readers leave them alone.
#[derive(Debug, Clone)]
pub struct ArmoredFrom {
    at_line_start: bool,
    partial: usize,
}

impl Default for ArmoredFrom {
    fn default() -> Self {
        Self {
            at_line_start: true,
            partial: 0,
        }
    }
}

impl ByteTransform for ArmoredFrom {
    const NAME: &'static str = "ArmoredFromFilter";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            if self.at_line_start {
                if byte == FROM_MARKER[self.partial] {
                    self.partial += 1;
                    if self.partial == FROM_MARKER.len() {
                        output.extend_from_slice(ARMORED_FROM);
                        self.partial = 0;
                        self.at_line_start = false;
                    }
                    continue;
                }
                output.extend_from_slice(&FROM_MARKER[..self.partial]);
                self.partial = 0;
                self.at_line_start = false;
            }
            output.push(byte);
            self.at_line_start = byte == b'\n';
        }
        if flush {
            output.extend_from_slice(&FROM_MARKER[..self.partial]);
            self.partial = 0;
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
