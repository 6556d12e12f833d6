use super::ByteTransform;

/// Longest encoded line, excluding the soft-break `=`.
const MAX_LINE_LENGTH: usize = 75;
const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[derive(Debug, Clone, Default)]
pub struct QuotedPrintableEncoder {
    line_length: usize,
    pending_space: Option<u8>,
}

impl QuotedPrintableEncoder {
    fn emit(&mut self, token: &[u8], output: &mut Vec<u8>) {
        if self.line_length + token.len() > MAX_LINE_LENGTH {
            output.extend_from_slice(b"=\n");
            self.line_length = 0;
        }
        output.extend_from_slice(token);
        self.line_length += token.len();
    }

    fn emit_escaped(&mut self, byte: u8, output: &mut Vec<u8>) {
        let token = [
            b'=',
            HEX[usize::from(byte >> 4)],
            HEX[usize::from(byte & 0x0f)],
        ];
        self.emit(&token, output);
    }
}

impl ByteTransform for QuotedPrintableEncoder {
    const NAME: &'static str = "QuotedPrintableEncoder";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            if let Some(space) = self.pending_space.take() {
                if byte == b'\n' {
                    self.emit_escaped(space, output);
                } else {
                    self.emit(&[space], output);
                }
            }
            match byte {
                b'\n' => {
                    output.push(b'\n');
                    self.line_length = 0;
                }
                b' ' | b'\t' => self.pending_space = Some(byte),
                b'=' => self.emit_escaped(byte, output),
                33..=126 => self.emit(&[byte], output),
                _ => self.emit_escaped(byte, output),
            }
        }
        if flush {
            if let Some(space) = self.pending_space.take() {
                self.emit_escaped(space, output);
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DecodeState {
    #[default]
    Literal,
    Equals,
    EqualsCr,
    Hex(u8),
}

#[derive(Debug, Clone, Default)]
pub struct QuotedPrintableDecoder {
    state: DecodeState,
}

fn hex_value(byte: u8) -> Option<u8> {
    char::from(byte)
        .to_digit(16)
        .and_then(|digit| u8::try_from(digit).ok())
}

impl ByteTransform for QuotedPrintableDecoder {
    const NAME: &'static str = "QuotedPrintableDecoder";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            self.state = match (self.state, byte) {
                (DecodeState::Literal, b'=') => DecodeState::Equals,
                (DecodeState::Literal, _) => {
                    output.push(byte);
                    DecodeState::Literal
                }
                (DecodeState::Equals, b'\n') | (DecodeState::EqualsCr, b'\n') => {
                    DecodeState::Literal
                }
                (DecodeState::Equals, b'\r') => DecodeState::EqualsCr,
                (DecodeState::Equals, _) => match hex_value(byte) {
                    Some(_) => DecodeState::Hex(byte),
                    None => {
                        output.extend_from_slice(&[b'=', byte]);
                        DecodeState::Literal
                    }
                },
                (DecodeState::EqualsCr, _) => {
                    output.extend_from_slice(&[b'=', b'\r', byte]);
                    DecodeState::Literal
                }
                (DecodeState::Hex(high), _) => {
                    match (hex_value(high), hex_value(byte)) {
                        (Some(high), Some(low)) => output.push((high << 4) | low),
                        _ => output.extend_from_slice(&[b'=', high, byte]),
                    }
                    DecodeState::Literal
                }
            };
        }
        if flush {
            match std::mem::take(&mut self.state) {
                DecodeState::Literal => {}
                DecodeState::Equals => output.push(b'='),
                DecodeState::EqualsCr => output.extend_from_slice(b"=\r"),
                DecodeState::Hex(high) => output.extend_from_slice(&[b'=', high]),
            }
        }
    }

    fn reset(&mut self) {
        self.state = DecodeState::Literal;
    }
}
