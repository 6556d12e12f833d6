use thiserror::Error;

use super::ByteTransform;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    #[error("unsupported charset '{name}'")]
    Unsupported { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Ascii,
    Latin1,
    Utf8,
}

impl Charset {
    fn lookup(name: &str) -> Result<Self, CharsetError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "us-ascii" | "ascii" => Ok(Self::Ascii),
            "iso-8859-1" | "latin1" | "iso_8859-1" => Ok(Self::Latin1),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            _ => Err(CharsetError::Unsupported {
                name: name.to_string(),
            }),
        }
    }

    fn encode(self, ch: char, output: &mut Vec<u8>) {
        let limit = match self {
            Self::Ascii => 0x7f,
            Self::Latin1 => 0xff,
            Self::Utf8 => {
                let mut scratch = [0_u8; 4];
                output.extend_from_slice(ch.encode_utf8(&mut scratch).as_bytes());
                return;
            }
        };
        match u8::try_from(u32::from(ch)) {
            Ok(byte) if u32::from(byte) <= limit => output.push(byte),
            _ => output.push(b'?'),
        }
    }
}

/// Converts text between single-byte charsets and UTF-8.
///
/// Undecodable input becomes U+FFFD; characters the target cannot represent
/// become `?`.
#[derive(Debug, Clone)]
pub struct CharsetConverter {
    from: Charset,
    to: Charset,
    pending: Vec<u8>,
}

impl CharsetConverter {
    pub fn new(from: &str, to: &str) -> Result<Self, CharsetError> {
        Ok(Self {
            from: Charset::lookup(from)?,
            to: Charset::lookup(to)?,
            pending: Vec::new(),
        })
    }

    /// The conversion most legacy mail needs.
    pub fn latin1_to_utf8() -> Self {
        Self {
            from: Charset::Latin1,
            to: Charset::Utf8,
            pending: Vec::new(),
        }
    }

    fn decode_utf8(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        self.pending.extend_from_slice(input);
        let mut rest = self.pending.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    text.chars().for_each(|ch| self.to.encode(ch, output));
                    rest = &[];
                    break;
                }
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    // prefix was validated by from_utf8
                    if let Ok(text) = std::str::from_utf8(valid) {
                        text.chars().for_each(|ch| self.to.encode(ch, output));
                    }
                    match error.error_len() {
                        Some(invalid) => {
                            self.to.encode(char::REPLACEMENT_CHARACTER, output);
                            rest = &after[invalid..];
                        }
                        None if flush => {
                            self.to.encode(char::REPLACEMENT_CHARACTER, output);
                            rest = &[];
                            break;
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }
        let consumed = self.pending.len() - rest.len();
        self.pending.drain(..consumed);
    }
}

impl ByteTransform for CharsetConverter {
    const NAME: &'static str = "CharsetFilter";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        match self.from {
            Charset::Utf8 => self.decode_utf8(input, flush, output),
            Charset::Latin1 => input
                .iter()
                .for_each(|byte| self.to.encode(char::from(*byte), output)),
            Charset::Ascii => input.iter().for_each(|byte| {
                let ch = if byte.is_ascii() {
                    char::from(*byte)
                } else {
                    char::REPLACEMENT_CHARACTER
                };
                self.to.encode(ch, output)
            }),
        }
    }

    fn reset(&mut self) {
        self.pending.clear();
    }
}
