use super::ByteTransform;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 78;

/// Encodings a transport accepts without further armoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingConstraint {
    SevenBit,
    EightBit,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    SevenBit,
    EightBit,
    Binary,
    QuotedPrintable,
    Base64,
}

impl TransferEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
            Self::QuotedPrintable => "quoted-printable",
            Self::Base64 => "base64",
        }
    }
}

/// Passes input through unchanged while collecting the statistics needed to
/// pick a transfer encoding.
#[derive(Debug, Clone, Default)]
pub struct BestEncoding {
    total: usize,
    eight_bit: usize,
    nulls: usize,
    line_length: usize,
    max_line_length: usize,
}

impl BestEncoding {
    /// Picks the cheapest encoding that satisfies `constraint` for everything
    /// seen since the last reset.
    pub fn best_encoding(
        &self,
        constraint: EncodingConstraint,
        max_line_length: usize,
    ) -> TransferEncoding {
        let longest = self.max_line_length.max(self.line_length);
        let long_lines = longest > max_line_length;
        // more than ~17% non-ascii makes base64 smaller than quoted-printable
        let mostly_binary = (self.eight_bit + self.nulls) * 100 > self.total * 17;
        match constraint {
            EncodingConstraint::SevenBit if self.eight_bit + self.nulls > 0 => {
                if mostly_binary {
                    TransferEncoding::Base64
                } else {
                    TransferEncoding::QuotedPrintable
                }
            }
            EncodingConstraint::SevenBit if long_lines => TransferEncoding::QuotedPrintable,
            EncodingConstraint::EightBit if self.nulls > 0 => {
                if mostly_binary {
                    TransferEncoding::Base64
                } else {
                    TransferEncoding::QuotedPrintable
                }
            }
            EncodingConstraint::EightBit if long_lines => TransferEncoding::QuotedPrintable,
            EncodingConstraint::EightBit if self.eight_bit > 0 => TransferEncoding::EightBit,
            EncodingConstraint::Binary if self.nulls > 0 || long_lines => TransferEncoding::Binary,
            EncodingConstraint::Binary if self.eight_bit > 0 => TransferEncoding::EightBit,
            _ => TransferEncoding::SevenBit,
        }
    }
}

impl ByteTransform for BestEncoding {
    const NAME: &'static str = "BestEncodingFilter";

    fn transform(&mut self, input: &[u8], _flush: bool, output: &mut Vec<u8>) {
        for &byte in input {
            match byte {
                0 => self.nulls += 1,
                0x80..=0xff => self.eight_bit += 1,
                _ => {}
            }
            if byte == b'\n' {
                self.max_line_length = self.max_line_length.max(self.line_length);
                self.line_length = 0;
            } else if byte != b'\r' {
                self.line_length += 1;
            }
        }
        self.total += input.len();
        output.extend_from_slice(input);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
