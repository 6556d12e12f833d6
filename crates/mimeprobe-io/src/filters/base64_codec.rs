use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use super::ByteTransform;

/// Raw bytes per encoded line; 57 bytes encode to 76 characters.
pub const BASE64_LINE_BYTES: usize = 57;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Default)]
pub struct Base64Encoder {
    pending: Vec<u8>,
}

impl ByteTransform for Base64Encoder {
    const NAME: &'static str = "Base64Encoder";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        self.pending.extend_from_slice(input);
        let full = self.pending.len() / BASE64_LINE_BYTES * BASE64_LINE_BYTES;
        for line in self.pending[..full].chunks(BASE64_LINE_BYTES) {
            output.extend_from_slice(STANDARD.encode(line).as_bytes());
            output.push(b'\n');
        }
        self.pending.drain(..full);
        if flush && !self.pending.is_empty() {
            output.extend_from_slice(STANDARD.encode(&self.pending).as_bytes());
            output.push(b'\n');
            self.pending.clear();
        }
    }

    fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Decodes base64 text, skipping line breaks and other characters outside
/// the alphabet.
#[derive(Debug, Clone, Default)]
pub struct Base64Decoder {
    quads: Vec<u8>,
}

fn is_base64_symbol(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/'
}

impl Base64Decoder {
    fn decode_into(symbols: &[u8], output: &mut Vec<u8>) {
        // a lone trailing symbol carries no complete byte
        let usable = if symbols.len() % 4 == 1 {
            &symbols[..symbols.len() - 1]
        } else {
            symbols
        };
        if let Ok(decoded) = LENIENT.decode(usable) {
            output.extend_from_slice(&decoded);
        }
    }
}

impl ByteTransform for Base64Decoder {
    const NAME: &'static str = "Base64Decoder";

    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>) {
        self.quads
            .extend(input.iter().copied().filter(|byte| is_base64_symbol(*byte)));
        let complete = self.quads.len() / 4 * 4;
        Self::decode_into(&self.quads[..complete], output);
        self.quads.drain(..complete);
        if flush {
            Self::decode_into(&self.quads, output);
            self.quads.clear();
        }
    }

    fn reset(&mut self) {
        self.quads.clear();
    }
}
