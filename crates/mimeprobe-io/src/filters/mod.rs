//! Streaming byte filters.
//!
//! Each filter is a [`ByteTransform`] wrapped in a [`TransformFilter`], which
//! owns argument validation and the output buffer.

mod base64_codec;
mod best_encoding;
mod charset;
mod dkim;
mod line_endings;
mod quoted_printable;
mod uuencode;

use mimeprobe_contract::{ArgumentError, FilterOutput, MimeFilter};

use crate::validation::validate_buffer_window;

pub use base64_codec::{Base64Decoder, Base64Encoder};
pub use best_encoding::{
    BestEncoding, EncodingConstraint, TransferEncoding, DEFAULT_MAX_LINE_LENGTH,
};
pub use charset::{CharsetConverter, CharsetError};
pub use dkim::{DkimRelaxedBody, DkimSimpleBody};
pub use line_endings::{ArmoredFrom, Dos2Unix, TrailingWhitespace, Unix2Dos};
pub use quoted_printable::{QuotedPrintableDecoder, QuotedPrintableEncoder};
pub use uuencode::{UuDecoder, UuEncoder};

/// Incremental transform driven by a [`TransformFilter`].
pub trait ByteTransform {
    const NAME: &'static str;

    /// Appends the transform of `input` to `output`; `flush` marks end of input.
    fn transform(&mut self, input: &[u8], flush: bool, output: &mut Vec<u8>);

    fn reset(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct TransformFilter<T> {
    transform: T,
    output: Vec<u8>,
}

impl<T: ByteTransform> TransformFilter<T> {
    pub fn new(transform: T) -> Self {
        Self {
            transform,
            output: Vec::new(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.transform
    }

    fn run<'a>(
        &'a mut self,
        input: Option<&'a [u8]>,
        start_index: i32,
        length: i32,
        flush: bool,
    ) -> Result<FilterOutput<'a>, ArgumentError> {
        let window = validate_buffer_window(input, start_index, length)?;
        self.output.clear();
        self.transform.transform(window, flush, &mut self.output);
        Ok(FilterOutput::whole(&self.output))
    }
}

impl<T: ByteTransform> MimeFilter for TransformFilter<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn filter<'a>(
        &'a mut self,
        input: Option<&'a [u8]>,
        start_index: i32,
        length: i32,
    ) -> Result<FilterOutput<'a>, ArgumentError> {
        self.run(input, start_index, length, false)
    }

    fn flush<'a>(
        &'a mut self,
        input: Option<&'a [u8]>,
        start_index: i32,
        length: i32,
    ) -> Result<FilterOutput<'a>, ArgumentError> {
        self.run(input, start_index, length, true)
    }

    fn reset(&mut self) {
        self.output.clear();
        self.transform.reset();
    }
}

pub type Dos2UnixFilter = TransformFilter<Dos2Unix>;
pub type Unix2DosFilter = TransformFilter<Unix2Dos>;
pub type ArmoredFromFilter = TransformFilter<ArmoredFrom>;
pub type TrailingWhitespaceFilter = TransformFilter<TrailingWhitespace>;
pub type BestEncodingFilter = TransformFilter<BestEncoding>;
pub type CharsetFilter = TransformFilter<CharsetConverter>;
pub type DkimSimpleBodyFilter = TransformFilter<DkimSimpleBody>;
pub type DkimRelaxedBodyFilter = TransformFilter<DkimRelaxedBody>;

impl CharsetFilter {
    pub fn create(from: &str, to: &str) -> Result<Self, CharsetError> {
        Ok(Self::new(CharsetConverter::new(from, to)?))
    }
}

/// Transfer encodings with an encoder and decoder filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentEncoding {
    Base64,
    QuotedPrintable,
    UuEncode,
}

impl ContentEncoding {
    pub const ALL: [ContentEncoding; 3] = [
        ContentEncoding::Base64,
        ContentEncoding::QuotedPrintable,
        ContentEncoding::UuEncode,
    ];
}

pub struct EncoderFilter;

impl EncoderFilter {
    pub fn create(encoding: ContentEncoding) -> Box<dyn MimeFilter> {
        match encoding {
            ContentEncoding::Base64 => Box::new(TransformFilter::new(Base64Encoder::default())),
            ContentEncoding::QuotedPrintable => {
                Box::new(TransformFilter::new(QuotedPrintableEncoder::default()))
            }
            ContentEncoding::UuEncode => Box::new(TransformFilter::new(UuEncoder::default())),
        }
    }
}

pub struct DecoderFilter;

impl DecoderFilter {
    pub fn create(encoding: ContentEncoding) -> Box<dyn MimeFilter> {
        match encoding {
            ContentEncoding::Base64 => Box::new(TransformFilter::new(Base64Decoder::default())),
            ContentEncoding::QuotedPrintable => {
                Box::new(TransformFilter::new(QuotedPrintableDecoder::default()))
            }
            ContentEncoding::UuEncode => Box::new(TransformFilter::new(UuDecoder::default())),
        }
    }
}

/// Runs `input` through `filter` in one chunk followed by a flush.
pub fn filter_all(filter: &mut dyn MimeFilter, input: &[u8]) -> Result<Vec<u8>, ArgumentError> {
    let length = i32::try_from(input.len())
        .map_err(|_| ArgumentError::out_of_range("length", "input exceeds i32::MAX bytes"))?;
    let mut output = filter.filter(Some(input), 0, length)?.bytes().to_vec();
    output.extend_from_slice(filter.flush(Some(&[]), 0, 0)?.bytes());
    Ok(output)
}
