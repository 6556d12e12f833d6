//! Reference MIME filters and streams.
//!
//! Every public operation validates its arguments before doing any work and
//! reports violations as [`mimeprobe_contract::ArgumentError`]s, wrapped in
//! `io::Error` for stream operations.

pub mod filters;
pub mod streams;
pub mod validation;

use mimeprobe_contract::{MimeFilter, MimeStream};

use filters::{
    ArmoredFromFilter, BestEncodingFilter, CharsetConverter, CharsetFilter, ContentEncoding,
    DecoderFilter, DkimRelaxedBodyFilter, DkimSimpleBodyFilter, Dos2UnixFilter, EncoderFilter,
    TrailingWhitespaceFilter, Unix2DosFilter,
};
use streams::{BoundStream, ChainedStream, FilteredStream, MeasuringStream, MemoryBlockStream};

/// One fresh instance of every filter in this crate.
pub fn reference_filters() -> Vec<Box<dyn MimeFilter>> {
    let mut filters: Vec<Box<dyn MimeFilter>> = vec![
        Box::new(Dos2UnixFilter::default()),
        Box::new(Unix2DosFilter::default()),
        Box::new(ArmoredFromFilter::default()),
        Box::new(BestEncodingFilter::default()),
        Box::new(CharsetFilter::new(CharsetConverter::latin1_to_utf8())),
        Box::new(TrailingWhitespaceFilter::default()),
        Box::new(DkimRelaxedBodyFilter::default()),
        Box::new(DkimSimpleBodyFilter::default()),
    ];
    for encoding in ContentEncoding::ALL {
        filters.push(EncoderFilter::create(encoding));
        filters.push(DecoderFilter::create(encoding));
    }
    filters
}

/// One fresh instance of every stream in this crate, composite streams
/// wrapping an empty [`MemoryBlockStream`].
pub fn reference_streams() -> Vec<Box<dyn MimeStream>> {
    vec![
        Box::new(MeasuringStream::new()),
        Box::new(MemoryBlockStream::new()),
        Box::new(FilteredStream::new(MemoryBlockStream::new())),
        Box::new(BoundStream::unbounded(MemoryBlockStream::new())),
        Box::new(ChainedStream::new().with_stream(Box::new(MemoryBlockStream::new()))),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{reference_filters, reference_streams};

    #[test]
    fn unit_reference_sets_have_distinct_names() {
        let filters = reference_filters();
        let names = filters.iter().map(|filter| filter.name()).collect::<BTreeSet<_>>();
        assert_eq!(names.len(), filters.len());
        assert_eq!(filters.len(), 14);

        let streams = reference_streams();
        let names = streams.iter().map(|stream| stream.name()).collect::<BTreeSet<_>>();
        assert_eq!(names.len(), streams.len());
    }
}
