use std::io;

use mimeprobe_contract::{ArgumentError, MimeFilter, MimeStream};

use super::unsupported;
use crate::validation::{length_arg, stream_read_window, stream_write_window};

const READ_CHUNK: usize = 4096;

/// Passes everything read from or written to `inner` through a filter chain.
///
/// Written data reaches the inner stream as it is filtered; call
/// [`FilteredStream::flush`] to push out whatever the filters still buffer.
pub struct FilteredStream<S> {
    inner: S,
    filters: Vec<Box<dyn MimeFilter>>,
    readable: Vec<u8>,
    read_offset: usize,
    exhausted: bool,
}

fn apply_filters(
    filters: &mut [Box<dyn MimeFilter>],
    input: &[u8],
    flush: bool,
) -> Result<Vec<u8>, ArgumentError> {
    let mut data = input.to_vec();
    for filter in filters {
        let length = i32::try_from(data.len())
            .map_err(|_| ArgumentError::out_of_range("length", "chunk exceeds i32::MAX bytes"))?;
        let output = if flush {
            filter.flush(Some(data.as_slice()), 0, length)?
        } else {
            filter.filter(Some(data.as_slice()), 0, length)?
        };
        data = output.bytes().to_vec();
    }
    Ok(data)
}

impl<S: MimeStream> FilteredStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            filters: Vec::new(),
            readable: Vec::new(),
            read_offset: 0,
            exhausted: false,
        }
    }

    pub fn add(&mut self, filter: Box<dyn MimeFilter>) {
        self.filters.push(filter);
    }

    pub fn with_filter(mut self, filter: Box<dyn MimeFilter>) -> Self {
        self.add(filter);
        self
    }

    /// Flushes the filter chain into the inner stream.
    pub fn flush(&mut self) -> io::Result<()> {
        let tail = apply_filters(&mut self.filters, &[], true)?;
        self.inner.write(Some(tail.as_slice()), 0, length_arg(tail.len())?)
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn refill(&mut self) -> io::Result<()> {
        let mut chunk = vec![0_u8; READ_CHUNK];
        while self.read_offset == self.readable.len() && !self.exhausted {
            let read = self.inner.read(Some(chunk.as_mut_slice()), 0, length_arg(READ_CHUNK)?)?;
            let flush = read == 0;
            self.readable = apply_filters(&mut self.filters, &chunk[..read], flush)?;
            self.read_offset = 0;
            self.exhausted = flush;
        }
        Ok(())
    }
}

impl<S: MimeStream> MimeStream for FilteredStream<S> {
    fn name(&self) -> &'static str {
        "FilteredStream"
    }

    fn can_read(&self) -> bool {
        self.inner.can_read()
    }

    fn can_write(&self) -> bool {
        self.inner.can_write()
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn read(&mut self, buffer: Option<&mut [u8]>, offset: i32, count: i32) -> io::Result<usize> {
        let window = stream_read_window(buffer, offset, count)?;
        if window.is_empty() {
            return Ok(0);
        }
        self.refill()?;
        let pending = &self.readable[self.read_offset..];
        let copied = pending.len().min(window.len());
        window[..copied].copy_from_slice(&pending[..copied]);
        self.read_offset += copied;
        Ok(copied)
    }

    fn write(&mut self, buffer: Option<&[u8]>, offset: i32, count: i32) -> io::Result<()> {
        let data = stream_write_window(buffer, offset, count)?;
        let filtered = apply_filters(&mut self.filters, data, false)?;
        self.inner
            .write(Some(filtered.as_slice()), 0, length_arg(filtered.len())?)
    }

    fn seek(&mut self, _offset: i64, _origin: i32) -> io::Result<u64> {
        Err(unsupported(self.name(), "seeking"))
    }
}
