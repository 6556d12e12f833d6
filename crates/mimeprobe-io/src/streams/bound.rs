use std::io;

use mimeprobe_contract::{ArgumentError, MimeStream};

use super::{resolve_seek, seek_to, stream_length};
use crate::validation::{
    length_arg, stream_read_window, stream_write_window, validate_seek_origin,
};

/// Window `[start, end)` over an inner seekable stream; `end == -1` leaves the
/// window open to the end of the inner stream.
pub struct BoundStream<S> {
    inner: S,
    start: u64,
    end: Option<u64>,
    position: u64,
}

impl<S: MimeStream> BoundStream<S> {
    pub fn new(inner: S, start: i64, end: i64) -> Result<Self, ArgumentError> {
        let start = u64::try_from(start)
            .map_err(|_| ArgumentError::out_of_range("start", format!("{start} is negative")))?;
        let end = match end {
            -1 => None,
            end => Some(
                u64::try_from(end)
                    .ok()
                    .filter(|end| *end >= start)
                    .ok_or_else(|| {
                        ArgumentError::out_of_range(
                            "end",
                            format!("{end} must be -1 or not less than start {start}"),
                        )
                    })?,
            ),
        };
        Ok(Self {
            inner,
            start,
            end,
            position: 0,
        })
    }

    /// Window covering the whole inner stream.
    pub fn unbounded(inner: S) -> Self {
        Self {
            inner,
            start: 0,
            end: None,
            position: 0,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn bound_length(&mut self) -> io::Result<u64> {
        match self.end {
            Some(end) => Ok(end - self.start),
            None => Ok(stream_length(&mut self.inner)?.saturating_sub(self.start)),
        }
    }

    /// Bytes left before the upper bound, or `None` when unbounded.
    fn remaining(&self) -> Option<u64> {
        self.end
            .map(|end| (end - self.start).saturating_sub(self.position))
    }
}

impl<S: MimeStream> MimeStream for BoundStream<S> {
    fn name(&self) -> &'static str {
        "BoundStream"
    }

    fn can_read(&self) -> bool {
        self.inner.can_read()
    }

    fn can_write(&self) -> bool {
        self.inner.can_write()
    }

    fn can_seek(&self) -> bool {
        self.inner.can_seek()
    }

    fn read(&mut self, buffer: Option<&mut [u8]>, offset: i32, count: i32) -> io::Result<usize> {
        let window = stream_read_window(buffer, offset, count)?;
        let wanted = match self.remaining() {
            Some(remaining) => {
                window.len().min(usize::try_from(remaining).unwrap_or(usize::MAX))
            }
            None => window.len(),
        };
        if wanted == 0 {
            return Ok(0);
        }
        seek_to(&mut self.inner, self.start + self.position)?;
        let read = self
            .inner
            .read(Some(&mut window[..wanted]), 0, length_arg(wanted)?)?;
        self.position += read as u64;
        Ok(read)
    }

    fn write(&mut self, buffer: Option<&[u8]>, offset: i32, count: i32) -> io::Result<()> {
        let data = stream_write_window(buffer, offset, count)?;
        if self
            .remaining()
            .is_some_and(|remaining| data.len() as u64 > remaining)
        {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write would extend past the end of the bound stream",
            ));
        }
        seek_to(&mut self.inner, self.start + self.position)?;
        self.inner.write(Some(data), 0, length_arg(data.len())?)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: i32) -> io::Result<u64> {
        let origin = validate_seek_origin(origin)?;
        let length = self.bound_length()?;
        let target = resolve_seek(offset, origin, self.position, length)?;
        if self.end.is_some() && target > length {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot seek to {target} past the end of a {length}-byte window"),
            ));
        }
        self.position = target;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use mimeprobe_contract::{ArgumentErrorKind, MimeStream, SeekOrigin};

    use super::BoundStream;
    use crate::streams::{read_to_end, MemoryBlockStream};

    fn backing(contents: &[u8]) -> MemoryBlockStream {
        let mut stream = MemoryBlockStream::new();
        let length = i32::try_from(contents.len()).expect("fits");
        stream.write(Some(contents), 0, length).expect("write");
        stream
    }

    #[test]
    fn functional_bounded_window_reads_only_its_slice() {
        let mut stream = BoundStream::new(backing(b"0123456789"), 2, 6).expect("bound");
        assert_eq!(read_to_end(&mut stream).expect("read"), b"2345");
        assert_eq!(stream.seek(-1, SeekOrigin::End.code()).expect("seek"), 3);
        assert_eq!(read_to_end(&mut stream).expect("read"), b"5");
    }

    #[test]
    fn functional_unbounded_window_extends_to_inner_end() {
        let mut stream = BoundStream::new(backing(b"0123456789"), 7, -1).expect("bound");
        assert_eq!(read_to_end(&mut stream).expect("read"), b"789");
        assert_eq!(stream.seek(0, SeekOrigin::End.code()).expect("seek"), 3);
    }

    #[test]
    fn unit_constructor_rejects_inverted_bounds() {
        let error = BoundStream::new(MemoryBlockStream::new(), 5, 4)
            .err()
            .expect("inverted");
        assert_eq!(error.kind(), ArgumentErrorKind::OutOfRange);
        assert_eq!(error.parameter(), "end");
        let error = BoundStream::new(MemoryBlockStream::new(), -2, -1)
            .err()
            .expect("negative start");
        assert_eq!(error.parameter(), "start");
    }

    #[test]
    fn regression_write_past_bound_is_refused() {
        let mut stream = BoundStream::new(backing(b"abcdef"), 1, 3).expect("bound");
        stream.write(Some(b"XY"), 0, 2).expect("fits");
        let error = stream.write(Some(b"Z"), 0, 1).expect_err("past end");
        assert_eq!(error.kind(), std::io::ErrorKind::WriteZero);
        let mut inner = stream.into_inner();
        inner.seek(0, SeekOrigin::Begin.code()).expect("rewind");
        assert_eq!(read_to_end(&mut inner).expect("read"), b"aXYdef");
    }
}
