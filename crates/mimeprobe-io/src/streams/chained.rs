use std::io;

use mimeprobe_contract::MimeStream;

use super::{resolve_seek, seek_to, stream_length, unsupported};
use crate::validation::{length_arg, stream_read_window, validate_seek_origin};

/// Read-only concatenation of several streams.
#[derive(Default)]
pub struct ChainedStream {
    streams: Vec<Box<dyn MimeStream>>,
    current: usize,
    position: u64,
}

impl ChainedStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stream: Box<dyn MimeStream>) {
        self.streams.push(stream);
    }

    pub fn with_stream(mut self, stream: Box<dyn MimeStream>) -> Self {
        self.add(stream);
        self
    }

    fn lengths(&mut self) -> io::Result<Vec<u64>> {
        self.streams
            .iter_mut()
            .map(|stream| stream_length(stream.as_mut()))
            .collect()
    }
}

impl MimeStream for ChainedStream {
    fn name(&self) -> &'static str {
        "ChainedStream"
    }

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        false
    }

    fn can_seek(&self) -> bool {
        self.streams.iter().all(|stream| stream.can_seek())
    }

    fn read(&mut self, buffer: Option<&mut [u8]>, offset: i32, count: i32) -> io::Result<usize> {
        let window = stream_read_window(buffer, offset, count)?;
        let mut filled = 0;
        while filled < window.len() && self.current < self.streams.len() {
            let target = &mut window[filled..];
            let length = length_arg(target.len())?;
            let read = self.streams[self.current].read(Some(target), 0, length)?;
            if read == 0 {
                self.current += 1;
                if let Some(next) = self.streams.get_mut(self.current) {
                    if next.can_seek() {
                        seek_to(next.as_mut(), 0)?;
                    }
                }
                continue;
            }
            filled += read;
        }
        self.position += filled as u64;
        Ok(filled)
    }

    fn write(&mut self, _buffer: Option<&[u8]>, _offset: i32, _count: i32) -> io::Result<()> {
        Err(unsupported(self.name(), "writing"))
    }

    fn seek(&mut self, offset: i64, origin: i32) -> io::Result<u64> {
        let origin = validate_seek_origin(origin)?;
        if !self.can_seek() {
            return Err(unsupported(self.name(), "seeking"));
        }
        let lengths = self.lengths()?;
        let total = lengths.iter().sum();
        let target = resolve_seek(offset, origin, self.position, total)?;

        let mut skipped = 0;
        self.current = self.streams.len();
        for (index, length) in lengths.iter().enumerate() {
            if target < skipped + length || index + 1 == lengths.len() {
                seek_to(self.streams[index].as_mut(), target - skipped)?;
                self.current = index;
                break;
            }
            skipped += length;
        }
        self.position = target;
        Ok(target)
    }
}
