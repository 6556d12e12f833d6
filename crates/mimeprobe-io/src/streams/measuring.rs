use std::io;

use mimeprobe_contract::MimeStream;

use super::{resolve_seek, unsupported};
use crate::validation::{stream_write_window, validate_seek_origin};

/// Write-only stream that discards data and records how much was written.
#[derive(Debug, Clone, Default)]
pub struct MeasuringStream {
    position: u64,
    length: u64,
}

impl MeasuringStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn position(&self) -> u64 {
        self.position
    }
}

impl MimeStream for MeasuringStream {
    fn name(&self) -> &'static str {
        "MeasuringStream"
    }

    fn can_read(&self) -> bool {
        false
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, _buffer: Option<&mut [u8]>, _offset: i32, _count: i32) -> io::Result<usize> {
        Err(unsupported(self.name(), "reading"))
    }

    fn write(&mut self, buffer: Option<&[u8]>, offset: i32, count: i32) -> io::Result<()> {
        let window = stream_write_window(buffer, offset, count)?;
        self.position += window.len() as u64;
        self.length = self.length.max(self.position);
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: i32) -> io::Result<u64> {
        let origin = validate_seek_origin(origin)?;
        self.position = resolve_seek(offset, origin, self.position, self.length)?;
        Ok(self.position)
    }
}
