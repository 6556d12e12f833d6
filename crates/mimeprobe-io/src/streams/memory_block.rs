use std::io;

use mimeprobe_contract::MimeStream;

use super::resolve_seek;
use crate::validation::{stream_read_window, stream_write_window, validate_seek_origin};

pub const BLOCK_SIZE: usize = 2048;

/// In-memory stream backed by fixed-size blocks so that growth never copies
/// existing data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlockStream {
    blocks: Vec<Box<[u8; BLOCK_SIZE]>>,
    position: u64,
    length: u64,
}

impl MemoryBlockStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn position_index(&self) -> io::Result<usize> {
        usize::try_from(self.position).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "position exceeds addressable memory")
        })
    }
}

impl MimeStream for MemoryBlockStream {
    fn name(&self) -> &'static str {
        "MemoryBlockStream"
    }

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, buffer: Option<&mut [u8]>, offset: i32, count: i32) -> io::Result<usize> {
        let window = stream_read_window(buffer, offset, count)?;
        let available = self.length.saturating_sub(self.position);
        let wanted = window.len().min(usize::try_from(available).unwrap_or(usize::MAX));
        let mut copied = 0;
        let mut index = self.position_index()?;
        while copied < wanted {
            let (block, within) = (index / BLOCK_SIZE, index % BLOCK_SIZE);
            let take = (BLOCK_SIZE - within).min(wanted - copied);
            window[copied..copied + take]
                .copy_from_slice(&self.blocks[block][within..within + take]);
            copied += take;
            index += take;
        }
        self.position += copied as u64;
        Ok(copied)
    }

    fn write(&mut self, buffer: Option<&[u8]>, offset: i32, count: i32) -> io::Result<()> {
        let mut data = stream_write_window(buffer, offset, count)?;
        let mut index = self.position_index()?;
        while !data.is_empty() {
            let (block, within) = (index / BLOCK_SIZE, index % BLOCK_SIZE);
            while self.blocks.len() <= block {
                self.blocks.push(Box::new([0_u8; BLOCK_SIZE]));
            }
            let take = (BLOCK_SIZE - within).min(data.len());
            self.blocks[block][within..within + take].copy_from_slice(&data[..take]);
            data = &data[take..];
            index += take;
        }
        self.position = index as u64;
        self.length = self.length.max(self.position);
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: i32) -> io::Result<u64> {
        let origin = validate_seek_origin(origin)?;
        self.position = resolve_seek(offset, origin, self.position, self.length)?;
        Ok(self.position)
    }
}
