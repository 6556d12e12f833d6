//! Byte streams with explicit capability flags.

mod bound;
mod chained;
mod filtered;
mod measuring;
mod memory_block;

use std::io;

use mimeprobe_contract::{MimeStream, SeekOrigin};

pub use bound::BoundStream;
pub use chained::ChainedStream;
pub use filtered::FilteredStream;
pub use measuring::MeasuringStream;
pub use memory_block::{MemoryBlockStream, BLOCK_SIZE};

pub(crate) fn unsupported(stream: &str, operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{stream} does not support {operation}"),
    )
}

/// Resolves a seek request to an absolute position; seeking before the
/// beginning is an I/O error, seeking past the end is allowed.
pub(crate) fn resolve_seek(
    offset: i64,
    origin: SeekOrigin,
    position: u64,
    length: u64,
) -> io::Result<u64> {
    let base = match origin {
        SeekOrigin::Begin => 0,
        SeekOrigin::Current => position,
        SeekOrigin::End => length,
    };
    let base = i64::try_from(base)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "stream position overflow"))?;
    base.checked_add(offset)
        .and_then(|target| u64::try_from(target).ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot seek to {offset} relative to {origin:?}"),
            )
        })
}

/// Length of a seekable stream; the position is restored afterwards.
pub(crate) fn stream_length(stream: &mut dyn MimeStream) -> io::Result<u64> {
    let position = stream.seek(0, SeekOrigin::Current.code())?;
    let length = stream.seek(0, SeekOrigin::End.code())?;
    seek_to(stream, position)?;
    Ok(length)
}

pub(crate) fn seek_to(stream: &mut dyn MimeStream, position: u64) -> io::Result<u64> {
    let position = i64::try_from(position)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "stream position overflow"))?;
    stream.seek(position, SeekOrigin::Begin.code())
}

/// Reads everything remaining in `stream`.
pub fn read_to_end(stream: &mut dyn MimeStream) -> io::Result<Vec<u8>> {
    let mut contents = Vec::new();
    let mut chunk = [0_u8; 512];
    loop {
        let read = stream.read(Some(chunk.as_mut_slice()), 0, 512)?;
        if read == 0 {
            return Ok(contents);
        }
        contents.extend_from_slice(&chunk[..read]);
    }
}
