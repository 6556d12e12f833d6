//! Shared argument validation for filters, streams and parsers.

use mimeprobe_contract::{ArgumentError, SeekOrigin};

/// Validates a (buffer, start_index, length) window and returns the selected bytes.
pub fn validate_buffer_window(
    input: Option<&[u8]>,
    start_index: i32,
    length: i32,
) -> Result<&[u8], ArgumentError> {
    let input = input.ok_or_else(|| ArgumentError::missing("buffer"))?;
    let (start, length) =
        validate_range(input.len(), start_index, length, "start_index", "length")?;
    Ok(&input[start..start + length])
}

/// Validates a (buffer, start_index) pair and returns the bytes from `start_index` on.
pub fn validate_buffer_tail(
    input: Option<&[u8]>,
    start_index: i32,
) -> Result<&[u8], ArgumentError> {
    let input = input.ok_or_else(|| ArgumentError::missing("buffer"))?;
    let start = validate_start(input.len(), start_index, "start_index")?;
    Ok(&input[start..])
}

/// Validates a stream (offset, count) pair against a buffer of `buffer_len` bytes.
pub fn validate_stream_arguments(
    buffer_len: Option<usize>,
    offset: i32,
    count: i32,
) -> Result<(usize, usize), ArgumentError> {
    let buffer_len = buffer_len.ok_or_else(|| ArgumentError::missing("buffer"))?;
    validate_range(buffer_len, offset, count, "offset", "count")
}

/// Validates stream read arguments and returns the writable window.
pub fn stream_read_window(
    buffer: Option<&mut [u8]>,
    offset: i32,
    count: i32,
) -> Result<&mut [u8], ArgumentError> {
    let buffer = buffer.ok_or_else(|| ArgumentError::missing("buffer"))?;
    let (offset, count) = validate_stream_arguments(Some(buffer.len()), offset, count)?;
    Ok(&mut buffer[offset..offset + count])
}

/// Validates stream write arguments and returns the bytes to write.
pub fn stream_write_window(
    buffer: Option<&[u8]>,
    offset: i32,
    count: i32,
) -> Result<&[u8], ArgumentError> {
    let buffer = buffer.ok_or_else(|| ArgumentError::missing("buffer"))?;
    let (offset, count) = validate_stream_arguments(Some(buffer.len()), offset, count)?;
    Ok(&buffer[offset..offset + count])
}

pub fn validate_seek_origin(origin: i32) -> Result<SeekOrigin, ArgumentError> {
    SeekOrigin::from_code(origin).ok_or_else(|| {
        ArgumentError::out_of_range("origin", format!("{origin} is not a valid seek origin"))
    })
}

fn validate_start(
    buffer_len: usize,
    start: i32,
    name: &'static str,
) -> Result<usize, ArgumentError> {
    usize::try_from(start)
        .ok()
        .filter(|start| *start <= buffer_len)
        .ok_or_else(|| {
            ArgumentError::out_of_range(
                name,
                format!("{start} is outside a buffer of {buffer_len} bytes"),
            )
        })
}

fn validate_range(
    buffer_len: usize,
    start: i32,
    length: i32,
    start_name: &'static str,
    length_name: &'static str,
) -> Result<(usize, usize), ArgumentError> {
    let start = validate_start(buffer_len, start, start_name)?;
    let length = usize::try_from(length)
        .ok()
        .filter(|length| *length <= buffer_len - start)
        .ok_or_else(|| {
            ArgumentError::out_of_range(
                length_name,
                format!("{length} exceeds the {} bytes after {start_name}", buffer_len - start),
            )
        })?;
    Ok((start, length))
}

/// Converts an internal length into the signed argument form operations accept.
pub(crate) fn length_arg(len: usize) -> std::io::Result<i32> {
    i32::try_from(len).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("chunk of {len} bytes exceeds the maximum argument length"),
        )
    })
}
