//! Reference MIME header parsers.
//!
//! Each type exposes the same family of `parse*` entry points. They validate
//! their arguments before parsing and publish themselves to the contract
//! harness through [`parse_surface`].

mod address;
mod content;
mod error;
mod lexer;
mod options;
mod surface;

use mimeprobe_contract::ArgumentError;
use mimeprobe_io::validation::{validate_buffer_tail, validate_buffer_window};

pub use address::{GroupAddress, InternetAddress, InternetAddressList, MailboxAddress};
pub use content::{ContentDisposition, ContentType, Parameter};
pub use error::ParseError;
pub use options::{ParameterCompliance, ParserOptions};
pub use surface::{parse_surface, reference_surfaces};

fn require_options(options: Option<&ParserOptions>) -> Result<&ParserOptions, ParseError> {
    options.ok_or_else(|| ArgumentError::missing("options").into())
}

/// Header value types parsed from raw bytes or text.
pub trait MimeParse: Sized {
    const TYPE_NAME: &'static str;

    /// Parses an already validated header value.
    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError>;

    fn parse_with_options_range(
        options: Option<&ParserOptions>,
        buffer: Option<&[u8]>,
        start_index: i32,
        length: i32,
    ) -> Result<Self, ParseError> {
        let options = require_options(options)?;
        let window = validate_buffer_window(buffer, start_index, length)?;
        Self::parse_text(options, &String::from_utf8_lossy(window))
    }

    fn parse_range(
        buffer: Option<&[u8]>,
        start_index: i32,
        length: i32,
    ) -> Result<Self, ParseError> {
        Self::parse_with_options_range(Some(&ParserOptions::default()), buffer, start_index, length)
    }

    fn parse_with_options_from(
        options: Option<&ParserOptions>,
        buffer: Option<&[u8]>,
        start_index: i32,
    ) -> Result<Self, ParseError> {
        let options = require_options(options)?;
        let tail = validate_buffer_tail(buffer, start_index)?;
        Self::parse_text(options, &String::from_utf8_lossy(tail))
    }

    fn parse_from(buffer: Option<&[u8]>, start_index: i32) -> Result<Self, ParseError> {
        Self::parse_with_options_from(Some(&ParserOptions::default()), buffer, start_index)
    }

    fn parse_with_options_bytes(
        options: Option<&ParserOptions>,
        buffer: Option<&[u8]>,
    ) -> Result<Self, ParseError> {
        let options = require_options(options)?;
        let buffer = buffer.ok_or_else(|| ArgumentError::missing("buffer"))?;
        Self::parse_text(options, &String::from_utf8_lossy(buffer))
    }

    fn parse_bytes(buffer: Option<&[u8]>) -> Result<Self, ParseError> {
        Self::parse_with_options_bytes(Some(&ParserOptions::default()), buffer)
    }

    fn parse_with_options_str(
        options: Option<&ParserOptions>,
        text: Option<&str>,
    ) -> Result<Self, ParseError> {
        let options = require_options(options)?;
        let text = text.ok_or_else(|| ArgumentError::missing("text"))?;
        Self::parse_text(options, text)
    }

    fn parse_str(text: Option<&str>) -> Result<Self, ParseError> {
        Self::parse_with_options_str(Some(&ParserOptions::default()), text)
    }

    /// Parses `text`, discarding the reason for any failure.
    fn try_parse_str(text: &str) -> Option<Self> {
        Self::parse_text(&ParserOptions::default(), text).ok()
    }
}
