//! `Content-Type` and `Content-Disposition` header values.

use crate::error::ParseError;
use crate::lexer::Cursor;
use crate::options::{ParameterCompliance, ParserOptions};
use crate::MimeParse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub media_type: String,
    pub media_subtype: String,
    pub parameters: Vec<Parameter>,
}

impl ContentType {
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.media_type, self.media_subtype)
    }

    pub fn is_mime_type(&self, media_type: &str, media_subtype: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(media_type)
            && (media_subtype == "*" || self.media_subtype.eq_ignore_ascii_case(media_subtype))
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        find_parameter(&self.parameters, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    pub disposition: String,
    pub parameters: Vec<Parameter>,
}

impl ContentDisposition {
    pub fn is_attachment(&self) -> bool {
        self.disposition.eq_ignore_ascii_case("attachment")
    }

    pub fn file_name(&self) -> Option<&str> {
        self.parameter("filename")
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        find_parameter(&self.parameters, name)
    }
}

fn find_parameter<'a>(parameters: &'a [Parameter], name: &str) -> Option<&'a str> {
    parameters
        .iter()
        .find(|parameter| parameter.name.eq_ignore_ascii_case(name))
        .map(|parameter| parameter.value.as_str())
}

fn read_token(cursor: &mut Cursor<'_>, what: &str) -> Result<String, ParseError> {
    cursor.skip_cfws()?;
    cursor
        .token()
        .map(str::to_string)
        .ok_or_else(|| cursor.error(format!("expected {what}")))
}

fn read_value(cursor: &mut Cursor<'_>, options: &ParserOptions) -> Result<String, ParseError> {
    cursor.skip_cfws()?;
    if cursor.peek() == Some('"') {
        return cursor.quoted_string();
    }
    match options.parameter_compliance {
        ParameterCompliance::Strict => read_token(cursor, "a parameter value"),
        ParameterCompliance::Loose => {
            let value = cursor.take_while(|ch| ch != ';' && ch != '\r' && ch != '\n');
            let value = value.trim();
            if value.is_empty() {
                return Err(cursor.error("expected a parameter value"));
            }
            Ok(value.to_string())
        }
    }
}

fn read_parameters(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
) -> Result<Vec<Parameter>, ParseError> {
    let mut parameters = Vec::new();
    loop {
        cursor.skip_cfws()?;
        if cursor.is_at_end() {
            return Ok(parameters);
        }
        cursor.expect(';')?;
        cursor.skip_cfws()?;
        // tolerate a trailing or doubled separator
        if cursor.is_at_end() || cursor.peek() == Some(';') {
            continue;
        }
        let name = read_token(cursor, "a parameter name")?;
        cursor.skip_cfws()?;
        cursor.expect('=')?;
        let value = read_value(cursor, options)?;
        parameters.push(Parameter { name, value });
    }
}

impl MimeParse for ContentType {
    const TYPE_NAME: &'static str = "ContentType";

    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text);
        let media_type = read_token(&mut cursor, "a media type")?;
        cursor.skip_cfws()?;
        cursor.expect('/')?;
        let media_subtype = read_token(&mut cursor, "a media subtype")?;
        let parameters = read_parameters(&mut cursor, options)?;
        Ok(Self {
            media_type,
            media_subtype,
            parameters,
        })
    }
}

impl MimeParse for ContentDisposition {
    const TYPE_NAME: &'static str = "ContentDisposition";

    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text);
        let disposition = read_token(&mut cursor, "a disposition")?;
        let parameters = read_parameters(&mut cursor, options)?;
        Ok(Self {
            disposition,
            parameters,
        })
    }
}
