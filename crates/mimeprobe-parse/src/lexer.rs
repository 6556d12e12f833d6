//! RFC 5322 lexical helpers shared by the header parsers.

use crate::error::ParseError;

const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

pub(crate) fn is_atext(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ATEXT_SPECIALS.contains(ch) || !ch.is_ascii()
}

pub(crate) fn is_token_char(ch: char) -> bool {
    ch.is_ascii_graphic() && !TSPECIALS.contains(ch)
}

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn rewind(&mut self, position: usize) {
        self.position = position;
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position == self.text.len()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            return true;
        }
        false
    }

    pub(crate) fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(self.error(match self.peek() {
            Some(found) => format!("expected '{expected}' but found '{}'", found.escape_debug()),
            None => format!("expected '{expected}' but reached end of input"),
        }))
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(self.position, message)
    }

    /// Skips folding whitespace and (possibly nested) comments.
    pub(crate) fn skip_cfws(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_whitespace() => {
                    self.bump();
                }
                Some('(') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let start = self.position;
        let mut depth = 0_usize;
        while let Some(ch) = self.bump() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '\\' => {
                    self.bump();
                }
                _ => {}
            }
        }
        Err(ParseError::syntax(start, "unterminated comment"))
    }

    /// Consumes a run of characters accepted by `accept`.
    pub(crate) fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(&accept) {
            self.bump();
        }
        &self.text[start..self.position]
    }

    pub(crate) fn atom(&mut self) -> Option<&'a str> {
        Some(self.take_while(is_atext)).filter(|atom| !atom.is_empty())
    }

    pub(crate) fn token(&mut self) -> Option<&'a str> {
        Some(self.take_while(is_token_char)).filter(|token| !token.is_empty())
    }

    /// Parses a quoted string starting at its opening quote.
    pub(crate) fn quoted_string(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        self.expect('"')?;
        let mut value = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                '"' => return Ok(value),
                '\\' => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => break,
                },
                '\r' | '\n' => {}
                _ => value.push(ch),
            }
        }
        Err(ParseError::syntax(start, "unterminated quoted string"))
    }

    /// An atom or a quoted string.
    pub(crate) fn word(&mut self) -> Result<Option<String>, ParseError> {
        if self.peek() == Some('"') {
            return self.quoted_string().map(Some);
        }
        Ok(self.atom().map(str::to_string))
    }

    pub(crate) fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_cfws()?;
        match self.peek() {
            None => Ok(()),
            Some(ch) => Err(self.error(format!("unexpected '{}'", ch.escape_debug()))),
        }
    }
}
