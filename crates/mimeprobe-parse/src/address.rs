//! RFC 5322 address parsing.

use std::fmt;

use crate::error::ParseError;
use crate::lexer::Cursor;
use crate::options::ParserOptions;
use crate::MimeParse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxAddress {
    pub name: Option<String>,
    pub local_part: String,
    pub domain: Option<String>,
}

impl MailboxAddress {
    pub fn address(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}@{domain}", self.local_part),
            None => self.local_part.clone(),
        }
    }
}

impl fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address()),
            None => f.write_str(&self.address()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAddress {
    pub name: String,
    pub members: Vec<InternetAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternetAddress {
    Mailbox(MailboxAddress),
    Group(GroupAddress),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternetAddressList(pub Vec<InternetAddress>);

impl InternetAddressList {
    pub fn mailboxes(&self) -> impl Iterator<Item = &MailboxAddress> {
        fn flatten<'a>(
            address: &'a InternetAddress,
        ) -> Box<dyn Iterator<Item = &'a MailboxAddress> + 'a> {
            match address {
                InternetAddress::Mailbox(mailbox) => Box::new(std::iter::once(mailbox)),
                InternetAddress::Group(group) => Box::new(group.members.iter().flat_map(flatten)),
            }
        }
        self.0.iter().flat_map(flatten)
    }
}

/// Phrase words as display text plus the dot-joined form used when the
/// phrase turns out to be a local part.
struct Phrase {
    display: String,
    local_part: String,
}

fn read_phrase(cursor: &mut Cursor<'_>) -> Result<Phrase, ParseError> {
    let mut phrase = Phrase {
        display: String::new(),
        local_part: String::new(),
    };
    loop {
        cursor.skip_cfws()?;
        if cursor.eat('.') {
            phrase.display.push('.');
            phrase.local_part.push('.');
            continue;
        }
        match cursor.word()? {
            Some(word) => {
                if !phrase.display.is_empty() && !phrase.display.ends_with('.') {
                    phrase.display.push(' ');
                }
                phrase.display.push_str(&word);
                phrase.local_part.push_str(&word);
            }
            None => return Ok(phrase),
        }
    }
}

fn read_domain(cursor: &mut Cursor<'_>) -> Result<String, ParseError> {
    cursor.skip_cfws()?;
    if cursor.peek() == Some('[') {
        let literal = cursor.take_while(|ch| ch != ']' && ch != '\r' && ch != '\n');
        cursor.expect(']')?;
        return Ok(format!("{literal}]"));
    }
    let mut labels = Vec::new();
    loop {
        cursor.skip_cfws()?;
        match cursor.atom() {
            Some(label) => labels.push(label),
            None => return Err(cursor.error("expected a domain label")),
        }
        cursor.skip_cfws()?;
        if !cursor.eat('.') {
            return Ok(labels.join("."));
        }
    }
}

fn read_angle_addr(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
    name: Option<String>,
) -> Result<MailboxAddress, ParseError> {
    cursor.expect('<')?;
    cursor.skip_cfws()?;
    // obsolete source route: <@relay1,@relay2:user@host>
    if cursor.peek() == Some('@') {
        cursor.take_while(|ch| ch != ':' && ch != '>');
        cursor.expect(':')?;
    }
    let local = read_phrase(cursor)?.local_part;
    if local.is_empty() {
        return Err(cursor.error("expected a local part"));
    }
    let domain = if cursor.eat('@') {
        Some(read_domain(cursor)?)
    } else if options.allow_addresses_without_domain {
        None
    } else {
        return Err(cursor.error("expected '@' in address"));
    };
    cursor.skip_cfws()?;
    cursor.expect('>')?;
    Ok(MailboxAddress {
        name,
        local_part: local,
        domain,
    })
}

fn read_mailbox(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
) -> Result<MailboxAddress, ParseError> {
    let phrase = read_phrase(cursor)?;
    cursor.skip_cfws()?;
    match cursor.peek() {
        Some('<') => {
            let name = Some(phrase.display).filter(|name| !name.is_empty());
            read_angle_addr(cursor, options, name)
        }
        Some('@') if !phrase.local_part.is_empty() => {
            cursor.bump();
            Ok(MailboxAddress {
                name: None,
                local_part: phrase.local_part,
                domain: Some(read_domain(cursor)?),
            })
        }
        _ if options.allow_addresses_without_domain
            && !phrase.local_part.is_empty()
            && !phrase.display.contains(' ') =>
        {
            Ok(MailboxAddress {
                name: None,
                local_part: phrase.local_part,
                domain: None,
            })
        }
        _ => Err(cursor.error("expected '@' or '<' in mailbox")),
    }
}

fn read_group(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
    depth: usize,
) -> Result<GroupAddress, ParseError> {
    if depth > options.max_address_group_depth {
        return Err(ParseError::GroupTooDeep {
            limit: options.max_address_group_depth,
        });
    }
    let name = read_phrase(cursor)?.display;
    cursor.skip_cfws()?;
    cursor.expect(':')?;
    let mut members = Vec::new();
    loop {
        cursor.skip_cfws()?;
        if cursor.eat(';') {
            return Ok(GroupAddress { name, members });
        }
        if cursor.eat(',') {
            continue;
        }
        if cursor.is_at_end() {
            return Err(cursor.error("unterminated group"));
        }
        members.push(read_address(cursor, options, depth + 1)?);
    }
}

fn read_address(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
    depth: usize,
) -> Result<InternetAddress, ParseError> {
    let start = cursor.position();
    read_phrase(cursor)?;
    cursor.skip_cfws()?;
    let is_group = cursor.peek() == Some(':');
    cursor.rewind(start);
    if is_group {
        read_group(cursor, options, depth).map(InternetAddress::Group)
    } else {
        read_mailbox(cursor, options).map(InternetAddress::Mailbox)
    }
}

fn read_address_list(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
) -> Result<InternetAddressList, ParseError> {
    let mut addresses = Vec::new();
    loop {
        cursor.skip_cfws()?;
        if cursor.is_at_end() {
            return Ok(InternetAddressList(addresses));
        }
        if cursor.eat(',') {
            continue;
        }
        addresses.push(read_address(cursor, options, 0)?);
        cursor.skip_cfws()?;
        if !cursor.is_at_end() {
            cursor.expect(',')?;
        }
    }
}

impl MimeParse for InternetAddressList {
    const TYPE_NAME: &'static str = "InternetAddressList";

    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError> {
        read_address_list(&mut Cursor::new(text), options)
    }
}

impl MimeParse for InternetAddress {
    const TYPE_NAME: &'static str = "InternetAddress";

    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text);
        cursor.skip_cfws()?;
        let address = read_address(&mut cursor, options, 0)?;
        cursor.expect_end()?;
        Ok(address)
    }
}

impl MimeParse for MailboxAddress {
    const TYPE_NAME: &'static str = "MailboxAddress";

    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text);
        let mailbox = read_mailbox(&mut cursor, options)?;
        cursor.expect_end()?;
        Ok(mailbox)
    }
}

impl MimeParse for GroupAddress {
    const TYPE_NAME: &'static str = "GroupAddress";

    fn parse_text(options: &ParserOptions, text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text);
        let group = read_group(&mut cursor, options, 0)?;
        cursor.expect_end()?;
        Ok(group)
    }
}
