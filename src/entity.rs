use std::borrow::Cow;

use crate::error::Error;

/// A piece of parsed text content.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Chunk<'a> {
    Text(Cow<'a, str>),
    /// A reference to an entity that isn't predefined, like `&nbsp;`.
    Reference(&'a str),
}

// predefined and character references; None for anything else
fn decode_entity(entity: &str) -> Result<Option<char>, Error> {
    let c = match entity {
        "amp" => '&',
        "apos" => '\'',
        "gt" => '>',
        "lt" => '<',
        "quot" => '"',
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse::<u32>().ok()
            } else {
                return Ok(None);
            };
            return code
                .and_then(char::from_u32)
                .map(Some)
                .ok_or_else(|| Error::InvalidEntity(entity.to_string()));
        }
    };
    Ok(Some(c))
}

// split off `name;` after an ampersand, returning the name and the rest
fn split_entity(rest: &str) -> Result<(&str, &str), Error> {
    match rest.find(';') {
        Some(end) => Ok((&rest[..end], &rest[end + 1..])),
        None => Err(Error::UnclosedEntity(rest.to_string())),
    }
}

/// Decode text content. Predefined and character references are
/// replaced; other entity references become their own chunks.
pub(crate) fn parse_text(content: &str) -> Result<Vec<Chunk<'_>>, Error> {
    if !content.contains('&') {
        return Ok(vec![Chunk::Text(Cow::Borrowed(content))]);
    }
    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut rest = content;
    while let Some(start) = rest.find('&') {
        text.push_str(&rest[..start]);
        let (entity, after) = split_entity(&rest[start + 1..])?;
        match decode_entity(entity)? {
            Some(c) => text.push(c),
            None => {
                if !text.is_empty() {
                    chunks.push(Chunk::Text(Cow::Owned(std::mem::take(&mut text))));
                }
                chunks.push(Chunk::Reference(entity));
            }
        }
        rest = after;
    }
    text.push_str(rest);
    if !text.is_empty() {
        chunks.push(Chunk::Text(Cow::Owned(text)));
    }
    Ok(chunks)
}

/// Decode an attribute value. Only predefined and character references
/// are allowed.
pub(crate) fn parse_attribute(content: &str) -> Result<Cow<'_, str>, Error> {
    if !content.contains('&') {
        return Ok(Cow::Borrowed(content));
    }
    let mut result = String::new();
    let mut rest = content;
    while let Some(start) = rest.find('&') {
        result.push_str(&rest[..start]);
        let (entity, after) = split_entity(&rest[start + 1..])?;
        let c = decode_entity(entity)?.ok_or_else(|| Error::InvalidEntity(entity.to_string()))?;
        result.push(c);
        rest = after;
    }
    result.push_str(rest);
    Ok(Cow::Owned(result))
}

fn escape<'a>(content: &'a str, escaped: &[char]) -> Cow<'a, str> {
    if !content.contains(escaped) {
        return Cow::Borrowed(content);
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escaped.contains(&'"') => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

pub(crate) fn serialize_text(content: &str) -> Cow<'_, str> {
    escape(content, &['&', '<', '>'])
}

pub(crate) fn serialize_attribute(content: &str) -> Cow<'_, str> {
    escape(content, &['&', '<', '>', '"'])
}
