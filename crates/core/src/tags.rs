//! Field annotation grammar and the per-key tag index
//!
//! Annotations are `key:"value"` pairs separated by whitespace, or by a
//! single `,` or `;` with optional surrounding whitespace:
//!
//! ```text
//! tag   := pair (sep pair)*
//! sep   := ws+ | ws* (',' | ';') ws*
//! pair  := key ':' '"' value '"'
//! key   := [A-Za-z0-9_.-]+
//! value := (any char except '"' | '\"' | '\\')*
//! ```
//!
//! Keys are matched case-insensitively. Values may span lines.

use crate::error::TagSyntaxError;
use crate::record::{FieldDescriptor, Record};
use std::borrow::Cow;

/// Selector meaning "this field is not extracted here"
pub const EXCLUDED_SELECTOR: &str = "-";

/// Selector suffix marking a field reserved for nested/related extraction
pub const RELATED_SUFFIX: &str = "[..]";

/// One parsed `key:"value"` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair<'a> {
    pub key: &'a str,
    pub value: Cow<'a, str>,
}

/// A parsed annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags<'a> {
    pairs: Vec<TagPair<'a>>,
}

impl<'a> Tags<'a> {
    /// Parse an annotation string
    pub fn parse(raw: &'a str) -> Result<Self, TagSyntaxError> {
        let bytes = raw.as_bytes();
        let mut pairs = Vec::new();
        let mut pos = skip_whitespace(bytes, 0);

        while pos < bytes.len() {
            let key_start = pos;
            while pos < bytes.len() && is_key_byte(bytes[pos]) {
                pos += 1;
            }
            if pos == key_start {
                return Err(TagSyntaxError::new(raw, pos, "expected annotation key"));
            }
            let key = &raw[key_start..pos];

            if bytes.get(pos) != Some(&b':') {
                return Err(TagSyntaxError::new(
                    raw,
                    pos,
                    format!("expected ':' after key `{key}`"),
                ));
            }
            pos += 1;

            if bytes.get(pos) != Some(&b'"') {
                return Err(TagSyntaxError::new(
                    raw,
                    pos,
                    format!("expected '\"' to open value of `{key}`"),
                ));
            }
            pos += 1;

            let (value, end) = scan_value(raw, pos)?;
            pairs.push(TagPair { key, value });
            pos = end;

            if pos == bytes.len() {
                break;
            }
            let after_value = pos;
            pos = skip_whitespace(bytes, pos);
            if matches!(bytes.get(pos), Some(b',' | b';')) {
                pos = skip_whitespace(bytes, pos + 1);
                if pos == bytes.len() {
                    return Err(TagSyntaxError::new(raw, pos, "expected pair after separator"));
                }
            } else if pos == after_value {
                return Err(TagSyntaxError::new(
                    raw,
                    pos,
                    "expected whitespace, ',' or ';' between pairs",
                ));
            }
        }

        Ok(Self { pairs })
    }

    /// Value of the first pair whose key matches, ignoring ASCII case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key.eq_ignore_ascii_case(key))
            .map(|pair| pair.value.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagPair<'a>> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Scan a quoted value starting just after the opening quote.
/// Returns the unescaped value and the offset after the closing quote.
fn scan_value(raw: &str, start: usize) -> Result<(Cow<'_, str>, usize), TagSyntaxError> {
    let bytes = raw.as_bytes();
    let mut owned: Option<String> = None;
    let mut segment = start;
    let mut pos = start;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => {
                let value = match owned {
                    Some(mut buf) => {
                        buf.push_str(&raw[segment..pos]);
                        Cow::Owned(buf)
                    }
                    None => Cow::Borrowed(&raw[start..pos]),
                };
                return Ok((value, pos + 1));
            }
            b'\\' => match bytes.get(pos + 1) {
                Some(&escaped @ (b'"' | b'\\')) => {
                    let buf = owned.get_or_insert_with(String::new);
                    buf.push_str(&raw[segment..pos]);
                    buf.push(char::from(escaped));
                    pos += 2;
                    segment = pos;
                }
                _ => pos += 1,
            },
            _ => pos += 1,
        }
    }

    Err(TagSyntaxError::new(raw, start - 1, "unterminated value"))
}

/// Look up `key` in a raw annotation string
pub fn tag_value<'a>(raw: &'a str, key: &str) -> Result<Option<Cow<'a, str>>, TagSyntaxError> {
    let tags = Tags::parse(raw)?;
    Ok(tags
        .pairs
        .into_iter()
        .find(|pair| pair.key.eq_ignore_ascii_case(key))
        .map(|pair| pair.value))
}

/// Whether a selector should be resolved by the builders
///
/// `"-"` and selectors ending in `"[..]"` are recorded in the index but
/// never resolved or assigned.
pub fn is_extractable(selector: &str) -> bool {
    selector != EXCLUDED_SELECTOR && !selector.ends_with(RELATED_SUFFIX)
}

/// One field's selector under a given annotation key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub field: &'static FieldDescriptor,
    pub selector: String,
}

impl TagEntry {
    pub fn name(&self) -> &'static str {
        self.field.name
    }
}

/// Mapping from field name to raw selector for one annotation key
///
/// Entries keep declaration order, which callers must not rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIndex {
    key: String,
    entries: Vec<TagEntry>,
}

impl TagIndex {
    /// Build the index over a descriptor list
    ///
    /// A field contributes only when its annotation carries `key` with a
    /// non-empty value. Sentinel selectors are recorded verbatim.
    pub fn from_fields(
        fields: &'static [FieldDescriptor],
        key: &str,
    ) -> Result<Self, TagSyntaxError> {
        let mut entries = Vec::with_capacity(fields.len());
        for field in fields {
            if let Some(selector) = tag_value(field.tag, key)? {
                if !selector.is_empty() {
                    entries.push(TagEntry {
                        field,
                        selector: selector.into_owned(),
                    });
                }
            }
        }
        Ok(Self {
            key: key.to_string(),
            entries,
        })
    }

    /// Annotation key this index was built for
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Selector recorded for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field.name == field)
            .map(|entry| entry.selector.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.iter()
    }

    /// Entries the builders resolve: sentinels filtered out
    pub fn extractable(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries
            .iter()
            .filter(|entry| is_extractable(&entry.selector))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.field.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the field-name → selector mapping for a record type
pub fn build_tag_index<R: Record>(key: &str) -> Result<TagIndex, TagSyntaxError> {
    TagIndex::from_fields(R::fields(), key)
}
