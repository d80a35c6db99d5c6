//! `key=value` grammar.
//!
//! ```text
//! inode=1 full=100.0 type=ZFS plain file
//! flags=USED_BYTES
//! maxblkid: 0
//! path=/var/log/messages
//! ```

use super::{LineGrammar, LineKind, MalformedLine};
use crate::bytes;

const BOUNDARY_KEY: &[u8] = b"inode";

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueGrammar;

impl KeyValueGrammar {
    pub fn new() -> Self {
        KeyValueGrammar
    }
}

/// The `key` of a `key=...` word, if the word starts with one.
fn key_prefix(word: &[u8]) -> Option<&[u8]> {
    let eq = word.iter().position(|b| *b == b'=')?;
    let key = &word[..eq];
    let first = *key.first()?;
    let valid = (first.is_ascii_alphabetic() || first == b'_')
        && key.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_');
    valid.then_some(key)
}

/// Split a boundary line into `(key, value)` pairs. A word without a `key=`
/// prefix extends the previous value, inner whitespace included.
fn pairs(line: &[u8]) -> Vec<(&[u8], &[u8])> {
    let mut spans: Vec<(&[u8], usize, usize)> = Vec::new();
    for (start, end) in bytes::word_spans(line) {
        match key_prefix(&line[start..end]) {
            Some(key) => spans.push((key, start + key.len() + 1, end)),
            None => {
                if let Some(last) = spans.last_mut() {
                    last.2 = end;
                }
            }
        }
    }
    spans
        .into_iter()
        .map(|(key, start, end)| (key, &line[start..end]))
        .collect()
}

fn is_boundary(line: &[u8]) -> bool {
    let (word, _) = bytes::split_word(line);
    key_prefix(word) == Some(BOUNDARY_KEY)
}

impl LineGrammar for KeyValueGrammar {
    fn name(&self) -> &'static str {
        "key-value"
    }

    fn classify<'a>(&mut self, line: &'a [u8]) -> Result<LineKind<'a>, MalformedLine> {
        if bytes::trim(line).is_empty() {
            return Ok(LineKind::Skip);
        }

        if is_boundary(line) {
            let pairs = pairs(line);
            let lookup = |key: &str| {
                pairs
                    .iter()
                    .find(|(k, _)| *k == key.as_bytes())
                    .map(|(_, v)| *v)
                    .ok_or_else(|| MalformedLine::Boundary(format!("missing `{}=`", key)))
            };
            return Ok(LineKind::Boundary {
                inode: lookup("inode")?,
                full: lookup("full")?,
                dnode_type: lookup("type")?,
            });
        }

        let body = bytes::trim_start(line);
        let sep = body
            .iter()
            .position(|b| *b == b'=' || *b == b':')
            .ok_or_else(|| {
                MalformedLine::Property(format!(
                    "expected `name=value` or `name: value`, got {:?}",
                    bytes::lossy(body)
                ))
            })?;
        let name = bytes::trim(&body[..sep]);
        if name.is_empty() {
            return Err(MalformedLine::Property("empty property name".to_string()));
        }
        let mut value = &body[sep + 1..];
        if body[sep] == b':' {
            value = value.strip_prefix(b" ").unwrap_or(value);
        }
        Ok(LineKind::Property { name, value })
    }
}
