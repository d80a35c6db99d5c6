//! Grammar for `zdb -dddd` object listings.
//!
//! ```text
//!     Object  lvl   iblk   dblk  dsize  dnsize  lsize   %full  type
//!          8    1   128K    512      0     512    512  100.00  ZFS plain file
//!                                                176   bonus  System attributes
//! 	dnode flags: USED_BYTES USERUSED_ACCOUNTED
//! 	dnode maxblkid: 0
//! 	path	/var/log/messages
//! 	uid     0
//! ```
//!
//! Object rows are space-aligned columns; object properties are tab-indented.
//! Older zdb builds omit the `dnsize` column.

use super::{LineGrammar, LineKind, MalformedLine};
use crate::bytes;

const FLAGS_PREFIX: &[u8] = b"dnode flags:";
const MAXBLKID_PREFIX: &[u8] = b"dnode maxblkid:";
const PATH_PREFIX: &[u8] = b"path\t";

#[derive(Debug, Clone, Default)]
pub struct ZdbGrammar {
    /// Inside the block of a special object (negative id, e.g. user/group
    /// accounting) whose properties belong to no record.
    in_special_object: bool,
}

impl ZdbGrammar {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_integer(word: &[u8]) -> bool {
    !word.is_empty() && word.iter().all(u8::is_ascii_digit)
}

fn is_negative_integer(word: &[u8]) -> bool {
    word.strip_prefix(b"-").is_some_and(is_integer)
}

/// `%full` is always printed with two decimals.
fn is_percentage(word: &[u8]) -> bool {
    word.contains(&b'.')
        && std::str::from_utf8(word)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .is_some()
}

enum Row<'a> {
    Object(LineKind<'a>),
    Special,
    Other,
}

fn object_row(line: &[u8]) -> Result<Row<'_>, MalformedLine> {
    let spans = &bytes::word_spans(line);
    let word = move |i: usize| spans.get(i).map(|&(s, e)| &line[s..e]);

    let (Some(first), Some(second)) = (word(0), word(1)) else {
        return Ok(Row::Other);
    };
    if !is_integer(second) {
        return Ok(Row::Other);
    }
    if is_negative_integer(first) {
        return Ok(Row::Special);
    }
    if !is_integer(first) {
        return Ok(Row::Other);
    }

    // Object lvl iblk dblk dsize [dnsize] lsize %full type...
    let full_column = [7, 6]
        .into_iter()
        .find(|&i| word(i).is_some_and(is_percentage))
        .ok_or_else(|| {
            MalformedLine::Boundary(format!(
                "object {} has no %full column",
                bytes::lossy(first)
            ))
        })?;
    let type_start = spans
        .get(full_column + 1)
        .map(|&(s, _)| s)
        .ok_or_else(|| {
            MalformedLine::Boundary(format!("object {} has no type", bytes::lossy(first)))
        })?;

    Ok(Row::Object(LineKind::Boundary {
        inode: first,
        full: word(full_column).unwrap_or_default(),
        dnode_type: bytes::trim_end(&line[type_start..]),
    }))
}

fn property(line: &[u8]) -> LineKind<'_> {
    let body = bytes::trim_start(line);
    if let Some(rest) = body.strip_prefix(FLAGS_PREFIX) {
        return LineKind::Property {
            name: b"flags",
            value: bytes::trim(rest),
        };
    }
    if let Some(rest) = body.strip_prefix(MAXBLKID_PREFIX) {
        return LineKind::Property {
            name: b"maxblkid",
            value: bytes::trim(rest),
        };
    }
    if let Some(rest) = body.strip_prefix(PATH_PREFIX) {
        return LineKind::Property {
            name: b"path",
            value: rest,
        };
    }
    let (name, rest) = bytes::split_word(body);
    LineKind::Property {
        name,
        value: bytes::trim(rest),
    }
}

impl LineGrammar for ZdbGrammar {
    fn name(&self) -> &'static str {
        "zdb"
    }

    fn classify<'a>(&mut self, line: &'a [u8]) -> Result<LineKind<'a>, MalformedLine> {
        if bytes::trim(line).is_empty() {
            return Ok(LineKind::Skip);
        }

        if line.first() == Some(&b'\t') {
            if self.in_special_object {
                return Ok(LineKind::Skip);
            }
            return Ok(property(line));
        }

        match object_row(line)? {
            Row::Object(kind) => {
                self.in_special_object = false;
                Ok(kind)
            }
            Row::Special => {
                self.in_special_object = true;
                Ok(LineKind::Skip)
            }
            Row::Other => Ok(LineKind::Skip),
        }
    }
}
