//! Line grammars
//!
//! A grammar decides what a single raw output line means: the start of a new
//! dnode, one property of the open dnode, or noise. The accumulator owns the
//! state machine; grammars only classify.

pub mod key_value;
pub mod zdb;

pub use key_value::KeyValueGrammar;
pub use zdb::ZdbGrammar;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Classification of one line. Values borrow the raw line bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Starts a new record with its mandatory values.
    Boundary {
        inode: &'a [u8],
        full: &'a [u8],
        dnode_type: &'a [u8],
    },
    /// Contributes one named value to the open record.
    Property { name: &'a [u8], value: &'a [u8] },
    /// Carries nothing for the record model.
    Skip,
}

/// A line the grammar recognized but could not split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLine {
    #[error("{0}")]
    Boundary(String),
    #[error("{0}")]
    Property(String),
}

/// Pluggable line syntax.
///
/// `classify` takes `&mut self` so a grammar can track tool-specific context
/// between lines (see [`ZdbGrammar`]).
pub trait LineGrammar {
    fn name(&self) -> &'static str;

    fn classify<'a>(&mut self, line: &'a [u8]) -> Result<LineKind<'a>, MalformedLine>;
}

impl<G: LineGrammar + ?Sized> LineGrammar for &mut G {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn classify<'a>(&mut self, line: &'a [u8]) -> Result<LineKind<'a>, MalformedLine> {
        (**self).classify(line)
    }
}

impl<G: LineGrammar + ?Sized> LineGrammar for Box<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn classify<'a>(&mut self, line: &'a [u8]) -> Result<LineKind<'a>, MalformedLine> {
        (**self).classify(line)
    }
}

/// Grammar selector used by configuration and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrammarKind {
    #[default]
    KeyValue,
    Zdb,
}

impl GrammarKind {
    pub fn build(self) -> Box<dyn LineGrammar> {
        match self {
            GrammarKind::KeyValue => Box::new(KeyValueGrammar::new()),
            GrammarKind::Zdb => Box::new(ZdbGrammar::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GrammarKind::KeyValue => "key-value",
            GrammarKind::Zdb => "zdb",
        }
    }
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrammarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key-value" | "kv" => Ok(GrammarKind::KeyValue),
            "zdb" => Ok(GrammarKind::Zdb),
            other => Err(format!(
                "Invalid grammar: {} (must be 'key-value' or 'zdb')",
                other
            )),
        }
    }
}
