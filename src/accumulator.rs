//! Line accumulator
//!
//! Folds a stream of raw output lines into completed [`Dnode`] records. The
//! accumulator holds at most one open record: a boundary line closes it (it is
//! yielded) and opens the next one, property lines update it, and end of input
//! yields whatever is still open.
//!
//! The output is a lazy, forward-only iterator. Nothing is yielded for a
//! record until its boundary has been passed, and the first error ends the
//! sequence.

use crate::bytes;
use crate::error::{IngestError, ProtocolError};
use crate::grammar::{LineGrammar, LineKind, MalformedLine};
use crate::record::{Dnode, Field};
use std::io::BufRead;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// One input line as handed to the accumulator.
///
/// Implemented for text and byte lines and for `io::Result` of them, so a
/// reader's I/O error surfaces in the record stream.
pub trait SourceLine {
    fn into_line(self) -> std::io::Result<Vec<u8>>;
}

impl SourceLine for Vec<u8> {
    fn into_line(self) -> std::io::Result<Vec<u8>> {
        Ok(self)
    }
}

impl SourceLine for &[u8] {
    fn into_line(self) -> std::io::Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl<const N: usize> SourceLine for &[u8; N] {
    fn into_line(self) -> std::io::Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl SourceLine for String {
    fn into_line(self) -> std::io::Result<Vec<u8>> {
        Ok(self.into_bytes())
    }
}

impl SourceLine for &str {
    fn into_line(self) -> std::io::Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl<T: SourceLine> SourceLine for std::io::Result<T> {
    fn into_line(self) -> std::io::Result<Vec<u8>> {
        self.and_then(SourceLine::into_line)
    }
}

/// Raw lines of a reader, split on `\n` only. No decoding happens here.
pub fn lines_from_reader<R: BufRead>(reader: R) -> std::io::Split<R> {
    reader.split(b'\n')
}

/// Start accumulating `lines` with `grammar`.
pub fn feed<L, G>(lines: L, grammar: G) -> Accumulator<L::IntoIter, G>
where
    L: IntoIterator,
    L::Item: SourceLine,
    G: LineGrammar,
{
    Accumulator::new(lines, grammar)
}

pub struct Accumulator<I, G> {
    lines: I,
    grammar: G,
    open: Option<Dnode>,
    /// Error from a bad boundary line, reported after the record it closed.
    pending: Option<IngestError>,
    line_no: usize,
    finished: bool,
}

impl<I, G> Accumulator<I, G>
where
    I: Iterator,
    I::Item: SourceLine,
    G: LineGrammar,
{
    pub fn new<L>(lines: L, grammar: G) -> Self
    where
        L: IntoIterator<IntoIter = I>,
    {
        Accumulator {
            lines: lines.into_iter(),
            grammar,
            open: None,
            pending: None,
            line_no: 0,
            finished: false,
        }
    }

    /// Number of lines pulled from the input so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    pub fn has_open_record(&self) -> bool {
        self.open.is_some()
    }

    /// Apply one line. Returns the record closed by a boundary line, if any.
    fn step(&mut self, raw: &[u8]) -> Result<Option<Dnode>, IngestError> {
        let line = self.line_no;
        let kind = match self.grammar.classify(bytes::strip_line_ending(raw)) {
            Ok(kind) => kind,
            Err(MalformedLine::Boundary(reason)) => {
                return self.close_on_error(ProtocolError::MalformedBoundary { line, reason }.into())
            }
            Err(MalformedLine::Property(reason)) => {
                return Err(ProtocolError::MalformedProperty { line, reason }.into())
            }
        };

        match kind {
            LineKind::Skip => Ok(None),
            LineKind::Boundary {
                inode,
                full,
                dnode_type,
            } => match Dnode::new(inode, full, dnode_type) {
                Ok(dnode) => {
                    debug!(line, inode = dnode.inode(), "opened dnode");
                    Ok(self.open.replace(dnode))
                }
                Err(source) => self.close_on_error(IngestError::Validation { line, source }),
            },
            LineKind::Property { name, value } => {
                let open = self
                    .open
                    .as_mut()
                    .ok_or(ProtocolError::PropertyBeforeBoundary { line })?;
                let field = std::str::from_utf8(name)
                    .ok()
                    .and_then(Field::from_name)
                    .filter(|f| !f.is_required());
                match field {
                    Some(Field::Path) => open
                        .set(Field::Path, Some(value))
                        .map_err(|source| IngestError::Validation { line, source })?,
                    Some(field) => open
                        .set(field, Some(bytes::strip_carriage_return(value)))
                        .map_err(|source| IngestError::Validation { line, source })?,
                    None => trace!(
                        line,
                        name = %bytes::lossy(name),
                        "ignoring unrecognized property"
                    ),
                }
                Ok(None)
            }
        }
    }

    /// A bad boundary line still closes the open record. The record is
    /// returned now and the error is held for the next pull.
    fn close_on_error(&mut self, error: IngestError) -> Result<Option<Dnode>, IngestError> {
        match self.open.take() {
            Some(done) => {
                self.pending = Some(error);
                Ok(Some(done))
            }
            None => Err(error),
        }
    }
}

impl<I, G> Iterator for Accumulator<I, G>
where
    I: Iterator,
    I::Item: SourceLine,
    G: LineGrammar,
{
    type Item = Result<Dnode, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(e) = self.pending.take() {
            debug!(line = self.line_no, error = %e, "accumulator stopped");
            self.finished = true;
            return Some(Err(e));
        }
        loop {
            let Some(item) = self.lines.next() else {
                self.finished = true;
                return self.open.take().map(Ok);
            };
            self.line_no += 1;

            let result = match item.into_line() {
                Ok(raw) => self.step(&raw),
                Err(e) => Err(IngestError::Io(e)),
            };
            match result {
                Ok(Some(done)) => return Some(Ok(done)),
                Ok(None) => {}
                Err(e) => {
                    debug!(line = self.line_no, error = %e, "accumulator stopped");
                    self.finished = true;
                    self.open = None;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<I, G> FusedIterator for Accumulator<I, G>
where
    I: Iterator,
    I::Item: SourceLine,
    G: LineGrammar,
{
}
