//! Ingest pipeline: line source -> accumulator -> store.

use crate::accumulator::{Accumulator, SourceLine};
use crate::error::ApiError;
use crate::grammar::LineGrammar;
use crate::store::DnodeStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Summary of one ingest run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub grammar: String,
    pub records: usize,
    pub lines: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Persist every record `lines` produces, in order.
///
/// Each record is handed to the store as soon as the accumulator yields it.
/// The first error stops the run; records persisted before it stay persisted.
pub fn ingest<L, G, S>(lines: L, grammar: G, store: &S) -> Result<IngestReport, ApiError>
where
    L: IntoIterator,
    L::Item: SourceLine,
    G: LineGrammar,
    S: DnodeStore + ?Sized,
{
    let started_at = Utc::now();
    let grammar_name = grammar.name();
    let mut accumulator = Accumulator::new(lines, grammar);
    let mut records = 0usize;

    info!(grammar = grammar_name, "ingest started");
    while let Some(next) = accumulator.next() {
        let dnode = match next {
            Ok(dnode) => dnode,
            Err(e) => {
                warn!(
                    records,
                    lines = accumulator.lines_read(),
                    error = %e,
                    "ingest stopped"
                );
                if let Err(flush_error) = store.flush() {
                    warn!(error = %flush_error, "flush after failed ingest also failed");
                }
                return Err(e.into());
            }
        };
        store.persist(dnode)?;
        records += 1;
    }
    store.flush()?;

    let report = IngestReport {
        grammar: grammar_name.to_string(),
        records,
        lines: accumulator.lines_read(),
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        records = report.records,
        lines = report.lines,
        "ingest finished"
    );
    Ok(report)
}
