//! Dnodes: zdb dnode listing ingestion
//!
//! Turns the line-oriented dnode dump printed by `zdb` into validated
//! [`Dnode`] records and persists them to a queryable store.

pub mod accumulator;
pub(crate) mod bytes;
pub mod config;
pub mod error;
pub mod grammar;
pub mod ingest;
pub mod logging;
pub mod record;
pub mod store;
pub mod tooling;

pub use accumulator::{feed, lines_from_reader, Accumulator, SourceLine};
pub use error::{ApiError, IngestError, ProtocolError, StorageError, ValidationError};
pub use grammar::{GrammarKind, KeyValueGrammar, LineGrammar, ZdbGrammar};
pub use ingest::{ingest, IngestReport};
pub use record::{Dnode, DnodePath, Field};
pub use store::{DnodeStore, MemoryDnodeStore, SledDnodeStore};
