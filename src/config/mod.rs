//! Configuration
//!
//! Layered with the `config` crate. Precedence, lowest first: built-in
//! defaults, the global file (`$XDG_CONFIG_HOME/dnodes/config.toml`), an
//! explicit `--config` file, then `DNODES__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;
pub mod storage;
pub mod xdg;

pub use facade::ConfigLoader;
pub use storage::StorageConfig;

use crate::grammar::GrammarKind;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Ingest settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Line grammar used when the command line does not pick one
    #[serde(default)]
    pub grammar: GrammarKind,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnodesConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
