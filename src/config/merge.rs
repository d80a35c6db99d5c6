//! MergeService: orchestrates sources, applies merge policy, deserializes to DnodesConfig.

use crate::config::sources;
use crate::config::DnodesConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use std::path::Path;

/// Defaults the serde defaults cannot express as a key path.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("ingest.grammar", "key-value")
}

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<DnodesConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = sources::add_global_file(builder)?;
        let builder = match explicit {
            Some(path) => sources::add_explicit_file(builder, path)?,
            None => builder,
        };
        let builder = sources::add_environment(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load a single file with environment overlay, ignoring the global file.
    pub fn load_from_file(path: &Path) -> Result<DnodesConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = sources::add_explicit_file(builder, path)?;
        let builder = sources::add_environment(builder)?;

        builder.build()?.try_deserialize()
    }
}
