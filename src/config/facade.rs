//! ConfigLoader facade delegating to merge service.

use super::merge::MergeService;
use super::DnodesConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file and
    /// the environment.
    pub fn load(explicit: Option<&Path>) -> Result<DnodesConfig, ConfigError> {
        MergeService::load(explicit)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<DnodesConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> DnodesConfig {
        DnodesConfig::default()
    }
}
