//! StorageConfig and store path resolution.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Sled store directory; `None` uses `$XDG_DATA_HOME/dnodes/store`
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store directory, preferring an explicit override.
    pub fn resolve_store_path(&self, cli_override: Option<PathBuf>) -> Result<PathBuf, ApiError> {
        if let Some(p) = cli_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(p);
        }
        if let Some(p) = self.store_path.clone().filter(|p| !p.as_os_str().is_empty()) {
            return Ok(p);
        }
        Ok(xdg::data_dir()?.join("store"))
    }
}
