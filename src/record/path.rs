//! Raw-byte filesystem paths.

use super::field::{coerce_path, validate_path};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A path as zdb printed it: any bytes except NUL, not necessarily UTF-8.
///
/// The bytes are kept verbatim. Conversion to an OS path or to text only
/// happens at the edges, through [`DnodePath::to_path_buf`] and `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DnodePath(Vec<u8>);

impl DnodePath {
    /// Build a path from raw bytes, rejecting NUL.
    pub fn new(raw: impl AsRef<[u8]>) -> Result<Self, ValidationError> {
        validate_path(coerce_path(raw.as_ref()))
    }

    /// Unvalidated constructor used by the coercion step.
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        DnodePath(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Lossless on unix, where an `OsStr` is an arbitrary byte string.
    #[cfg(unix)]
    pub fn to_path_buf(&self) -> PathBuf {
        use std::os::unix::ffi::OsStrExt;
        PathBuf::from(std::ffi::OsStr::from_bytes(&self.0))
    }

    #[cfg(not(unix))]
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(String::from_utf8_lossy(&self.0).into_owned())
    }
}

impl fmt::Display for DnodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl TryFrom<Vec<u8>> for DnodePath {
    type Error = ValidationError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        validate_path(DnodePath(bytes))
    }
}

impl From<DnodePath> for Vec<u8> {
    fn from(path: DnodePath) -> Self {
        path.0
    }
}

impl AsRef<[u8]> for DnodePath {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
