//! Field names plus the coercions and validators applied to raw field values.

use super::path::DnodePath;
use crate::bytes;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every field a [`Dnode`](super::Dnode) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Inode,
    Full,
    Type,
    Flags,
    Maxblkid,
    Path,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Inode,
        Field::Full,
        Field::Type,
        Field::Flags,
        Field::Maxblkid,
        Field::Path,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Inode => "inode",
            Field::Full => "full",
            Field::Type => "type",
            Field::Flags => "flags",
            Field::Maxblkid => "maxblkid",
            Field::Path => "path",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Required fields are set on a boundary line and can never be absent.
    pub fn is_required(self) -> bool {
        matches!(self, Field::Inode | Field::Full | Field::Type)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Coercions

pub(crate) fn coerce_integer(field: Field, raw: &[u8]) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::InvalidInteger {
        field,
        raw: bytes::lossy(raw),
    };
    let text = std::str::from_utf8(bytes::trim(raw)).map_err(|_| invalid())?;
    text.parse::<u64>().map_err(|_| invalid())
}

pub(crate) fn coerce_float(field: Field, raw: &[u8]) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidFloat {
        field,
        raw: bytes::lossy(raw),
    };
    let text = std::str::from_utf8(bytes::trim(raw)).map_err(|_| invalid())?;
    text.parse::<f64>().map_err(|_| invalid())
}

pub(crate) fn coerce_text(field: Field, raw: &[u8]) -> Result<String, ValidationError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|source| ValidationError::Encoding { field, source })
}

/// Paths keep every byte; rejection happens in [`validate_path`].
pub(crate) fn coerce_path(raw: &[u8]) -> DnodePath {
    DnodePath::from_raw(raw.to_vec())
}

/// Absence passes through untouched; only present values reach `coerce`.
pub(crate) fn optional<T>(
    raw: Option<&[u8]>,
    coerce: impl FnOnce(&[u8]) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    raw.map(coerce).transpose()
}

pub(crate) fn required(field: Field, raw: Option<&[u8]>) -> Result<&[u8], ValidationError> {
    raw.ok_or(ValidationError::Missing { field })
}

// Validators

pub(crate) fn validate_finite(field: Field, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

/// Any byte but NUL is legal in a filename on the source filesystem.
pub(crate) fn validate_path(path: DnodePath) -> Result<DnodePath, ValidationError> {
    match path.as_bytes().iter().position(|b| *b == 0) {
        Some(offset) => Err(ValidationError::NulByte {
            field: Field::Path,
            offset,
        }),
        None => Ok(path),
    }
}
