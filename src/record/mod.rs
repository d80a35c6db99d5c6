//! Dnode records
//!
//! A [`Dnode`] is one object's metadata as reported by `zdb`. Its fields are
//! private and every write, at construction or afterwards, runs the field's
//! coercion followed by its validator. A failed write leaves the record as it
//! was.

pub mod field;
pub mod path;

pub use field::Field;
pub use path::DnodePath;

use crate::error::ValidationError;
use field::{
    coerce_float, coerce_integer, coerce_path, coerce_text, optional, required, validate_finite,
    validate_path,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata for one on-disk object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DnodeRow", try_from = "DnodeRow")]
pub struct Dnode {
    inode: u64,
    full: f64,
    dnode_type: String,
    flags: Option<String>,
    maxblkid: Option<u64>,
    path: Option<DnodePath>,
}

fn convert_inode(raw: &[u8]) -> Result<u64, ValidationError> {
    coerce_integer(Field::Inode, raw)
}

fn convert_full(raw: &[u8]) -> Result<f64, ValidationError> {
    validate_finite(Field::Full, coerce_float(Field::Full, raw)?)
}

fn convert_type(raw: &[u8]) -> Result<String, ValidationError> {
    coerce_text(Field::Type, raw)
}

fn convert_flags(raw: &[u8]) -> Result<String, ValidationError> {
    coerce_text(Field::Flags, raw)
}

fn convert_maxblkid(raw: &[u8]) -> Result<u64, ValidationError> {
    coerce_integer(Field::Maxblkid, raw)
}

fn convert_path(raw: &[u8]) -> Result<DnodePath, ValidationError> {
    validate_path(coerce_path(raw))
}

impl Dnode {
    /// Build a record from the three mandatory raw values.
    pub fn new(
        inode: impl AsRef<[u8]>,
        full: impl AsRef<[u8]>,
        dnode_type: impl AsRef<[u8]>,
    ) -> Result<Self, ValidationError> {
        Ok(Dnode {
            inode: convert_inode(inode.as_ref())?,
            full: convert_full(full.as_ref())?,
            dnode_type: convert_type(dnode_type.as_ref())?,
            flags: None,
            maxblkid: None,
            path: None,
        })
    }

    pub fn inode(&self) -> u64 {
        self.inode
    }

    pub fn full(&self) -> f64 {
        self.full
    }

    pub fn dnode_type(&self) -> &str {
        &self.dnode_type
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn maxblkid(&self) -> Option<u64> {
        self.maxblkid
    }

    pub fn path(&self) -> Option<&DnodePath> {
        self.path.as_ref()
    }

    /// Set any field from a raw value. `None` marks an optional field absent
    /// and is rejected for required fields.
    ///
    /// The new value is fully converted before it is stored, so on error the
    /// field keeps its previous value.
    pub fn set(&mut self, field: Field, raw: Option<&[u8]>) -> Result<(), ValidationError> {
        match field {
            Field::Inode => self.inode = convert_inode(required(field, raw)?)?,
            Field::Full => self.full = convert_full(required(field, raw)?)?,
            Field::Type => self.dnode_type = convert_type(required(field, raw)?)?,
            Field::Flags => self.flags = optional(raw, convert_flags)?,
            Field::Maxblkid => self.maxblkid = optional(raw, convert_maxblkid)?,
            Field::Path => self.path = optional(raw, convert_path)?,
        }
        Ok(())
    }

    /// Mark an optional field absent.
    pub fn clear(&mut self, field: Field) -> Result<(), ValidationError> {
        self.set(field, None)
    }

    pub fn set_inode(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        self.set(Field::Inode, Some(raw.as_ref()))
    }

    pub fn set_full(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        self.set(Field::Full, Some(raw.as_ref()))
    }

    pub fn set_type(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        self.set(Field::Type, Some(raw.as_ref()))
    }

    pub fn set_flags(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        self.set(Field::Flags, Some(raw.as_ref()))
    }

    pub fn set_maxblkid(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        self.set(Field::Maxblkid, Some(raw.as_ref()))
    }

    pub fn set_path(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        self.set(Field::Path, Some(raw.as_ref()))
    }
}

impl fmt::Display for Dnode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dnode(inode={}, full={:?}, type={:?}",
            self.inode, self.full, self.dnode_type
        )?;
        match &self.flags {
            Some(flags) => write!(f, ", flags={:?}", flags)?,
            None => f.write_str(", flags=None")?,
        }
        match self.maxblkid {
            Some(maxblkid) => write!(f, ", maxblkid={}", maxblkid)?,
            None => f.write_str(", maxblkid=None")?,
        }
        match &self.path {
            Some(path) => write!(f, ", path={:?})", path.to_string()),
            None => f.write_str(", path=None)"),
        }
    }
}

/// Serialized shape of a [`Dnode`]. Loading goes back through the validators.
#[derive(Serialize, Deserialize)]
struct DnodeRow {
    inode: u64,
    full: f64,
    #[serde(rename = "type")]
    dnode_type: String,
    flags: Option<String>,
    maxblkid: Option<u64>,
    path: Option<DnodePath>,
}

impl From<Dnode> for DnodeRow {
    fn from(dnode: Dnode) -> Self {
        DnodeRow {
            inode: dnode.inode,
            full: dnode.full,
            dnode_type: dnode.dnode_type,
            flags: dnode.flags,
            maxblkid: dnode.maxblkid,
            path: dnode.path,
        }
    }
}

impl TryFrom<DnodeRow> for Dnode {
    type Error = ValidationError;

    fn try_from(row: DnodeRow) -> Result<Self, Self::Error> {
        Ok(Dnode {
            inode: row.inode,
            full: validate_finite(Field::Full, row.full)?,
            dnode_type: row.dnode_type,
            flags: row.flags,
            maxblkid: row.maxblkid,
            path: row.path.map(validate_path).transpose()?,
        })
    }
}
