//! Sled-backed dnode store.
//!
//! Two trees: `dnodes` maps the big-endian inode to the bincode-encoded
//! record. `paths` holds one empty-valued key per record with a path:
//! `path ++ 0x00 ++ inode`. Paths never contain NUL, so a prefix scan on
//! `path ++ 0x00` lists exactly the inodes recorded for that path, lowest
//! first. Both trees are updated in one transaction.

use super::DnodeStore;
use crate::error::StorageError;
use crate::record::Dnode;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;
use std::path::Path;
use tracing::debug;

const DNODES_TREE: &str = "dnodes";
const PATHS_TREE: &str = "paths";

pub struct SledDnodeStore {
    db: sled::Db,
    dnodes: sled::Tree,
    paths: sled::Tree,
}

fn inode_key(inode: u64) -> [u8; 8] {
    inode.to_be_bytes()
}

fn decode(bytes: &[u8]) -> Result<Dnode, StorageError> {
    Ok(bincode::deserialize(bytes)?)
}

fn path_prefix(path: &[u8]) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(path.len() + 1);
    prefix.extend_from_slice(path);
    prefix.push(0);
    prefix
}

fn path_index_key(path: &[u8], inode: &[u8; 8]) -> Vec<u8> {
    let mut key = path_prefix(path);
    key.extend_from_slice(inode);
    key
}

fn decode_index_inode(key: &[u8]) -> Result<u64, StorageError> {
    let inode: [u8; 8] = key
        .len()
        .checked_sub(8)
        .and_then(|start| key[start..].try_into().ok())
        .ok_or_else(|| StorageError::Corrupt(format!("path index key has {} bytes", key.len())))?;
    Ok(u64::from_be_bytes(inode))
}

impl SledDnodeStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let dnodes = db.open_tree(DNODES_TREE)?;
        let paths = db.open_tree(PATHS_TREE)?;
        Ok(SledDnodeStore { db, dnodes, paths })
    }

    /// A throwaway store removed when dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }
}

impl DnodeStore for SledDnodeStore {
    fn persist(&self, dnode: Dnode) -> Result<(), StorageError> {
        let key = inode_key(dnode.inode());
        let encoded = bincode::serialize(&dnode)?;
        let new_path = dnode.path().map(|p| p.as_bytes().to_vec());

        (&self.dnodes, &self.paths)
            .transaction(|(dnodes, paths)| {
                let previous = dnodes.insert(&key[..], encoded.as_slice())?;
                if let Some(previous) = previous {
                    let previous = decode(&previous).map_err(ConflictableTransactionError::Abort)?;
                    if let Some(old_path) = previous.path() {
                        paths.remove(path_index_key(old_path.as_bytes(), &key))?;
                    }
                }
                if let Some(path) = &new_path {
                    paths.insert(path_index_key(path, &key), &[][..])?;
                }
                Ok(())
            })
            .map_err(|e| match e {
                TransactionError::Abort(e) => e,
                TransactionError::Storage(e) => StorageError::Database(e),
            })?;

        debug!(inode = dnode.inode(), "persisted dnode");
        Ok(())
    }

    fn get(&self, inode: u64) -> Result<Option<Dnode>, StorageError> {
        self.dnodes
            .get(inode_key(inode))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn find_by_path(&self, path: &[u8]) -> Result<Option<Dnode>, StorageError> {
        match self.paths.scan_prefix(path_prefix(path)).keys().next() {
            Some(key) => self.get(decode_index_inode(&key?)?),
            None => Ok(None),
        }
    }

    fn list_all(&self) -> Result<Vec<Dnode>, StorageError> {
        self.dnodes
            .iter()
            .values()
            .map(|value| decode(&value?))
            .collect()
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.dnodes.len())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}
