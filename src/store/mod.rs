//! Dnode Store
//!
//! Persistence collaborator for completed records. The accumulator hands each
//! record over by value once it is yielded and keeps no reference to it.

pub mod persistence;

pub use persistence::SledDnodeStore;

use crate::error::StorageError;
use crate::record::Dnode;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Dnode store interface
pub trait DnodeStore {
    /// Store a completed record. A record for an inode already present
    /// replaces the earlier one.
    fn persist(&self, dnode: Dnode) -> Result<(), StorageError>;

    fn get(&self, inode: u64) -> Result<Option<Dnode>, StorageError>;

    /// Find a record by its exact path bytes. When several records carry the
    /// path, the one with the lowest inode is returned.
    fn find_by_path(&self, path: &[u8]) -> Result<Option<Dnode>, StorageError>;

    /// All records ordered by inode.
    fn list_all(&self) -> Result<Vec<Dnode>, StorageError>;

    fn count(&self) -> Result<usize, StorageError>;

    /// Flush any buffered writes to disk. Default implementation is a no-op.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// In-process store, used by tests and dry runs.
#[derive(Default)]
pub struct MemoryDnodeStore {
    dnodes: RwLock<BTreeMap<u64, Dnode>>,
}

impl MemoryDnodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DnodeStore for MemoryDnodeStore {
    fn persist(&self, dnode: Dnode) -> Result<(), StorageError> {
        self.dnodes.write().insert(dnode.inode(), dnode);
        Ok(())
    }

    fn get(&self, inode: u64) -> Result<Option<Dnode>, StorageError> {
        Ok(self.dnodes.read().get(&inode).cloned())
    }

    fn find_by_path(&self, path: &[u8]) -> Result<Option<Dnode>, StorageError> {
        Ok(self
            .dnodes
            .read()
            .values()
            .find(|d| d.path().is_some_and(|p| p.as_bytes() == path))
            .cloned())
    }

    fn list_all(&self) -> Result<Vec<Dnode>, StorageError> {
        Ok(self.dnodes.read().values().cloned().collect())
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.dnodes.read().len())
    }
}
