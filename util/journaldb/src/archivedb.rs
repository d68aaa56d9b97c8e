// Copyright 2015-2017 Parity Technologies (UK) Ltd.
// This file is part of Parity.

// Parity is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity.  If not, see <http://www.gnu.org/licenses/>.

//! Disk-backed `HashDB` implementation.

use std::io;
use std::sync::Arc;

use cmerkle::{DBValue, HashDB, MemoryDB};
use kvdb::{DBTransaction, KeyValueDB};
use primitives::H256;

use super::traits::JournalDB;

/// Implementation of the `HashDB` trait for a disk-backed database with a memory overlay
/// and latent-removal semantics.
///
/// Like `OverlayDB`, there is a memory overlay; `commit()` must be called in order to
/// write operations out to disk. Unlike `OverlayDB`, `remove()` operations do not take effect
/// immediately. As this is an "archive" database, nothing is ever removed. This means
/// that the states of any block the node has ever processed will be accessible.
pub struct ArchiveDB {
    overlay: MemoryDB,
    backing: Arc<dyn KeyValueDB>,
    column: u32,
}

impl ArchiveDB {
    /// Create a new instance from a key-value db.
    pub fn new(backing: Arc<dyn KeyValueDB>, column: u32) -> ArchiveDB {
        ArchiveDB {
            overlay: MemoryDB::new(),
            backing,
            column,
        }
    }

    fn payload(&self, key: &H256) -> Option<DBValue> {
        match self.backing.get(self.column, key.as_bytes()) {
            Ok(value) => value.map(|v| DBValue::from_slice(&v)),
            Err(err) => {
                error!("Low-level database error on {:?}: {}", key, err);
                None
            }
        }
    }
}

impl Clone for ArchiveDB {
    fn clone(&self) -> ArchiveDB {
        ArchiveDB {
            overlay: self.overlay.clone(),
            backing: Arc::clone(&self.backing),
            column: self.column,
        }
    }
}

impl HashDB for ArchiveDB {
    fn get(&self, key: &H256) -> Option<DBValue> {
        if let Some((d, rc)) = self.overlay.raw(key) {
            if rc > 0 {
                return Some(d)
            }
        }
        self.payload(key)
    }

    fn contains(&self, key: &H256) -> bool {
        self.get(key).is_some()
    }

    fn insert(&mut self, value: &[u8]) -> H256 {
        self.overlay.insert(value)
    }

    fn emplace(&mut self, key: H256, value: DBValue) {
        self.overlay.emplace(key, value);
    }

    fn remove(&mut self, key: &H256) {
        self.overlay.remove(key);
    }
}

impl JournalDB for ArchiveDB {
    fn boxed_clone(&self) -> Box<dyn JournalDB> {
        Box::new(self.clone())
    }

    fn inject(&mut self, batch: &mut DBTransaction) -> io::Result<u32> {
        let mut inserts = 0u32;
        for (key, (value, rc)) in self.overlay.drain() {
            if rc > 0 {
                batch.put(self.column, key.as_bytes(), &value);
                inserts += 1;
            }
        }
        trace!("Injected {} nodes into column {}", inserts, self.column);
        Ok(inserts)
    }

    fn backing(&self) -> &Arc<dyn KeyValueDB> {
        &self.backing
    }

    fn as_hashdb(&self) -> &dyn HashDB {
        self
    }

    fn as_hashdb_mut(&mut self) -> &mut dyn HashDB {
        self
    }
}
