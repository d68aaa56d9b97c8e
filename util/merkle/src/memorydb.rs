// Copyright 2018 Kodebox, Inc.
// This file is part of CodeChain.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::mem;

use ccrypto::{blake256, BLAKE_NULL_RLP};
use primitives::H256;
use rlp::NULL_RLP;

use crate::hashdb::{DBValue, HashDB};

/// Reference-counted memory-based `HashDB` implementation.
///
/// Use `new()` to create a new database. Insert items with `insert()`, remove items
/// with `remove()`, check for existence with `contains()` and lookup a hash to derive
/// the data with `get()`. `drain()` hands the pending entries to a backing database.
///
/// The node of the empty trie is always present and never stored.
#[derive(Default, Clone, PartialEq)]
pub struct MemoryDB {
    data: HashMap<H256, (DBValue, i32)>,
}

impl MemoryDB {
    /// Create a new instance of the memory DB.
    pub fn new() -> MemoryDB {
        MemoryDB {
            data: HashMap::new(),
        }
    }

    /// Return the internal map of hashes to data, clearing the current state.
    pub fn drain(&mut self) -> HashMap<H256, (DBValue, i32)> {
        mem::replace(&mut self.data, HashMap::new())
    }

    /// Grab the raw information associated with a key. Returns None if the key
    /// doesn't exist.
    ///
    /// Even when Some is returned, the data is only guaranteed to be useful
    /// when the refs > 0.
    pub fn raw(&self, key: &H256) -> Option<(DBValue, i32)> {
        if key == &BLAKE_NULL_RLP {
            return Some((DBValue::from_slice(&NULL_RLP), 1))
        }
        self.data.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl HashDB for MemoryDB {
    fn get(&self, key: &H256) -> Option<DBValue> {
        if key == &BLAKE_NULL_RLP {
            return Some(DBValue::from_slice(&NULL_RLP))
        }

        match self.data.get(key) {
            Some(&(ref d, rc)) if rc > 0 => Some(d.clone()),
            _ => None,
        }
    }

    fn contains(&self, key: &H256) -> bool {
        if key == &BLAKE_NULL_RLP {
            return true
        }

        match self.data.get(key) {
            Some(&(_, x)) if x > 0 => true,
            _ => false,
        }
    }

    fn insert(&mut self, value: &[u8]) -> H256 {
        if value == &NULL_RLP[..] {
            return BLAKE_NULL_RLP
        }
        let key = blake256(value);
        match self.data.entry(key) {
            Entry::Occupied(mut entry) => {
                let &mut (ref mut old_value, ref mut rc) = entry.get_mut();
                if *rc <= 0 {
                    *old_value = DBValue::from_slice(value);
                }
                *rc += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert((DBValue::from_slice(value), 1));
            }
        }
        key
    }

    fn emplace(&mut self, key: H256, value: DBValue) {
        if &*value == &NULL_RLP[..] {
            return
        }

        match self.data.entry(key) {
            Entry::Occupied(mut entry) => {
                let &mut (ref mut old_value, ref mut rc) = entry.get_mut();
                if *rc <= 0 {
                    *old_value = value;
                }
                *rc += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert((value, 1));
            }
        }
    }

    fn remove(&mut self, key: &H256) {
        if key == &BLAKE_NULL_RLP {
            return
        }

        match self.data.entry(*key) {
            Entry::Occupied(mut entry) => {
                let &mut (_, ref mut rc) = entry.get_mut();
                *rc -= 1;
            }
            Entry::Vacant(entry) => {
                entry.insert((DBValue::new(), -1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memorydb_remove_before_insert() {
        let hello_bytes = b"Hello world!";
        let hello_key = blake256(hello_bytes);

        let mut m = MemoryDB::new();
        m.remove(&hello_key);
        assert_eq!(m.raw(&hello_key).unwrap().1, -1);
        m.insert(hello_bytes);
        assert_eq!(m.raw(&hello_key).unwrap().1, 0);
        assert!(!m.contains(&hello_key));

        let mut m = MemoryDB::new();
        m.insert(hello_bytes);
        m.insert(hello_bytes);
        m.remove(&hello_key);
        assert!(m.contains(&hello_key));
        m.remove(&hello_key);
        assert!(!m.contains(&hello_key));
    }

    #[test]
    fn null_node_is_always_present() {
        let m = MemoryDB::new();
        assert!(m.contains(&BLAKE_NULL_RLP));
        assert_eq!(m.get(&BLAKE_NULL_RLP).unwrap(), DBValue::from_slice(&NULL_RLP));
        assert!(m.is_empty());
    }

    #[test]
    fn drain_takes_everything() {
        let mut m = MemoryDB::new();
        let key = m.insert(b"value");
        let drained = m.drain();
        assert_eq!(drained.get(&key).map(|(_, rc)| *rc), Some(1));
        assert!(!m.contains(&key));
    }
}
