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

use cmerkle::{CryptoProof, Result as TrieResult, Trie, TrieError, TrieFactory, TrieMut};
use primitives::H256;

use super::StateDB;
use crate::error::Error;

/// A view of the world state rooted at `root`.
///
/// Changes made through `set` and `remove` stay in the view until `commit`
/// writes the new nodes to the backing database.
pub struct TopLevelState {
    db: StateDB,
    root: H256,
}

impl TopLevelState {
    /// Creates new state with existing state root
    pub fn from_existing(db: StateDB, root: H256) -> Result<Self, TrieError> {
        if !db.as_hashdb().contains(&root) {
            return Err(TrieError::InvalidStateRoot(root))
        }

        Ok(TopLevelState {
            db,
            root,
        })
    }

    /// Return the root of the state.
    pub fn root(&self) -> &H256 {
        &self.root
    }

    pub fn get(&self, key: &[u8]) -> TrieResult<Option<Vec<u8>>> {
        let trie = TrieFactory::readonly(self.db.as_hashdb(), &self.root)?;
        Ok(trie.get(key)?.map(|value| value.into_vec()))
    }

    pub fn contains(&self, key: &[u8]) -> TrieResult<bool> {
        let trie = TrieFactory::readonly(self.db.as_hashdb(), &self.root)?;
        trie.contains(key)
    }

    /// The value of `key` and the proof of its inclusion under `root()`.
    pub fn get_with_proof(&self, key: &[u8]) -> TrieResult<Option<(Vec<u8>, CryptoProof)>> {
        let trie = TrieFactory::readonly(self.db.as_hashdb(), &self.root)?;
        Ok(trie.get_with_proof(key)?.map(|(value, proof)| (value.into_vec(), proof)))
    }

    pub fn set(&mut self, key: &[u8], value: &[u8]) -> TrieResult<()> {
        let mut trie = TrieFactory::from_existing(self.db.as_hashdb_mut(), &mut self.root)?;
        trie.insert(key, value)?;
        Ok(())
    }

    pub fn remove(&mut self, key: &[u8]) -> TrieResult<()> {
        let mut trie = TrieFactory::from_existing(self.db.as_hashdb_mut(), &mut self.root)?;
        trie.remove(key)?;
        Ok(())
    }

    /// Write the pending nodes to the backing database and return the new root.
    pub fn commit(&mut self) -> Result<H256, Error> {
        let written = self.db.commit()?;
        ctrace!(STATE, "Committed {} nodes under {:?}", written, self.root);
        Ok(self.root)
    }
}

#[cfg(test)]
mod tests {
    use ccrypto::BLAKE_NULL_RLP;
    use cmerkle::verify;

    use super::*;
    use crate::tests::helpers::get_temp_state_db;

    fn empty_state() -> TopLevelState {
        TopLevelState::from_existing(get_temp_state_db(), BLAKE_NULL_RLP).unwrap()
    }

    #[test]
    fn unknown_root_is_invalid() {
        let root = H256::repeat_byte(1);
        match TopLevelState::from_existing(get_temp_state_db(), root) {
            Err(TrieError::InvalidStateRoot(r)) => assert_eq!(r, root),
            _ => panic!("The root must be rejected"),
        }
    }

    #[test]
    fn set_get_remove() {
        let mut state = empty_state();
        assert_eq!(state.get(b"a").unwrap(), None);

        state.set(b"a", b"1").unwrap();
        state.set(b"b", b"2").unwrap();
        assert_eq!(state.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert!(state.contains(b"b").unwrap());

        state.remove(b"b").unwrap();
        assert!(!state.contains(b"b").unwrap());
        assert_ne!(state.root(), &BLAKE_NULL_RLP);

        state.remove(b"a").unwrap();
        assert_eq!(state.root(), &BLAKE_NULL_RLP);
    }

    #[test]
    fn committed_nodes_are_visible_to_other_views() {
        let db = get_temp_state_db();
        let mut state = TopLevelState::from_existing(db.clone(), BLAKE_NULL_RLP).unwrap();
        state.set(b"key", b"value").unwrap();
        let root = *state.root();

        assert!(TopLevelState::from_existing(db.clone(), root).is_err());
        assert_eq!(state.commit().unwrap(), root);

        let other = TopLevelState::from_existing(db, root).unwrap();
        assert_eq!(other.get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn proof_matches_root() {
        let mut state = empty_state();
        for i in 0..20u8 {
            state.set(&[b'k', i], &[i; 3]).unwrap();
        }
        let (value, proof) = state.get_with_proof(&[b'k', 7]).unwrap().unwrap();
        assert_eq!(value, vec![7; 3]);
        assert!(verify(state.root(), &[b'k', 7], &value, &proof));
        assert!(!verify(state.root(), &[b'k', 8], &value, &proof));
        assert_eq!(state.get_with_proof(b"missing").unwrap(), None);
    }
}
