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

use std::collections::BTreeMap;
use std::sync::Arc;

use cmerkle::{HashDB, TrieError};
use journaldb::JournalDB;
use parking_lot::RwLock;
use primitives::H256;

use super::TopLevelState;
use crate::error::Error;
use crate::types::BlockNumber;

/// Roots of the committed snapshots, indexed by height.
#[derive(Default)]
struct Snapshots {
    roots: BTreeMap<BlockNumber, H256>,
    /// Heights below this one were pruned.
    pruned_below: BlockNumber,
}

impl Snapshots {
    fn latest(&self) -> Option<(BlockNumber, H256)> {
        self.roots.iter().next_back().map(|(height, root)| (*height, *root))
    }
}

/// State database keeping every committed snapshot of the trie.
///
/// Clones share the backing database and the snapshot index, so a clone is the
/// way to hand a read view to another thread.
pub struct StateDB {
    /// Backing database.
    db: Box<dyn JournalDB>,
    snapshots: Arc<RwLock<Snapshots>>,
}

impl StateDB {
    /// Create a new instance wrapping `JournalDB`.
    pub fn new(db: Box<dyn JournalDB>) -> StateDB {
        StateDB {
            db,
            snapshots: Default::default(),
        }
    }

    /// Conversion method to interpret self as `HashDB` reference
    pub fn as_hashdb(&self) -> &dyn HashDB {
        self.db.as_hashdb()
    }

    /// Conversion method to interpret self as mutable `HashDB` reference
    pub fn as_hashdb_mut(&mut self) -> &mut dyn HashDB {
        self.db.as_hashdb_mut()
    }

    pub fn journal_db(&self) -> &dyn JournalDB {
        &*self.db
    }

    /// Flush the pending trie nodes to the backing database.
    pub fn commit(&mut self) -> Result<u32, Error> {
        Ok(self.db.commit()?)
    }

    /// Register `root` as the snapshot of `height`.
    pub fn commit_root(&self, height: BlockNumber, root: H256) -> Result<(), Error> {
        if !self.db.contains(&root) {
            return Err(TrieError::InvalidStateRoot(root).into())
        }
        let mut snapshots = self.snapshots.write();
        if let Some((latest, _)) = snapshots.latest() {
            if height <= latest {
                return Err(Error::NonIncreasingHeight {
                    latest,
                    given: height,
                })
            }
        }
        snapshots.roots.insert(height, root);
        ctrace!(STATE, "State root of #{} is {:?}", height, root);
        Ok(())
    }

    /// The root of the snapshot at `height`.
    pub fn root_at(&self, height: BlockNumber) -> Result<H256, Error> {
        let snapshots = self.snapshots.read();
        snapshots.roots.get(&height).cloned().ok_or_else(|| Error::HeightNotAvailable(height))
    }

    /// The latest committed snapshot.
    pub fn latest(&self) -> Option<(BlockNumber, H256)> {
        self.snapshots.read().latest()
    }

    /// The oldest snapshot that was not pruned yet.
    pub fn earliest_height(&self) -> Option<BlockNumber> {
        self.snapshots.read().roots.keys().next().cloned()
    }

    /// Heights below this one are pruned.
    pub fn pruned_below(&self) -> BlockNumber {
        self.snapshots.read().pruned_below
    }

    /// A read view of the snapshot at `height`, or of the latest snapshot if `height` is `None`.
    pub fn state_at(&self, height: Option<BlockNumber>) -> Result<TopLevelState, Error> {
        match height {
            Some(height) => Ok(TopLevelState::from_existing(self.clone(), self.root_at(height)?)?),
            None => Ok(self.latest_state()?.1),
        }
    }

    /// A read view of the latest snapshot and its height.
    pub fn latest_state(&self) -> Result<(BlockNumber, TopLevelState), Error> {
        let (height, root) = self.latest().ok_or(Error::HeightNotAvailable(0))?;
        Ok((height, TopLevelState::from_existing(self.clone(), root)?))
    }

    /// Drop the snapshots below `below` from the index. The latest snapshot is always kept.
    /// Returns the number of dropped snapshots.
    pub fn prune(&self, below: BlockNumber) -> usize {
        let mut snapshots = self.snapshots.write();
        let below = match snapshots.latest() {
            Some((latest, _)) => below.min(latest),
            None => return 0,
        };
        if below <= snapshots.pruned_below {
            return 0
        }
        let kept = snapshots.roots.split_off(&below);
        let pruned = snapshots.roots.len();
        snapshots.roots = kept;
        snapshots.pruned_below = below;
        if pruned > 0 {
            cdebug!(STATE, "Pruned {} snapshots below #{}", pruned, below);
        }
        pruned
    }
}

impl Clone for StateDB {
    fn clone(&self) -> Self {
        StateDB {
            db: self.db.boxed_clone(),
            snapshots: Arc::clone(&self.snapshots),
        }
    }
}

#[cfg(test)]
mod tests {
    use ccrypto::BLAKE_NULL_RLP;

    use super::*;
    use crate::tests::helpers::get_temp_state_db;

    fn commit_value(db: &StateDB, height: BlockNumber, key: &[u8], value: &[u8]) -> H256 {
        let mut state = db.state_at(None).unwrap();
        state.set(key, value).unwrap();
        let root = state.commit().unwrap();
        db.commit_root(height, root).unwrap();
        root
    }

    #[test]
    fn heights_must_increase() {
        let db = get_temp_state_db();
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        let root = commit_value(&db, 1, b"key", b"value");
        match db.commit_root(1, root) {
            Err(Error::NonIncreasingHeight {
                latest: 1,
                given: 1,
            }) => {}
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn unknown_root_is_rejected() {
        let db = get_temp_state_db();
        match db.commit_root(0, H256::repeat_byte(7)) {
            Err(Error::Trie(TrieError::InvalidStateRoot(_))) => {}
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn historical_states_are_readable() {
        let db = get_temp_state_db();
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        commit_value(&db, 1, b"key", b"first");
        commit_value(&db, 2, b"key", b"second");

        assert_eq!(db.state_at(Some(0)).unwrap().get(b"key").unwrap(), None);
        assert_eq!(db.state_at(Some(1)).unwrap().get(b"key").unwrap(), Some(b"first".to_vec()));
        assert_eq!(db.state_at(Some(2)).unwrap().get(b"key").unwrap(), Some(b"second".to_vec()));
        assert_eq!(db.state_at(None).unwrap().get(b"key").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn future_height_is_not_available() {
        let db = get_temp_state_db();
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        match db.state_at(Some(1)) {
            Err(Error::HeightNotAvailable(1)) => {}
            Err(err) => panic!("Unexpected error {}", err),
            Ok(_) => panic!("Height 1 is not committed"),
        }
    }

    #[test]
    fn pruned_height_is_not_available() {
        let db = get_temp_state_db();
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        commit_value(&db, 1, b"key", b"first");
        commit_value(&db, 2, b"key", b"second");

        assert_eq!(db.prune(2), 2);
        assert_eq!(db.earliest_height(), Some(2));
        for _ in 0..3 {
            match db.state_at(Some(1)) {
                Err(Error::HeightNotAvailable(1)) => {}
                Err(err) => panic!("Unexpected error {}", err),
                Ok(_) => panic!("Height 1 is pruned"),
            }
        }
        assert_eq!(db.state_at(Some(2)).unwrap().get(b"key").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn latest_is_never_pruned() {
        let db = get_temp_state_db();
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        let root = commit_value(&db, 1, b"key", b"value");

        assert_eq!(db.prune(100), 1);
        assert_eq!(db.latest(), Some((1, root)));
        assert_eq!(db.pruned_below(), 1);
        assert_eq!(db.prune(1), 0);
    }

    #[test]
    fn latest_state_comes_with_its_height() {
        let db = get_temp_state_db();
        match db.latest_state() {
            Err(Error::HeightNotAvailable(0)) => {}
            Err(err) => panic!("Unexpected error {}", err),
            Ok(_) => panic!("Nothing is committed"),
        }
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        let root = commit_value(&db, 1, b"key", b"value");

        let (height, state) = db.latest_state().unwrap();
        assert_eq!(height, 1);
        assert_eq!(state.root(), &root);
        db.prune(2);
        assert_eq!(state.get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn view_outlives_pruning() {
        let db = get_temp_state_db();
        db.commit_root(0, BLAKE_NULL_RLP).unwrap();
        commit_value(&db, 1, b"key", b"first");
        let view = db.state_at(Some(1)).unwrap();
        commit_value(&db, 2, b"key", b"second");
        db.prune(2);

        assert_eq!(view.get(b"key").unwrap(), Some(b"first".to_vec()));
    }
}
