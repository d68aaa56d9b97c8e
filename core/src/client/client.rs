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

use std::collections::HashMap;
use std::sync::Arc;

use ccrypto::BLAKE_NULL_RLP;
use kvdb::KeyValueDB;
use parking_lot::{Mutex, RwLock};
use primitives::H256;

use super::{BlockChainClient, ClientConfig, StateInfo};
use crate::db::COL_STATE;
use crate::error::Error;
use crate::header::Header;
use crate::state::{StateDB, TopLevelState};
use crate::types::{BlockId, BlockNumber, ValidatorSet};

struct Chain {
    /// Canonical headers, indexed by block number.
    headers: Vec<Header>,
    numbers: HashMap<H256, BlockNumber>,
}

impl Chain {
    fn best_block_header(&self) -> &Header {
        self.headers.last().expect("The genesis header always exists")
    }
}

/// The local chain: its headers and the state committed by each block.
pub struct Client {
    config: ClientConfig,
    state_db: StateDB,
    chain: RwLock<Chain>,
    /// Only one block is built at a time.
    import_lock: Mutex<()>,
}

impl Client {
    pub fn new(config: ClientConfig, db: Arc<dyn KeyValueDB>) -> Result<Arc<Client>, Error> {
        let journal_db = journaldb::new(db, journaldb::Algorithm::Archive, COL_STATE);
        let state_db = StateDB::new(journal_db);

        let genesis = Header::new();
        state_db.commit_root(genesis.number(), *genesis.state_root())?;
        let mut numbers = HashMap::new();
        numbers.insert(genesis.hash(), genesis.number());
        cinfo!(CLIENT, "Genesis block {:?}", genesis.hash());

        Ok(Arc::new(Client {
            config,
            state_db,
            chain: RwLock::new(Chain {
                headers: vec![genesis],
                numbers,
            }),
            import_lock: Mutex::new(()),
        }))
    }

    pub fn state_db(&self) -> &StateDB {
        &self.state_db
    }

    /// Build a block on top of the best block.
    ///
    /// `f` modifies a copy of the latest state. Nothing is written when it fails.
    pub fn commit_block<F, E>(&self, timestamp: u64, next_validator_set: ValidatorSet, f: F) -> Result<Header, E>
    where
        F: FnOnce(&mut TopLevelState) -> Result<(), E>,
        E: From<Error>, {
        let _import_lock = self.import_lock.lock();
        let parent = self.best_block_header();

        let mut state =
            TopLevelState::from_existing(self.state_db.clone(), *parent.state_root()).map_err(Error::from)?;
        f(&mut state)?;
        let state_root = state.commit()?;

        let mut header = Header::new();
        header.set_parent_hash(parent.hash());
        header.set_author(self.config.author);
        header.set_state_root(state_root);
        header.set_number(parent.number() + 1);
        header.set_timestamp(timestamp);
        header.set_next_validator_set(next_validator_set);

        // The best header and the latest snapshot move together under the chain lock.
        let hash = header.hash();
        {
            let mut chain = self.chain.write();
            self.state_db.commit_root(header.number(), state_root)?;
            chain.numbers.insert(hash, header.number());
            chain.headers.push(header.clone());
        }
        cinfo!(CLIENT, "Imported #{} {:?}", header.number(), hash);

        if let Some(history) = self.config.state_history {
            let kept = history.max(1);
            self.prune((header.number() + 1).saturating_sub(kept));
        }
        Ok(header)
    }

    /// Drop the state snapshots of the blocks below `below`. The best block's state is always kept.
    pub fn prune(&self, below: BlockNumber) -> usize {
        let pruned = self.state_db.prune(below);
        if pruned > 0 {
            cdebug!(CLIENT, "States below #{} are pruned", self.state_db.pruned_below());
        }
        pruned
    }

    fn block_number_ref(chain: &Chain, id: &BlockId) -> Option<BlockNumber> {
        let best = chain.best_block_header().number();
        match id {
            BlockId::Number(number) if *number <= best => Some(*number),
            BlockId::Number(_) => None,
            BlockId::Hash(hash) => chain.numbers.get(hash).cloned(),
            BlockId::Earliest => Some(0),
            BlockId::Latest => Some(best),
        }
    }
}

impl BlockChainClient for Client {
    fn block_header(&self, id: &BlockId) -> Option<Header> {
        let chain = self.chain.read();
        Self::block_number_ref(&chain, id).and_then(|number| chain.headers.get(number as usize).cloned())
    }

    fn best_block_header(&self) -> Header {
        self.chain.read().best_block_header().clone()
    }

    fn block_number(&self, id: &BlockId) -> Option<BlockNumber> {
        Self::block_number_ref(&self.chain.read(), id)
    }
}

impl StateInfo for Client {
    fn state_at(&self, id: BlockId) -> Result<TopLevelState, Error> {
        let number = match id {
            BlockId::Number(number) => number,
            _ => self.block_number(&id).ok_or_else(|| Error::BlockNotFound(id))?,
        };
        self.state_db.state_at(Some(number))
    }

    fn latest_state(&self) -> Result<(BlockNumber, TopLevelState), Error> {
        let _chain = self.chain.read();
        self.state_db.latest_state()
    }
}
