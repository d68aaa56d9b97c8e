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

use std::sync::Arc;

use kvdb::KeyValueDB;
use primitives::H256;

use crate::client::{Client, ClientConfig};
use crate::db::{COL_STATE, NUM_COLUMNS};
use crate::ibc::client_02::{codechain, Manager};
use crate::ibc::commitment_23::merkle::{Prefix, Root};
use crate::ibc::{self, IBCQuerier, TopLevelContext};
use crate::state::{StateDB, TopLevelState};
use crate::types::Public;

pub fn new_db() -> Arc<dyn KeyValueDB> {
    Arc::new(kvdb_memorydb::create(NUM_COLUMNS))
}

pub fn get_temp_state_db() -> StateDB {
    let journal_db = journaldb::new(new_db(), journaldb::Algorithm::Archive, COL_STATE);
    StateDB::new(journal_db)
}

pub fn get_test_client() -> Arc<Client> {
    Client::new(ClientConfig::default(), new_db()).unwrap()
}

pub fn get_test_client_with_history(state_history: u64) -> Arc<Client> {
    let config = ClientConfig {
        state_history: Some(state_history),
        ..Default::default()
    };
    Client::new(config, new_db()).unwrap()
}

pub fn get_test_querier(client: &Arc<Client>) -> IBCQuerier<Client> {
    IBCQuerier::new(Arc::clone(client), &ibc::Config::default())
}

/// A consensus state whose root is filled with the low byte of `height`.
pub fn consensus_state(height: u64, timestamp: u64) -> codechain::ConsensusState {
    codechain::ConsensusState::new(
        height,
        timestamp,
        Root::new(H256::repeat_byte(height as u8)),
        vec![Public::repeat_byte(height as u8)],
    )
}

fn ibc_block<F>(client: &Client, f: F)
where
    F: FnOnce(&mut dyn ibc::Context) -> Result<(), ibc::Error>, {
    client
        .commit_block(0, Vec::new(), |state: &mut TopLevelState| {
            let mut ctx = TopLevelContext::new(state, Prefix::new(ibc::DEFAULT_COMMITMENT_PREFIX.to_vec()));
            f(&mut ctx)
        })
        .unwrap();
}

/// Commits a block that creates client `id` with a consensus state at `height`.
pub fn create_client(client: &Client, id: &str, height: u64) {
    ibc_block(client, |ctx| {
        let client_state = Box::new(codechain::ClientState::new(height, 100, 200));
        Manager::new().create(ctx, id, client_state, &consensus_state(height, 0))?;
        Ok(())
    });
}

/// Commits a block that records a consensus state of client `id` at `height`.
pub fn record_consensus_state(client: &Client, id: &str, height: u64) {
    ibc_block(client, |ctx| Manager::new().record(ctx, id, &consensus_state(height, 0)));
}
