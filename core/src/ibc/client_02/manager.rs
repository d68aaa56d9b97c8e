// Copyright 2019 Kodebox, Inc.
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

use rlp::DecoderError;

use super::types::{ClientState, ConsensusState, State};
use super::{new_state, type_path, validate_identifier};
use crate::ibc;

/// Keeps the stored states of the clients.
///
/// The headers are verified before they reach here. The caller is expected to
/// run one write at a time, which `Client::commit_block` guarantees.
#[derive(Default)]
pub struct Manager {
    consensus_state_retention: Option<u64>,
}

impl Manager {
    pub fn new() -> Self {
        Manager::default()
    }

    pub fn with_config(config: &ibc::Config) -> Self {
        Manager {
            consensus_state_retention: config.consensus_state_retention,
        }
    }

    pub fn create(
        &self,
        ctx: &mut dyn ibc::Context,
        id: &str,
        mut client_state: Box<dyn ClientState>,
        cs: &dyn ConsensusState,
    ) -> Result<Box<dyn State>, ibc::Error> {
        validate_identifier(id)?;
        if client_state.kind() != cs.kind() {
            return Err(ibc::Error::InvalidClientKind(cs.kind()))
        }
        let state = new_state(id, client_state.kind())?;
        if state.exists(ctx)? {
            return Err(ibc::Error::ClientAlreadyExists(id.to_string()))
        }

        let height = cs.get_height();
        client_state.set_latest_height(height);
        state.set_type(ctx)?;
        state.set_client_state(ctx, &*client_state)?;
        state.set_consensus_state(ctx, cs)?;
        state.set_root(ctx, height, cs.get_root())?;
        state.set_consensus_heights(ctx, &[height])?;
        cinfo!(IBC, "Client {} is created at height {}", id, height);
        Ok(state)
    }

    pub fn query(&self, ctx: &dyn ibc::Context, id: &str) -> Result<Box<dyn State>, ibc::Error> {
        validate_identifier(id)?;
        let kind = ctx.get_kv_store().get(&type_path(id))?.ok_or_else(|| ibc::Error::ClientNotFound(id.to_string()))?;
        match kind.as_slice() {
            [kind] => new_state(id, *kind),
            _ => Err(DecoderError::Custom("Invalid client type").into()),
        }
    }

    /// Store a consensus state of a verified header.
    pub fn record(&self, ctx: &mut dyn ibc::Context, id: &str, cs: &dyn ConsensusState) -> Result<(), ibc::Error> {
        let state = self.query(ctx, id)?;
        let mut client_state = client_state_of(&*state, ctx)?;
        if client_state.is_frozen() {
            return Err(ibc::Error::ClientFrozen(id.to_string()))
        }
        if cs.kind() != state.kind() {
            return Err(ibc::Error::InvalidClientKind(cs.kind()))
        }

        let height = cs.get_height();
        if height < state.pruned_below(ctx)? {
            return Err(ibc::Error::ConsensusStateExpired {
                id: id.to_string(),
                height,
            })
        }
        if let Some(recorded) = state.get_consensus_state(ctx, height)? {
            if recorded.encode() == cs.encode() {
                return Ok(())
            }
            return Err(ibc::Error::ConsensusStateAlreadyRecorded {
                id: id.to_string(),
                height,
            })
        }

        state.set_consensus_state(ctx, cs)?;
        state.set_root(ctx, height, cs.get_root())?;
        let mut heights = state.consensus_heights(ctx)?;
        if let Err(position) = heights.binary_search(&height) {
            heights.insert(position, height);
        }
        state.set_consensus_heights(ctx, &heights)?;
        cdebug!(IBC, "Consensus state of {} is recorded at {}", id, height);

        if height > client_state.latest_height() {
            client_state.set_latest_height(height);
            state.set_client_state(ctx, &*client_state)?;
        }

        if let Some(retention) = self.consensus_state_retention {
            let below = client_state.latest_height().saturating_sub(retention);
            self.prune(ctx, &*state, below)?;
        }
        Ok(())
    }

    pub fn freeze(&self, ctx: &mut dyn ibc::Context, id: &str) -> Result<(), ibc::Error> {
        let state = self.query(ctx, id)?;
        let mut client_state = client_state_of(&*state, ctx)?;
        if client_state.is_frozen() {
            return Ok(())
        }
        client_state.freeze();
        state.set_client_state(ctx, &*client_state)?;
        cinfo!(IBC, "Client {} is frozen", id);
        Ok(())
    }

    /// Delete the consensus states and roots below `below`. Returns the number of deleted heights.
    /// Heights below `below` can not be recorded again.
    pub fn prune_consensus_states(
        &self,
        ctx: &mut dyn ibc::Context,
        id: &str,
        below: u64,
    ) -> Result<usize, ibc::Error> {
        let state = self.query(ctx, id)?;
        self.prune(ctx, &*state, below)
    }

    fn prune(&self, ctx: &mut dyn ibc::Context, state: &dyn State, below: u64) -> Result<usize, ibc::Error> {
        if below > state.pruned_below(ctx)? {
            state.set_pruned_below(ctx, below)?;
        }
        let heights = state.consensus_heights(ctx)?;
        let (pruned, kept): (Vec<u64>, Vec<u64>) = heights.into_iter().partition(|height| *height < below);
        if pruned.is_empty() {
            return Ok(0)
        }
        for height in &pruned {
            state.remove_consensus_state(ctx, *height)?;
            state.remove_root(ctx, *height)?;
        }
        state.set_consensus_heights(ctx, &kept)?;
        cdebug!(IBC, "Pruned {} consensus states of {} below {}", pruned.len(), state.id(), below);
        Ok(pruned.len())
    }
}

fn client_state_of(state: &dyn State, ctx: &dyn ibc::Context) -> Result<Box<dyn ClientState>, ibc::Error> {
    state.get_client_state(ctx)?.ok_or_else(|| ibc::Error::ClientNotFound(state.id().to_string()))
}
