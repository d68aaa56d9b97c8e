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

use rlp::{Rlp, RlpStream};

use super::{
    client_state_path, consensus_heights_path, consensus_state_path, pruned_below_path, root_path, type_path,
};
use crate::ibc;
use crate::ibc::commitment_23 as commitment;

pub type Kind = u8;

pub const KIND_CODECHAIN: Kind = 0_u8;

pub trait ClientState {
    fn kind(&self) -> Kind;
    fn latest_height(&self) -> u64;
    fn set_latest_height(&mut self, height: u64);
    fn is_frozen(&self) -> bool;
    fn freeze(&mut self);
    fn encode(&self) -> Vec<u8>;
}

pub trait ConsensusState {
    fn kind(&self) -> Kind;
    fn get_height(&self) -> u64;
    fn get_root(&self) -> &dyn commitment::Root;
    fn encode(&self) -> Vec<u8>;
}

pub trait Header {
    fn kind(&self) -> Kind;
    fn get_height(&self) -> u64;
    fn encode(&self) -> Vec<u8>;
}

/// Store access of a single client.
pub trait State {
    fn id(&self) -> &str;
    fn kind(&self) -> Kind;

    fn get_client_state(&self, ctx: &dyn ibc::Context) -> Result<Option<Box<dyn ClientState>>, ibc::Error>;
    fn get_consensus_state(
        &self,
        ctx: &dyn ibc::Context,
        height: u64,
    ) -> Result<Option<Box<dyn ConsensusState>>, ibc::Error>;
    fn get_root(&self, ctx: &dyn ibc::Context, height: u64) -> Result<Option<Box<dyn commitment::Root>>, ibc::Error>;

    fn exists(&self, ctx: &dyn ibc::Context) -> Result<bool, ibc::Error> {
        ctx.get_kv_store().has(&type_path(self.id()))
    }

    fn set_type(&self, ctx: &mut dyn ibc::Context) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().set(&type_path(self.id()), &[self.kind()])
    }

    fn set_client_state(&self, ctx: &mut dyn ibc::Context, client_state: &dyn ClientState) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().set(&client_state_path(self.id()), &client_state.encode())
    }

    fn set_consensus_state(&self, ctx: &mut dyn ibc::Context, cs: &dyn ConsensusState) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().set(&consensus_state_path(self.id(), cs.get_height()), &cs.encode())
    }

    fn remove_consensus_state(&self, ctx: &mut dyn ibc::Context, height: u64) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().remove(&consensus_state_path(self.id(), height))
    }

    fn set_root(&self, ctx: &mut dyn ibc::Context, height: u64, root: &dyn commitment::Root) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().set(&root_path(self.id(), height), &root.encode())
    }

    fn remove_root(&self, ctx: &mut dyn ibc::Context, height: u64) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().remove(&root_path(self.id(), height))
    }

    /// Heights of the stored consensus states, ascending.
    fn consensus_heights(&self, ctx: &dyn ibc::Context) -> Result<Vec<u64>, ibc::Error> {
        match ctx.get_kv_store().get(&consensus_heights_path(self.id()))? {
            Some(bytes) => Ok(Rlp::new(&bytes).as_list()?),
            None => Ok(Vec::new()),
        }
    }

    fn set_consensus_heights(&self, ctx: &mut dyn ibc::Context, heights: &[u64]) -> Result<(), ibc::Error> {
        let mut s = RlpStream::new_list(heights.len());
        for height in heights {
            s.append(height);
        }
        ctx.get_kv_store_mut().set(&consensus_heights_path(self.id()), &s.out())
    }

    /// Heights below this value have been pruned and stay unavailable.
    fn pruned_below(&self, ctx: &dyn ibc::Context) -> Result<u64, ibc::Error> {
        match ctx.get_kv_store().get(&pruned_below_path(self.id()))? {
            Some(bytes) => Ok(Rlp::new(&bytes).as_val()?),
            None => Ok(0),
        }
    }

    fn set_pruned_below(&self, ctx: &mut dyn ibc::Context, below: u64) -> Result<(), ibc::Error> {
        ctx.get_kv_store_mut().set(&pruned_below_path(self.id()), &rlp::encode(&below))
    }
}
