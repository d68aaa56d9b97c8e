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

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::header::Header as BlockHeader;
use crate::ibc;
use crate::ibc::client_02 as client;
use crate::ibc::client_02::{client_state_path, consensus_state_path, root_path, Kind, KIND_CODECHAIN};
use crate::ibc::commitment_23 as commitment;
use crate::types::ValidatorSet;

/// The state of a client tracking a CodeChain chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    latest_height: u64,
    frozen: bool,
    trusting_period: u64,
    unbonding_period: u64,
}

impl ClientState {
    pub fn new(latest_height: u64, trusting_period: u64, unbonding_period: u64) -> Self {
        ClientState {
            latest_height,
            frozen: false,
            trusting_period,
            unbonding_period,
        }
    }

    pub fn trusting_period(&self) -> u64 {
        self.trusting_period
    }

    pub fn unbonding_period(&self) -> u64 {
        self.unbonding_period
    }
}

impl Encodable for ClientState {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        s.append(&KIND_CODECHAIN);
        s.append(&self.latest_height);
        s.append(&self.frozen);
        s.append(&self.trusting_period);
        s.append(&self.unbonding_period);
    }
}

impl Decodable for ClientState {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 5 {
            return Err(DecoderError::RlpIncorrectListLen)
        }
        let kind: Kind = rlp.val_at(0)?;
        if kind != KIND_CODECHAIN {
            return Err(DecoderError::Custom("Unexpected client kind"))
        }
        Ok(ClientState {
            latest_height: rlp.val_at(1)?,
            frozen: rlp.val_at(2)?,
            trusting_period: rlp.val_at(3)?,
            unbonding_period: rlp.val_at(4)?,
        })
    }
}

impl client::ClientState for ClientState {
    fn kind(&self) -> Kind {
        KIND_CODECHAIN
    }

    fn latest_height(&self) -> u64 {
        self.latest_height
    }

    fn set_latest_height(&mut self, height: u64) {
        self.latest_height = height;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusState {
    height: u64,
    timestamp: u64,
    root: commitment::merkle::Root,
    next_validator_set: ValidatorSet,
}

impl ConsensusState {
    pub fn new(
        height: u64,
        timestamp: u64,
        root: commitment::merkle::Root,
        next_validator_set: ValidatorSet,
    ) -> Self {
        ConsensusState {
            height,
            timestamp,
            root,
            next_validator_set,
        }
    }

    /// The consensus state a counterparty needs to track the chain of `header`.
    pub fn from_header(header: &BlockHeader) -> Self {
        ConsensusState {
            height: header.number(),
            timestamp: header.timestamp(),
            root: commitment::merkle::Root::new(*header.state_root()),
            next_validator_set: header.next_validator_set().clone(),
        }
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn root(&self) -> &commitment::merkle::Root {
        &self.root
    }

    pub fn next_validator_set(&self) -> &ValidatorSet {
        &self.next_validator_set
    }
}

impl Encodable for ConsensusState {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        s.append(&self.height);
        s.append(&self.timestamp);
        s.append(&self.root);
        s.begin_list(self.next_validator_set.len());
        for validator in &self.next_validator_set {
            s.append(validator);
        }
    }
}

impl Decodable for ConsensusState {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 4 {
            return Err(DecoderError::RlpIncorrectListLen)
        }
        Ok(ConsensusState {
            height: rlp.val_at(0)?,
            timestamp: rlp.val_at(1)?,
            root: rlp.val_at(2)?,
            next_validator_set: rlp.list_at(3)?,
        })
    }
}

impl client::ConsensusState for ConsensusState {
    fn kind(&self) -> Kind {
        KIND_CODECHAIN
    }

    fn get_height(&self) -> u64 {
        self.height
    }

    fn get_root(&self) -> &dyn commitment::Root {
        &self.root
    }

    fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

/// A header of the local chain, as handed to a counterparty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    raw: BlockHeader,
}

impl Header {
    pub fn new(raw: BlockHeader) -> Self {
        Header {
            raw,
        }
    }

    pub fn raw(&self) -> &BlockHeader {
        &self.raw
    }
}

impl client::Header for Header {
    fn kind(&self) -> Kind {
        KIND_CODECHAIN
    }

    fn get_height(&self) -> u64 {
        self.raw.number()
    }

    fn encode(&self) -> Vec<u8> {
        self.raw.rlp_bytes()
    }
}

pub struct State {
    id: String,
}

impl State {
    pub fn new(id: &str) -> Self {
        State {
            id: id.to_owned(),
        }
    }
}

impl client::State for State {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> Kind {
        KIND_CODECHAIN
    }

    fn get_client_state(&self, ctx: &dyn ibc::Context) -> Result<Option<Box<dyn client::ClientState>>, ibc::Error> {
        match ctx.get_kv_store().get(&client_state_path(&self.id))? {
            Some(bytes) => {
                let client_state: ClientState = rlp::decode(&bytes)?;
                Ok(Some(Box::new(client_state)))
            }
            None => Ok(None),
        }
    }

    fn get_consensus_state(
        &self,
        ctx: &dyn ibc::Context,
        height: u64,
    ) -> Result<Option<Box<dyn client::ConsensusState>>, ibc::Error> {
        match ctx.get_kv_store().get(&consensus_state_path(&self.id, height))? {
            Some(bytes) => {
                let cs: ConsensusState = rlp::decode(&bytes)?;
                Ok(Some(Box::new(cs)))
            }
            None => Ok(None),
        }
    }

    fn get_root(&self, ctx: &dyn ibc::Context, height: u64) -> Result<Option<Box<dyn commitment::Root>>, ibc::Error> {
        match ctx.get_kv_store().get(&root_path(&self.id, height))? {
            Some(bytes) => {
                let root: commitment::merkle::Root = rlp::decode(&bytes)?;
                Ok(Some(Box::new(root)))
            }
            None => Ok(None),
        }
    }
}
