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

use ccrypto::{blake256, BLAKE_NULL_RLP};
use primitives::H256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::types::{Address, BlockNumber, ValidatorSet};

/// A block header of the local chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Parent hash.
    parent_hash: H256,
    /// Block author.
    author: Address,
    /// State root.
    state_root: H256,
    /// Block number.
    number: BlockNumber,
    /// Block timestamp.
    timestamp: u64,
    /// Validators expected to sign the next block.
    next_validator_set: ValidatorSet,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            parent_hash: H256::zero(),
            author: Default::default(),
            state_root: BLAKE_NULL_RLP,
            number: 0,
            timestamp: 0,
            next_validator_set: Vec::new(),
        }
    }
}

impl Header {
    /// Create a new, default-valued, header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the parent_hash field of the header.
    pub fn parent_hash(&self) -> &H256 {
        &self.parent_hash
    }
    /// Get the author field of the header.
    pub fn author(&self) -> &Address {
        &self.author
    }
    /// Get the state root field of the header.
    pub fn state_root(&self) -> &H256 {
        &self.state_root
    }
    /// Get the number field of the header.
    pub fn number(&self) -> BlockNumber {
        self.number
    }
    /// Get the timestamp field of the header.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
    pub fn next_validator_set(&self) -> &ValidatorSet {
        &self.next_validator_set
    }

    pub fn set_parent_hash(&mut self, a: H256) {
        self.parent_hash = a;
    }
    pub fn set_author(&mut self, a: Address) {
        self.author = a;
    }
    pub fn set_state_root(&mut self, a: H256) {
        self.state_root = a;
    }
    pub fn set_number(&mut self, a: BlockNumber) {
        self.number = a;
    }
    pub fn set_timestamp(&mut self, a: u64) {
        self.timestamp = a;
    }
    pub fn set_next_validator_set(&mut self, a: ValidatorSet) {
        self.next_validator_set = a;
    }

    /// Get the hash of this header (blake of the RLP).
    pub fn hash(&self) -> H256 {
        blake256(&self.rlp_bytes())
    }

    /// Place this header into an RLP stream `s`.
    pub fn stream_rlp(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&self.parent_hash);
        s.append(&self.author);
        s.append(&self.state_root);
        s.append(&self.number);
        s.append(&self.timestamp);
        s.begin_list(self.next_validator_set.len());
        for validator in &self.next_validator_set {
            s.append(validator);
        }
    }

    /// Get the RLP of this header.
    pub fn rlp_bytes(&self) -> Vec<u8> {
        let mut s = RlpStream::new();
        self.stream_rlp(&mut s);
        s.out().to_vec()
    }
}

impl Decodable for Header {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        let item_count = r.item_count()?;
        if item_count != 6 {
            return Err(DecoderError::RlpIncorrectListLen)
        }
        Ok(Header {
            parent_hash: r.val_at(0)?,
            author: r.val_at(1)?,
            state_root: r.val_at(2)?,
            number: r.val_at(3)?,
            timestamp: r.val_at(4)?,
            next_validator_set: r.list_at(5)?,
        })
    }
}

impl Encodable for Header {
    fn rlp_append(&self, s: &mut RlpStream) {
        self.stream_rlp(s);
    }
}
