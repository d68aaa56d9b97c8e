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

use cmerkle::CryptoProof;
use primitives::H256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpDecodable, RlpEncodable, RlpStream};

use super::super::types;

pub const MERKLE_KIND: &str = "merkle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct Root {
    hash: H256,
}

impl Root {
    pub fn new(hash: H256) -> Self {
        Root {
            hash,
        }
    }

    pub fn hash(&self) -> &H256 {
        &self.hash
    }
}

impl types::Root for Root {
    fn commitment_kind(&self) -> &'static str {
        MERKLE_KIND
    }

    fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

/// Namespace of the store in the state trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    key_prefix: Vec<u8>,
}

impl Prefix {
    pub fn new(key_prefix: Vec<u8>) -> Self {
        Prefix {
            key_prefix,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key_prefix
    }

    /// The commitment path of `path`.
    pub fn key(&self, path: &str) -> Vec<u8> {
        join(&self.key_prefix, path.as_bytes())
    }
}

impl Encodable for Prefix {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.key_prefix);
    }
}

impl Decodable for Prefix {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Ok(Prefix {
            key_prefix: rlp.as_val()?,
        })
    }
}

impl types::Prefix for Prefix {
    fn commitment_kind(&self) -> &'static str {
        MERKLE_KIND
    }

    fn key(&self, path: &str) -> Vec<u8> {
        join(&self.key_prefix, path.as_bytes())
    }

    fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

/// Inclusion proof of `key` in the state trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    key: Vec<u8>,
    proof: CryptoProof,
}

impl Proof {
    pub fn new(key: Vec<u8>, proof: CryptoProof) -> Self {
        Proof {
            key,
            proof,
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn crypto_proof(&self) -> &CryptoProof {
        &self.proof
    }
}

impl Encodable for Proof {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2).append(&self.key).append(&self.proof);
    }
}

impl Decodable for Proof {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen)
        }
        Ok(Proof {
            key: rlp.val_at(0)?,
            proof: rlp.val_at(1)?,
        })
    }
}

impl types::Proof for Proof {
    type Root = Root;

    fn commitment_kind(&self) -> &'static str {
        MERKLE_KIND
    }

    fn get_key(&self) -> &[u8] {
        &self.key
    }

    fn verify(&self, root: &Root, path: &[u8], value: &[u8]) -> bool {
        self.key == path && cmerkle::verify(root.hash(), path, value, &self.proof)
    }

    fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

fn join(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    [prefix, key].concat()
}
