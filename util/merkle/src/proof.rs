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

use ccrypto::blake256;
use primitives::H256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::nibbleslice::NibbleSlice;
use crate::node::{encode_branch, encode_leaf};

const LEAF_STEP: u8 = 0;
const BRANCH_STEP: u8 = 1;

/// One node on the way from a value to the root.
///
/// Partial paths are kept hex-prefix encoded, exactly as they appear in the node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProofStep {
    /// The leaf holding the value.
    Leaf {
        partial: Vec<u8>,
    },
    /// A branch on the path. `children[index]` is left empty; the verifier fills it
    /// with the hash folded so far.
    Branch {
        partial: Vec<u8>,
        index: u8,
        children: Vec<Option<H256>>,
    },
}

impl Encodable for ProofStep {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            ProofStep::Leaf {
                partial,
            } => {
                s.begin_list(2).append(&LEAF_STEP).append(partial);
            }
            ProofStep::Branch {
                partial,
                index,
                children,
            } => {
                s.begin_list(4).append(&BRANCH_STEP).append(partial).append(index);
                s.begin_list(children.len());
                for child in children {
                    match child {
                        Some(hash) => s.append(hash),
                        None => s.append_empty_data(),
                    };
                }
            }
        }
    }
}

impl Decodable for ProofStep {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        let tag: u8 = rlp.val_at(0)?;
        match (tag, rlp.item_count()?) {
            (LEAF_STEP, 2) => Ok(ProofStep::Leaf {
                partial: rlp.val_at(1)?,
            }),
            (BRANCH_STEP, 4) => {
                let list = rlp.at(3)?;
                if list.item_count()? != 16 {
                    return Err(DecoderError::RlpIncorrectListLen)
                }
                let children = list
                    .iter()
                    .map(|child| {
                        if child.is_empty() {
                            Ok(None)
                        } else {
                            child.as_val().map(Some)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ProofStep::Branch {
                    partial: rlp.val_at(1)?,
                    index: rlp.val_at(2)?,
                    children,
                })
            }
            (LEAF_STEP, _) | (BRANCH_STEP, _) => Err(DecoderError::RlpIncorrectListLen),
            _ => Err(DecoderError::Custom("Unknown proof step")),
        }
    }
}

/// Inclusion proof of a single key. Steps are ordered from the leaf up to the root.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CryptoProof {
    pub steps: Vec<ProofStep>,
}

impl Encodable for CryptoProof {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(self.steps.len());
        for step in &self.steps {
            s.append(step);
        }
    }
}

impl Decodable for CryptoProof {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Ok(CryptoProof {
            steps: rlp.as_list()?,
        })
    }
}

/// Check that `proof` shows `key` maps to `value` in the trie whose root is `root`.
///
/// Any malformed or mismatching proof yields `false`.
pub fn verify(root: &H256, key: &[u8], value: &[u8], proof: &CryptoProof) -> bool {
    let steps = &proof.steps;
    let (leaf_partial, branches) = match steps.split_first() {
        Some((
            ProofStep::Leaf {
                partial,
            },
            branches,
        )) => (partial, branches),
        _ => return false,
    };

    // The path walked from the root must be the hashed key.
    let mut path = Vec::with_capacity(64);
    for step in branches.iter().rev() {
        match step {
            ProofStep::Branch {
                partial,
                index,
                children,
            } => {
                if !NibbleSlice::is_valid_encoding(partial) || *index >= 16 || children.len() != 16 {
                    return false
                }
                if children[*index as usize].is_some() {
                    return false
                }
                path.extend(NibbleSlice::from_encoded(partial).to_vec());
                path.push(*index);
            }
            ProofStep::Leaf {
                ..
            } => return false,
        }
    }
    if !NibbleSlice::is_valid_encoding(leaf_partial) {
        return false
    }
    path.extend(NibbleSlice::from_encoded(leaf_partial).to_vec());

    let hashed_key = blake256(key);
    if path != NibbleSlice::new(hashed_key.as_bytes()).to_vec() {
        return false
    }

    let mut hash = blake256(encode_leaf(leaf_partial, value));
    for step in branches {
        if let ProofStep::Branch {
            partial,
            index,
            children,
        } = step
        {
            let mut children = children.clone();
            children[*index as usize] = Some(hash);
            hash = blake256(encode_branch(partial, &children));
        }
    }
    hash == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_round_trip() {
        let mut children = vec![None; 16];
        children[2] = Some(H256::repeat_byte(0xaa));
        let proof = CryptoProof {
            steps: vec![
                ProofStep::Leaf {
                    partial: vec![0x11, 0x23],
                },
                ProofStep::Branch {
                    partial: vec![0x00],
                    index: 4,
                    children,
                },
            ],
        };
        let encoded = rlp::encode(&proof);
        assert_eq!(rlp::decode::<CryptoProof>(&encoded), Ok(proof));
    }

    #[test]
    fn rejects_unknown_step() {
        let mut s = RlpStream::new_list(1);
        s.begin_list(2).append(&7u8).append(&vec![0u8]);
        assert!(rlp::decode::<CryptoProof>(&s.out()).is_err());
    }

    #[test]
    fn rejects_short_children() {
        let mut s = RlpStream::new_list(4);
        s.append(&BRANCH_STEP).append(&vec![0u8]).append(&0u8);
        s.begin_list(1).append_empty_data();
        assert!(rlp::decode::<ProofStep>(&s.out()).is_err());
    }

    #[test]
    fn empty_proof_does_not_verify() {
        assert!(!verify(&H256::zero(), b"key", b"value", &CryptoProof::default()));
    }

    #[test]
    fn single_leaf_trie() {
        let key = b"key";
        let path = blake256(key);
        let partial = NibbleSlice::new(path.as_bytes()).encoded().to_vec();
        let root = blake256(encode_leaf(&partial, b"value"));
        let proof = CryptoProof {
            steps: vec![ProofStep::Leaf {
                partial,
            }],
        };

        assert!(verify(&root, key, b"value", &proof));
        assert!(!verify(&root, key, b"other", &proof));
        assert!(!verify(&root, b"another key", b"value", &proof));
    }
}
