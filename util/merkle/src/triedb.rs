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

use crate::hashdb::{DBValue, HashDB};
use crate::nibbleslice::NibbleSlice;
use crate::node::Node as RlpNode;
use crate::proof::{CryptoProof, ProofStep};
use crate::{Query, Trie, TrieError};

/// A `Trie` implementation using a generic `HashDB` backing database.
///
/// Use it as a `Trie` trait object. You can use `db()` to get the backing database object.
/// Use `get` and `contains` to query values associated with keys in the trie.
///
/// # Example
/// ```
/// use codechain_merkle::*;
/// use primitives::H256;
///
/// let mut memdb = MemoryDB::new();
/// let mut root = H256::zero();
/// TrieDBMut::new(&mut memdb, &mut root).insert(b"foo", b"bar").unwrap();
/// let t = TrieDB::new(&memdb, &root).unwrap();
/// assert!(t.contains(b"foo").unwrap());
/// assert_eq!(t.get(b"foo").unwrap().unwrap(), DBValue::from_slice(b"bar"));
/// ```
pub struct TrieDB<'db> {
    db: &'db dyn HashDB,
    root: &'db H256,
}

impl<'db> TrieDB<'db> {
    /// Create a new trie with the backing database `db` and `root`
    /// Returns an error if `root` does not exist
    pub fn new(db: &'db dyn HashDB, root: &'db H256) -> crate::Result<Self> {
        if !db.contains(root) {
            Err(Box::new(TrieError::InvalidStateRoot(*root)))
        } else {
            Ok(TrieDB {
                db,
                root,
            })
        }
    }

    /// Get the backing database.
    pub fn db(&self) -> &dyn HashDB {
        self.db
    }

    fn node(&self, hash: H256) -> crate::Result<DBValue> {
        self.db.get(&hash).ok_or_else(|| Box::new(TrieError::IncompleteDatabase(hash)))
    }

    /// Get auxiliary
    fn get_aux<Q: Query>(
        &self,
        path: NibbleSlice,
        cur_node_hash: Option<H256>,
        query: Q,
    ) -> crate::Result<Option<Q::Item>> {
        let hash = match cur_node_hash {
            Some(hash) => hash,
            None => return Ok(None),
        };
        let node_rlp = self.node(hash)?;

        match RlpNode::decoded(&node_rlp).map_err(|err| Box::new(TrieError::DecoderError(hash, err)))? {
            Some(RlpNode::Leaf(partial, value)) => {
                if partial == path {
                    Ok(Some(query.decode(value)))
                } else {
                    Ok(None)
                }
            }
            Some(RlpNode::Branch(partial, children)) => {
                if path.starts_with(&partial) {
                    self.get_aux(
                        path.mid(partial.len() + 1),
                        children[path.mid(partial.len()).at(0) as usize],
                        query,
                    )
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Walks like `get_aux`, pushing the visited nodes once the value is found.
    /// The leaf is pushed first since steps are appended while unwinding.
    fn prove_aux(
        &self,
        path: NibbleSlice,
        cur_node_hash: Option<H256>,
        steps: &mut Vec<ProofStep>,
    ) -> crate::Result<Option<DBValue>> {
        let hash = match cur_node_hash {
            Some(hash) => hash,
            None => return Ok(None),
        };
        let node_rlp = self.node(hash)?;

        match RlpNode::decoded(&node_rlp).map_err(|err| Box::new(TrieError::DecoderError(hash, err)))? {
            Some(RlpNode::Leaf(partial, value)) => {
                if partial != path {
                    return Ok(None)
                }
                steps.push(ProofStep::Leaf {
                    partial: partial.encoded().to_vec(),
                });
                Ok(Some(DBValue::from_slice(value)))
            }
            Some(RlpNode::Branch(partial, children)) => {
                if !path.starts_with(&partial) {
                    return Ok(None)
                }
                let index = path.mid(partial.len()).at(0);
                let value = self.prove_aux(path.mid(partial.len() + 1), children[index as usize], steps)?;
                if value.is_some() {
                    let mut siblings = children.to_vec();
                    siblings[index as usize] = None;
                    steps.push(ProofStep::Branch {
                        partial: partial.encoded().to_vec(),
                        index,
                        children: siblings,
                    });
                }
                Ok(value)
            }
            None => Ok(None),
        }
    }
}

impl<'db> Trie for TrieDB<'db> {
    fn root(&self) -> &H256 {
        self.root
    }

    fn get_with<Q: Query>(&self, key: &[u8], query: Q) -> crate::Result<Option<Q::Item>> {
        let path = blake256(key);
        let root = *self.root;

        self.get_aux(NibbleSlice::new(path.as_bytes()), Some(root), query)
    }

    fn get_with_proof(&self, key: &[u8]) -> crate::Result<Option<(DBValue, CryptoProof)>> {
        let path = blake256(key);
        let root = *self.root;
        let mut steps = Vec::new();

        let value = self.prove_aux(NibbleSlice::new(path.as_bytes()), Some(root), &mut steps)?;
        Ok(value.map(|value| {
            (value, CryptoProof {
                steps,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::proof::verify;
    use crate::*;

    #[test]
    fn get() {
        let mut memdb = MemoryDB::new();
        let mut root = H256::zero();
        {
            let mut t = TrieDBMut::new(&mut memdb, &mut root);
            t.insert(b"A", b"ABC").unwrap();
            t.insert(b"B", b"ABCBA").unwrap();
        }

        let t = TrieDB::new(&memdb, &root).unwrap();
        assert_eq!(t.get(b"A"), Ok(Some(DBValue::from_slice(b"ABC"))));
        assert_eq!(t.get(b"B"), Ok(Some(DBValue::from_slice(b"ABCBA"))));
        assert_eq!(t.get(b"C"), Ok(None));
    }

    #[test]
    fn unknown_root() {
        let memdb = MemoryDB::new();
        let root = H256::repeat_byte(1);
        assert_eq!(TrieDB::new(&memdb, &root).err(), Some(Box::new(TrieError::InvalidStateRoot(root))));
    }

    #[test]
    fn empty_trie_has_no_proof() {
        let memdb = MemoryDB::new();
        let root = ccrypto::BLAKE_NULL_RLP;
        let t = TrieDB::new(&memdb, &root).unwrap();
        assert_eq!(t.get_with_proof(b"A"), Ok(None));
    }

    fn random_entries(count: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut rng = XorShiftRng::from_seed([7u8; 16]);
        (0..count)
            .map(|i| {
                let mut key = format!("key-{}-", i).into_bytes();
                key.extend((0..rng.gen_range(0, 40)).map(|_| rng.gen::<u8>()));
                let mut value = format!("value-{}", i).into_bytes();
                value.extend((0..rng.gen_range(0, 80)).map(|_| rng.gen::<u8>()));
                (key, value)
            })
            .collect()
    }

    #[test]
    fn every_proof_verifies() {
        let entries = random_entries(200);
        let mut memdb = MemoryDB::new();
        let mut root = H256::zero();
        {
            let mut t = TrieDBMut::new(&mut memdb, &mut root);
            for (key, value) in &entries {
                t.insert(key, value).unwrap();
            }
        }

        let t = TrieDB::new(&memdb, &root).unwrap();
        for (key, value) in &entries {
            let (found, proof) = t.get_with_proof(key).unwrap().unwrap();
            assert_eq!(&*found, &value[..]);
            assert!(verify(&root, key, value, &proof));
            assert!(!verify(&root, key, b"forged", &proof));
            assert!(!verify(&H256::repeat_byte(9), key, value, &proof));
        }
        assert_eq!(t.get_with_proof(b"not inserted"), Ok(None));
    }

    #[test]
    fn proof_is_deterministic() {
        let entries = random_entries(50);
        let mut memdb = MemoryDB::new();
        let mut root = H256::zero();
        {
            let mut t = TrieDBMut::new(&mut memdb, &mut root);
            for (key, value) in &entries {
                t.insert(key, value).unwrap();
            }
        }

        let t = TrieDB::new(&memdb, &root).unwrap();
        let (key, _) = &entries[17];
        let first = rlp::encode(&t.get_with_proof(key).unwrap().unwrap().1);
        let second = rlp::encode(&t.get_with_proof(key).unwrap().unwrap().1);
        assert_eq!(first, second);
    }

    #[test]
    fn tampered_proof_fails() {
        let entries = random_entries(64);
        let mut memdb = MemoryDB::new();
        let mut root = H256::zero();
        {
            let mut t = TrieDBMut::new(&mut memdb, &mut root);
            for (key, value) in &entries {
                t.insert(key, value).unwrap();
            }
        }

        let t = TrieDB::new(&memdb, &root).unwrap();
        let (key, value) = &entries[3];
        let (_, proof) = t.get_with_proof(key).unwrap().unwrap();
        assert!(proof.steps.len() > 1);

        let mut swapped_sibling = proof.clone();
        if let Some(ProofStep::Branch {
            children,
            index,
            ..
        }) = swapped_sibling.steps.last_mut()
        {
            let sibling = (0..16).find(|i| *i != *index as usize && children[*i].is_some()).unwrap();
            children[sibling] = Some(H256::repeat_byte(0x42));
        }
        assert!(!verify(&root, key, value, &swapped_sibling));

        let mut wrong_index = proof.clone();
        if let Some(ProofStep::Branch {
            index,
            ..
        }) = wrong_index.steps.last_mut()
        {
            *index = 16;
        }
        assert!(!verify(&root, key, value, &wrong_index));

        let mut truncated = proof.clone();
        truncated.steps.pop();
        assert!(!verify(&root, key, value, &truncated));

        let mut reordered = proof;
        reordered.steps.reverse();
        assert!(!verify(&root, key, value, &reordered));
    }
}
