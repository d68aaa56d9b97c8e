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

use std::fmt;

use ccrypto::{blake256, BLAKE_NULL_RLP};
use primitives::H256;

use crate::hashdb::{DBValue, HashDB};
use crate::nibbleslice::NibbleSlice;
use crate::node::Node as RlpNode;
use crate::{TrieError, TrieMut};

fn empty_children() -> [Option<H256>; 16] {
    [None; 16]
}

pub struct TrieDBMut<'a> {
    db: &'a mut dyn HashDB,
    // When Trie is empty, root is BLAKE_NULL_RLP.
    root: &'a mut H256,
}

impl<'a> TrieDBMut<'a> {
    /// Create a new trie with backing database `db` and empty `root`.
    pub fn new(db: &'a mut dyn HashDB, root: &'a mut H256) -> Self {
        *root = BLAKE_NULL_RLP;

        TrieDBMut {
            db,
            root,
        }
    }

    /// Create a new trie with the backing database `db` and `root`.
    /// Returns an error if `root` does not exist.
    pub fn from_existing(db: &'a mut dyn HashDB, root: &'a mut H256) -> crate::Result<Self> {
        if !db.contains(root) {
            return Err(Box::new(TrieError::InvalidStateRoot(*root)))
        }

        Ok(TrieDBMut {
            db,
            root,
        })
    }

    fn node(&self, hash: H256) -> crate::Result<DBValue> {
        self.db.get(&hash).ok_or_else(|| Box::new(TrieError::IncompleteDatabase(hash)))
    }

    fn decode(hash: H256, node_rlp: &[u8]) -> crate::Result<Option<RlpNode>> {
        RlpNode::decoded(node_rlp).map_err(|err| Box::new(TrieError::DecoderError(hash, err)))
    }

    fn store(&mut self, node: RlpNode) -> H256 {
        let node_rlp = RlpNode::encoded(node);
        self.db.insert(&node_rlp)
    }

    /// Insert auxiliary
    fn insert_aux(
        &mut self,
        path: NibbleSlice,
        insert_value: &[u8],
        cur_node_hash: Option<H256>,
        old_val: &mut Option<DBValue>,
    ) -> crate::Result<H256> {
        let hash = match cur_node_hash {
            Some(hash) => hash,
            None => return Ok(self.store(RlpNode::Leaf(path, insert_value))),
        };
        let node_rlp = self.node(hash)?;

        match Self::decode(hash, &node_rlp)? {
            Some(RlpNode::Leaf(partial, value)) => {
                // Renew the Leaf
                if partial == path {
                    *old_val = Some(DBValue::from_slice(value));

                    Ok(self.store(RlpNode::Leaf(path, insert_value)))
                } else {
                    // Make branch node and insert Leaves
                    let common = partial.common_prefix(&path);
                    let mut new_child = empty_children();
                    let new_partial = partial.mid(common);
                    let new_path = path.mid(common);

                    new_child[new_partial.at(0) as usize] = Some(self.insert_aux(
                        new_partial.mid(1),
                        value,
                        new_child[new_partial.at(0) as usize],
                        old_val,
                    )?);
                    new_child[new_path.at(0) as usize] = Some(self.insert_aux(
                        new_path.mid(1),
                        insert_value,
                        new_child[new_path.at(0) as usize],
                        old_val,
                    )?);

                    let node_rlp = RlpNode::encoded_until(RlpNode::Branch(partial, Box::new(new_child)), common);
                    Ok(self.db.insert(&node_rlp))
                }
            }
            Some(RlpNode::Branch(partial, mut children)) => {
                let common = partial.common_prefix(&path);

                if common < partial.len() {
                    // Split the branch: the old branch and the new leaf hang off a shorter one
                    let mut new_child = empty_children();
                    let new_partial = partial.mid(common);
                    let new_path = path.mid(common);
                    let b_hash = self.store(RlpNode::Branch(new_partial.mid(1), children));

                    new_child[new_partial.at(0) as usize] = Some(b_hash);
                    new_child[new_path.at(0) as usize] = Some(self.insert_aux(
                        new_path.mid(1),
                        insert_value,
                        new_child[new_path.at(0) as usize],
                        old_val,
                    )?);

                    let node_rlp = RlpNode::encoded_until(RlpNode::Branch(partial, Box::new(new_child)), common);
                    Ok(self.db.insert(&node_rlp))
                } else {
                    // Insert leaf into the branch node
                    let new_path = path.mid(common);
                    let index = new_path.at(0) as usize;

                    children[index] = Some(self.insert_aux(new_path.mid(1), insert_value, children[index], old_val)?);

                    Ok(self.store(RlpNode::Branch(partial, children)))
                }
            }
            None => Ok(self.store(RlpNode::Leaf(path, insert_value))),
        }
    }

    /// Get auxiliary
    fn get_aux(&self, path: NibbleSlice, cur_node_hash: Option<H256>) -> crate::Result<Option<DBValue>> {
        let hash = match cur_node_hash {
            Some(hash) => hash,
            None => return Ok(None),
        };
        let node_rlp = self.node(hash)?;

        match Self::decode(hash, &node_rlp)? {
            Some(RlpNode::Leaf(partial, value)) => {
                if partial == path {
                    Ok(Some(DBValue::from_slice(value)))
                } else {
                    Ok(None)
                }
            }
            Some(RlpNode::Branch(partial, children)) => {
                if path.starts_with(&partial) {
                    self.get_aux(path.mid(partial.len() + 1), children[path.mid(partial.len()).at(0) as usize])
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Remove auxiliary
    fn remove_aux(
        &mut self,
        path: NibbleSlice,
        cur_node_hash: Option<H256>,
        old_val: &mut Option<DBValue>,
    ) -> crate::Result<Option<H256>> {
        let hash = match cur_node_hash {
            Some(hash) => hash,
            None => return Ok(None),
        };
        let node_rlp = self.node(hash)?;

        match Self::decode(hash, &node_rlp)? {
            Some(RlpNode::Leaf(partial, value)) => {
                if path == partial {
                    *old_val = Some(DBValue::from_slice(value));

                    Ok(None)
                } else {
                    Ok(cur_node_hash)
                }
            }
            Some(RlpNode::Branch(partial, mut children)) => {
                if !path.starts_with(&partial) {
                    return Ok(cur_node_hash)
                }

                let new_path = path.mid(partial.len());
                let index = new_path.at(0) as usize;
                children[index] = self.remove_aux(new_path.mid(1), children[index], old_val)?;

                if children[index].is_some() {
                    return Ok(Some(self.store(RlpNode::Branch(partial, children))))
                }

                let mut remaining = children.iter().enumerate().filter_map(|(i, child)| child.map(|hash| (i, hash)));
                match (remaining.next(), remaining.next()) {
                    // Branch can be removed
                    (None, _) => Ok(None),
                    // Merge the branch into its only child
                    (Some((only_index, only_hash)), None) => {
                        let child_rlp = self.node(only_hash)?;
                        let mut nibbles = partial.to_vec();
                        nibbles.push(only_index as u8);

                        match Self::decode(only_hash, &child_rlp)? {
                            None => Err(Box::new(TrieError::IncompleteDatabase(only_hash))),
                            Some(RlpNode::Leaf(child_partial, child_value)) => {
                                nibbles.extend(child_partial.to_vec());

                                let (new_partial, offset) = NibbleSlice::from_vec(&nibbles);
                                let new_leaf = RlpNode::Leaf(NibbleSlice::new_offset(&new_partial, offset), child_value);
                                Ok(Some(self.store(new_leaf)))
                            }
                            Some(RlpNode::Branch(child_partial, grand_children)) => {
                                nibbles.extend(child_partial.to_vec());

                                let (new_partial, offset) = NibbleSlice::from_vec(&nibbles);
                                let new_branch =
                                    RlpNode::Branch(NibbleSlice::new_offset(&new_partial, offset), grand_children);
                                Ok(Some(self.store(new_branch)))
                            }
                        }
                    }
                    _ => Ok(Some(self.store(RlpNode::Branch(partial, children)))),
                }
            }
            None => Ok(cur_node_hash),
        }
    }
}

impl<'a> fmt::Display for RlpNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RlpNode::Leaf(partial, value) => writeln!(f, "Leaf - key({:?}), value({:?})", partial, value),
            RlpNode::Branch(partial, children) => {
                writeln!(f, "Branch - path({:?})", partial)?;

                for (i, child) in children.iter().enumerate() {
                    writeln!(f, "child {} - hash({:?})", i, child)?;
                }
                Ok(())
            }
        }
    }
}

impl<'a> TrieMut for TrieDBMut<'a> {
    fn root(&self) -> &H256 {
        self.root
    }

    fn is_empty(&self) -> bool {
        *self.root == BLAKE_NULL_RLP
    }

    fn get(&self, key: &[u8]) -> crate::Result<Option<DBValue>> {
        let path = blake256(key);
        let cur_hash = *self.root;

        self.get_aux(NibbleSlice::new(path.as_bytes()), Some(cur_hash))
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> crate::Result<Option<DBValue>> {
        if value.is_empty() {
            return self.remove(key)
        }

        let path = blake256(key);
        let mut old_val = None;
        let cur_hash = *self.root;
        *self.root = self.insert_aux(NibbleSlice::new(path.as_bytes()), value, Some(cur_hash), &mut old_val)?;

        Ok(old_val)
    }

    fn remove(&mut self, key: &[u8]) -> crate::Result<Option<DBValue>> {
        let path = blake256(key);
        let mut old_val = None;
        let cur_hash = *self.root;

        *self.root = match self.remove_aux(NibbleSlice::new(path.as_bytes()), Some(cur_hash), &mut old_val)? {
            Some(hash) => hash,
            None => BLAKE_NULL_RLP,
        };

        Ok(old_val)
    }
}
