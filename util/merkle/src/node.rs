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

use primitives::H256;
use rlp::{DecoderError, Prototype, Rlp, RlpStream};

use crate::nibbleslice::NibbleSlice;

/// A decoded trie node. The path of a value is `blake256(key)`, so every leaf
/// sits at the same depth and a branch never carries a value of its own.
#[derive(Eq, PartialEq, Debug)]
pub enum Node<'a> {
    Leaf(NibbleSlice<'a>, &'a [u8]),

    Branch(NibbleSlice<'a>, Box<[Option<H256>; 16]>),
}

impl<'a> Node<'a> {
    /// Decode the `node_rlp` and return the Node.
    /// `Ok(None)` is the empty node.
    pub fn decoded(node_rlp: &'a [u8]) -> Result<Option<Self>, DecoderError> {
        let r = Rlp::new(node_rlp);
        match r.prototype()? {
            // Empty node
            Prototype::Data(0) => Ok(None),
            // leaf node - first is nibbles and second is value
            Prototype::List(2) => {
                let slice = decode_partial(r.at(0)?.data()?)?;

                Ok(Some(Node::Leaf(slice, r.at(1)?.data()?)))
            }
            // branch node - first is nibbles (or empty), the rest 16 are nodes.
            Prototype::List(17) => {
                let mut nodes = [None; 16];
                for (i, node) in nodes.iter_mut().enumerate() {
                    let child = r.at(i + 1)?;
                    *node = if child.is_empty() {
                        None
                    } else {
                        Some(child.as_val::<H256>()?)
                    };
                }

                Ok(Some(Node::Branch(decode_partial(r.at(0)?.data()?)?, Box::new(nodes))))
            }
            _ => Err(DecoderError::Custom("Invalid trie node")),
        }
    }

    /// Encode the node into RLP.
    pub fn encoded(node: Self) -> Vec<u8> {
        match node {
            Node::Leaf(slice, value) => encode_leaf(&slice.encoded(), value),
            Node::Branch(slice, nodes) => encode_branch(&slice.encoded(), &nodes[..]),
        }
    }

    /// Encode the node into RLP.
    /// Unlike `encoded()`, only the leftmost `size` nibbles of the path are written.
    pub fn encoded_until(node: Self, size: usize) -> Vec<u8> {
        match node {
            Node::Leaf(slice, value) => encode_leaf(&slice.encoded_leftmost(size), value),
            Node::Branch(slice, nodes) => encode_branch(&slice.encoded_leftmost(size), &nodes[..]),
        }
    }
}

fn decode_partial(data: &[u8]) -> Result<NibbleSlice, DecoderError> {
    if !NibbleSlice::is_valid_encoding(data) {
        return Err(DecoderError::Custom("Invalid partial path"))
    }
    Ok(NibbleSlice::from_encoded(data))
}

/// RLP of a leaf whose partial path is already hex-prefix encoded.
pub(crate) fn encode_leaf(encoded_partial: &[u8], value: &[u8]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(2);
    stream.append(&encoded_partial);
    stream.append(&value);
    stream.out().to_vec()
}

/// RLP of a branch whose partial path is already hex-prefix encoded.
pub(crate) fn encode_branch(encoded_partial: &[u8], children: &[Option<H256>]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(17);
    stream.append(&encoded_partial);
    for child in children {
        match child {
            Some(hash) => stream.append(hash),
            None => stream.append_empty_data(),
        };
    }
    stream.out().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_round_trip() {
        let path = [0x12u8, 0x34];
        let node = Node::Leaf(NibbleSlice::new(&path).mid(1), b"value");
        let encoded = Node::encoded(Node::Leaf(NibbleSlice::new(&path).mid(1), b"value"));
        assert_eq!(Node::decoded(&encoded), Ok(Some(node)));
    }

    #[test]
    fn branch_round_trip() {
        let path = [0xabu8];
        let mut children = [None; 16];
        children[3] = Some(H256::repeat_byte(3));
        children[15] = Some(H256::repeat_byte(15));
        let encoded = Node::encoded(Node::Branch(NibbleSlice::new(&path), Box::new(children)));
        match Node::decoded(&encoded) {
            Ok(Some(Node::Branch(partial, decoded_children))) => {
                assert_eq!(partial, NibbleSlice::new(&path));
                assert_eq!(*decoded_children, children);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn null_is_empty_node() {
        assert_eq!(Node::decoded(&rlp::NULL_RLP), Ok(None));
    }

    #[test]
    fn malformed_node_is_an_error() {
        let mut stream = RlpStream::new_list(3);
        stream.append(&1u8).append(&2u8).append(&3u8);
        assert!(Node::decoded(&stream.out()).is_err());
        assert!(Node::decoded(&[0xc2, 0x80, 0x80]).is_err());
    }
}
