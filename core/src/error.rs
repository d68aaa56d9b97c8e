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
use std::io;

use cmerkle::TrieError;
use rlp::DecoderError;

use crate::types::{BlockId, BlockNumber};

#[derive(Debug)]
/// General error type of the local chain and its state store.
pub enum Error {
    /// Error concerning the trie.
    Trie(TrieError),
    /// Malformed RLP in the store.
    Rlp(DecoderError),
    /// Error of the backing key-value database.
    Database(io::Error),
    /// The snapshot of the height was pruned or has not been committed yet.
    HeightNotAvailable(BlockNumber),
    /// No block in the canonical chain matches the id.
    BlockNotFound(BlockId),
    /// A snapshot root was registered at a height that is not above the latest one.
    NonIncreasingHeight {
        latest: BlockNumber,
        given: BlockNumber,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Trie(err) => err.fmt(f),
            Error::Rlp(err) => err.fmt(f),
            Error::Database(err) => write!(f, "Database error: {}", err),
            Error::HeightNotAvailable(height) => write!(f, "State at height {} is not available", height),
            Error::BlockNotFound(id) => write!(f, "Block {:?} not found", id),
            Error::NonIncreasingHeight {
                latest,
                given,
            } => write!(f, "State root at height {} cannot follow height {}", given, latest),
        }
    }
}

impl std::error::Error for Error {}

impl From<TrieError> for Error {
    fn from(err: TrieError) -> Error {
        Error::Trie(err)
    }
}

impl From<DecoderError> for Error {
    fn from(err: DecoderError) -> Error {
        Error::Rlp(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Database(err)
    }
}

impl<E> From<Box<E>> for Error
where
    Error: From<E>,
{
    fn from(err: Box<E>) -> Error {
        Error::from(*err)
    }
}
