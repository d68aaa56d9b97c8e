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

use std::fmt;

use cmerkle::TrieError;
use rlp::DecoderError;

use crate::error::Error as CoreError;
use crate::types::BlockNumber;

#[derive(Debug)]
pub enum Error {
    /// Blank or whitespace-only client identifier.
    InvalidIdentifier(String),
    /// A height token that is not a base-10 unsigned integer.
    InvalidHeight(String),
    ClientNotFound(String),
    ConsensusStateNotFound(String),
    /// The consensus state of the client at the height has been pruned.
    ConsensusStateExpired {
        id: String,
        height: u64,
    },
    RootNotFound {
        id: String,
        height: u64,
    },
    /// The local state at the block is pruned or not committed yet.
    HeightNotAvailable(BlockNumber),
    ProofGenerationFailed(String),
    ClientAlreadyExists(String),
    ClientFrozen(String),
    /// A different consensus state is already stored at the height.
    ConsensusStateAlreadyRecorded {
        id: String,
        height: u64,
    },
    InvalidClientKind(u8),
    Storage(CoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidIdentifier(id) => write!(f, "Invalid client identifier {:?}", id),
            Error::InvalidHeight(token) => write!(f, "Invalid height '{}'", token),
            Error::ClientNotFound(id) => write!(f, "Client {} not found", id),
            Error::ConsensusStateNotFound(id) => write!(f, "No consensus state recorded for client {}", id),
            Error::ConsensusStateExpired {
                id,
                height,
            } => write!(f, "Consensus state of client {} at height {} has been pruned", id, height),
            Error::RootNotFound {
                id,
                height,
            } => write!(f, "Commitment root of client {} at height {} not found", id, height),
            Error::HeightNotAvailable(height) => write!(f, "State at block #{} is not available", height),
            Error::ProofGenerationFailed(reason) => write!(f, "Failed to generate proof: {}", reason),
            Error::ClientAlreadyExists(id) => write!(f, "Client {} already exists", id),
            Error::ClientFrozen(id) => write!(f, "Client {} is frozen", id),
            Error::ConsensusStateAlreadyRecorded {
                id,
                height,
            } => write!(f, "Client {} already has a different consensus state at height {}", id, height),
            Error::InvalidClientKind(kind) => write!(f, "Invalid client kind {}", kind),
            Error::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Error {
        match err {
            CoreError::HeightNotAvailable(height) => Error::HeightNotAvailable(height),
            err => Error::Storage(err),
        }
    }
}

impl From<Box<TrieError>> for Error {
    fn from(err: Box<TrieError>) -> Error {
        Error::Storage(err.into())
    }
}

impl From<DecoderError> for Error {
    fn from(err: DecoderError) -> Error {
        Error::Storage(err.into())
    }
}
