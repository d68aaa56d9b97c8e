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

pub mod codechain;
mod manager;
mod query;
mod types;

pub use self::manager::Manager;
pub use self::query::{query_client_state, query_commitment_root, query_consensus_state, Commitment};
pub use self::types::{ClientState, ConsensusState, Header, Kind, State, KIND_CODECHAIN};

use super::Error;

pub fn new_state(id: &str, kind: Kind) -> Result<Box<dyn State>, Error> {
    if kind == KIND_CODECHAIN {
        Ok(Box::new(codechain::State::new(id)))
    } else {
        Err(Error::InvalidClientKind(kind))
    }
}

/// Blank and whitespace-only identifiers are rejected.
pub fn validate_identifier(id: &str) -> Result<(), Error> {
    if id.trim().is_empty() {
        return Err(Error::InvalidIdentifier(id.to_string()))
    }
    Ok(())
}

pub fn path(id: &str) -> String {
    format!("clients/{}", id)
}

pub fn type_path(id: &str) -> String {
    format!("{}/type", path(id))
}

pub fn client_state_path(id: &str) -> String {
    format!("{}/clientState", path(id))
}

pub fn consensus_state_path(id: &str, height: u64) -> String {
    format!("{}/consensusStates/{}", path(id), height)
}

pub fn consensus_heights_path(id: &str) -> String {
    format!("{}/consensusHeights", path(id))
}

pub fn root_path(id: &str, height: u64) -> String {
    format!("{}/roots/{}", path(id), height)
}

pub fn pruned_below_path(id: &str) -> String {
    format!("{}/prunedBelow", path(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(type_path("a"), "clients/a/type");
        assert_eq!(client_state_path("a"), "clients/a/clientState");
        assert_eq!(consensus_state_path("a", 7), "clients/a/consensusStates/7");
        assert_eq!(consensus_heights_path("a"), "clients/a/consensusHeights");
        assert_eq!(root_path("a", 100), "clients/a/roots/100");
        assert_eq!(pruned_below_path("a"), "clients/a/prunedBelow");
    }

    #[test]
    fn blank_identifiers() {
        for id in &["", " ", "\t", " \n "] {
            match validate_identifier(id) {
                Err(Error::InvalidIdentifier(given)) => assert_eq!(&given, id),
                _ => panic!("{:?} must be rejected", id),
            }
        }
        assert!(validate_identifier("client-0").is_ok());
        assert!(validate_identifier(" padded ").is_ok());
    }

    #[test]
    fn unknown_kind() {
        match new_state("a", 3) {
            Err(Error::InvalidClientKind(3)) => {}
            _ => panic!("Kind 3 does not exist"),
        }
        assert_eq!(new_state("a", KIND_CODECHAIN).unwrap().kind(), KIND_CODECHAIN);
    }
}
