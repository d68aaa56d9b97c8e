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

use std::sync::Arc;

use super::client_02::codechain::{ConsensusState, Header};
use super::client_02::{self as client, Commitment};
use super::commitment_23::merkle::{Prefix, Proof};
use super::{Config, Context, Error, TopLevelContext};
use crate::client::{BlockChainClient, StateInfo};
use crate::types::{BlockId, BlockNumber};

/// The answer to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub value: Vec<u8>,
    /// The local block whose state answered the query.
    /// A proof verifies against the state root of this block.
    pub height: BlockNumber,
    pub proof: Option<Proof>,
}

/// Store-backed queries read the state of `block_number`, or of the best block when it is `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    ClientState {
        id: String,
        block_number: Option<BlockNumber>,
        prove: bool,
    },
    ConsensusState {
        id: String,
        block_number: Option<BlockNumber>,
        prove: bool,
    },
    CommitmentRoot {
        id: String,
        height: String,
        block_number: Option<BlockNumber>,
        prove: bool,
    },
    LatestHeader,
    NodeConsensusState,
    CommitmentPrefix,
}

pub struct IBCQuerier<C> {
    client: Arc<C>,
    prefix: Prefix,
}

impl<C> IBCQuerier<C>
where
    C: BlockChainClient + StateInfo,
{
    pub fn new(client: Arc<C>, config: &Config) -> Self {
        IBCQuerier {
            client,
            prefix: Prefix::new(config.commitment_prefix.clone()),
        }
    }

    pub fn dispatch(&self, query: Query) -> Result<QueryResult, Error> {
        match query {
            Query::ClientState {
                id,
                block_number,
                prove,
            } => self.query_client_state(&id, block_number, prove),
            Query::ConsensusState {
                id,
                block_number,
                prove,
            } => self.query_consensus_state(&id, block_number, prove),
            Query::CommitmentRoot {
                id,
                height,
                block_number,
                prove,
            } => self.query_commitment_root(&id, &height, block_number, prove),
            Query::LatestHeader => {
                let header = self.query_latest_header();
                Ok(QueryResult {
                    value: client::Header::encode(&header),
                    height: header.raw().number(),
                    proof: None,
                })
            }
            Query::NodeConsensusState => {
                let header = self.client.best_block_header();
                let cs = ConsensusState::from_header(&header);
                Ok(QueryResult {
                    value: client::ConsensusState::encode(&cs),
                    height: header.number(),
                    proof: None,
                })
            }
            Query::CommitmentPrefix => Ok(QueryResult {
                value: self.commitment_prefix().to_vec(),
                height: self.client.best_block_header().number(),
                proof: None,
            }),
        }
    }

    pub fn query_client_state(
        &self,
        id: &str,
        block_number: Option<BlockNumber>,
        prove: bool,
    ) -> Result<QueryResult, Error> {
        client::validate_identifier(id)?;
        self.query_at(block_number, |ctx| client::query_client_state(ctx, id, prove))
    }

    pub fn query_consensus_state(
        &self,
        id: &str,
        block_number: Option<BlockNumber>,
        prove: bool,
    ) -> Result<QueryResult, Error> {
        client::validate_identifier(id)?;
        self.query_at(block_number, |ctx| client::query_consensus_state(ctx, id, prove))
    }

    /// `height` is the token given by the caller, a base-10 unsigned integer.
    pub fn query_commitment_root(
        &self,
        id: &str,
        height: &str,
        block_number: Option<BlockNumber>,
        prove: bool,
    ) -> Result<QueryResult, Error> {
        client::validate_identifier(id)?;
        let height = parse_height(height)?;
        self.query_at(block_number, |ctx| client::query_commitment_root(ctx, id, height, prove))
    }

    /// The best header of the local chain.
    pub fn query_latest_header(&self) -> Header {
        Header::new(self.client.best_block_header())
    }

    /// The consensus state of the local chain at its best block.
    pub fn query_node_consensus_state(&self) -> ConsensusState {
        ConsensusState::from_header(&self.client.best_block_header())
    }

    pub fn commitment_prefix(&self) -> &[u8] {
        self.prefix.as_bytes()
    }

    fn query_at<F>(&self, block_number: Option<BlockNumber>, f: F) -> Result<QueryResult, Error>
    where
        F: FnOnce(&dyn Context) -> Result<Commitment, Error>, {
        let (height, mut state) = match block_number {
            Some(height) => (height, self.client.state_at(BlockId::Number(height))?),
            None => self.client.latest_state()?,
        };
        let ctx = TopLevelContext::new(&mut state, self.prefix.clone());
        let Commitment {
            value,
            proof,
        } = f(&ctx)?;
        ctrace!(IBC, "Answered a query at #{} with {} bytes", height, value.len());
        Ok(QueryResult {
            value,
            height,
            proof,
        })
    }
}

/// Parse a height token. Only ASCII digits are accepted, so signs and whitespace are rejected.
pub fn parse_height(token: &str) -> Result<u64, Error> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidHeight(token.to_string()))
    }
    token.parse().map_err(|_| Error::InvalidHeight(token.to_string()))
}

#[cfg(test)]
mod tests {
    use std::thread;

    use primitives::H256;

    use super::*;
    use crate::client::Client;
    use crate::ibc::client_02::{client_state_path, consensus_state_path, root_path};
    use crate::ibc::commitment_23::{self as commitment, merkle::Root};
    use crate::ibc::DEFAULT_COMMITMENT_PREFIX;
    use crate::tests::helpers::{
        create_client, get_test_client, get_test_client_with_history, get_test_querier, record_consensus_state,
    };

    fn root_at(client: &Client, height: BlockNumber) -> Root {
        Root::new(*client.block_header(&BlockId::Number(height)).unwrap().state_root())
    }

    fn commitment_path(path: &str) -> Vec<u8> {
        [DEFAULT_COMMITMENT_PREFIX, path.as_bytes()].concat()
    }

    #[test]
    fn never_registered_client() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = get_test_querier(&client);
        for id in &["b", "client-0", "a/"] {
            match querier.query_client_state(id, None, true) {
                Err(Error::ClientNotFound(given)) => assert_eq!(&given, id),
                other => panic!("Unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        let client = get_test_client();
        let querier = get_test_querier(&client);
        for id in &["", " ", "\t\n"] {
            let queries = vec![
                Query::ClientState {
                    id: id.to_string(),
                    block_number: None,
                    prove: true,
                },
                Query::ConsensusState {
                    id: id.to_string(),
                    block_number: None,
                    prove: false,
                },
                Query::CommitmentRoot {
                    id: id.to_string(),
                    height: "abc".to_string(),
                    block_number: None,
                    prove: true,
                },
                // The block does not exist, so any store access would fail differently.
                Query::ClientState {
                    id: id.to_string(),
                    block_number: Some(1_000),
                    prove: false,
                },
            ];
            for query in queries {
                match querier.dispatch(query) {
                    Err(Error::InvalidIdentifier(_)) => {}
                    other => panic!("Unexpected {:?}", other),
                }
            }
        }
    }

    #[test]
    fn malformed_heights() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = get_test_querier(&client);
        for token in &["abc", "-1", "+5", "", " 5", "5 ", "1.0", "0x10", "18446744073709551616"] {
            match querier.query_commitment_root("a", token, None, true) {
                Err(err @ Error::InvalidHeight(_)) => {
                    let message = err.to_string();
                    assert!(message.contains(&format!("'{}'", token)), "{} does not contain {}", message, token);
                }
                other => panic!("Unexpected {:?} for {:?}", other, token),
            }
        }
        assert_eq!(parse_height("0").unwrap(), 0);
        assert_eq!(parse_height("007").unwrap(), 7);
        assert_eq!(parse_height("18446744073709551615").unwrap(), u64::max_value());
    }

    #[test]
    fn client_state_proof_round_trip() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = get_test_querier(&client);

        let result = querier.query_client_state("a", None, true).unwrap();
        assert_eq!(result.height, 1);
        let proof = result.proof.unwrap();
        let path = commitment_path(&client_state_path("a"));
        assert!(commitment::verify(&root_at(&client, result.height), &path, &result.value, &proof));
        assert!(commitment::verify_encoded(
            &root_at(&client, result.height),
            &path,
            &result.value,
            &commitment::Proof::encode(&proof)
        ));
        assert!(!commitment::verify(&root_at(&client, 0), &path, &result.value, &proof));
    }

    #[test]
    fn proofs_at_older_blocks() {
        let client = get_test_client();
        create_client(&client, "a", 10);
        record_consensus_state(&client, "a", 11);
        record_consensus_state(&client, "a", 12);
        let querier = get_test_querier(&client);

        let old = querier.query_consensus_state("a", Some(1), true).unwrap();
        let new = querier.query_consensus_state("a", None, true).unwrap();
        assert_eq!(old.height, 1);
        assert_eq!(new.height, 3);
        assert_ne!(old.value, new.value);
        assert!(commitment::verify(
            &root_at(&client, 1),
            &commitment_path(&consensus_state_path("a", 10)),
            &old.value,
            &old.proof.unwrap()
        ));
        assert!(commitment::verify(
            &root_at(&client, 3),
            &commitment_path(&consensus_state_path("a", 12)),
            &new.value,
            &new.proof.unwrap()
        ));

        match querier.query_client_state("a", Some(0), false) {
            Err(Error::ClientNotFound(_)) => {}
            other => panic!("Unexpected {:?}", other),
        }
    }

    #[test]
    fn consensus_state_is_idempotent() {
        let client = get_test_client();
        create_client(&client, "a", 4);
        let querier = get_test_querier(&client);
        let first = querier.query_consensus_state("a", None, true).unwrap();
        let second = querier.query_consensus_state("a", None, true).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            rlp::encode(first.proof.as_ref().unwrap()).to_vec(),
            rlp::encode(second.proof.as_ref().unwrap()).to_vec()
        );
    }

    #[test]
    fn commitment_root_exact_height() {
        let client = get_test_client();
        create_client(&client, "a", 100);
        let querier = get_test_querier(&client);

        let found = querier.query_commitment_root("a", "100", None, true).unwrap();
        let root: Root = rlp::decode(&found.value).unwrap();
        assert_eq!(root.hash(), &H256::repeat_byte(100));
        assert!(commitment::verify(
            &root_at(&client, found.height),
            &commitment_path(&root_path("a", 100)),
            &found.value,
            &found.proof.unwrap()
        ));

        for token in &["99", "101"] {
            match querier.query_commitment_root("a", token, None, true) {
                Err(Error::RootNotFound {
                    id,
                    ..
                }) => assert_eq!(id, "a"),
                other => panic!("Unexpected {:?}", other),
            }
        }
        match querier.query_commitment_root("b", "100", None, false) {
            Err(Error::ClientNotFound(_)) => {}
            other => panic!("Unexpected {:?}", other),
        }
    }

    #[test]
    fn pruned_heights_are_not_available() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        record_consensus_state(&client, "a", 2);
        let querier = get_test_querier(&client);
        assert!(querier.query_client_state("a", Some(1), true).is_ok());

        client.prune(2);
        for _ in 0..3 {
            match querier.query_client_state("a", Some(1), true) {
                Err(Error::HeightNotAvailable(1)) => {}
                other => panic!("Unexpected {:?}", other),
            }
        }
        match querier.query_client_state("a", Some(3), false) {
            Err(Error::HeightNotAvailable(3)) => {}
            other => panic!("Unexpected {:?}", other),
        }
        assert!(querier.query_client_state("a", None, true).is_ok());
    }

    #[test]
    fn value_without_proof() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = get_test_querier(&client);
        let with_proof = querier.query_client_state("a", None, true).unwrap();
        let without_proof = querier.query_client_state("a", None, false).unwrap();
        assert_eq!(without_proof.proof, None);
        assert_eq!(without_proof.height, with_proof.height);
        assert_eq!(without_proof.value, with_proof.value);
    }

    #[test]
    fn local_chain_queries() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = get_test_querier(&client);
        let best = client.best_block_header();

        let header = querier.query_latest_header();
        assert_eq!(header.raw(), &best);
        let cs = querier.query_node_consensus_state();
        assert_eq!(cs, ConsensusState::from_header(&best));
        assert_eq!(cs.root().hash(), best.state_root());

        let result = querier.dispatch(Query::LatestHeader).unwrap();
        assert_eq!(result.value, best.rlp_bytes());
        assert_eq!(result.height, best.number());
        assert_eq!(result.proof, None);

        let result = querier.dispatch(Query::NodeConsensusState).unwrap();
        assert_eq!(rlp::decode::<ConsensusState>(&result.value).unwrap(), cs);
    }

    #[test]
    fn commitment_prefix_is_constant() {
        let client = get_test_client();
        let querier = get_test_querier(&client);
        assert_eq!(querier.commitment_prefix(), b"ibc");
        create_client(&client, "a", 1);
        client.prune(1);
        assert_eq!(querier.commitment_prefix(), b"ibc");
        assert_eq!(querier.dispatch(Query::CommitmentPrefix).unwrap().value, b"ibc".to_vec());

        let custom = IBCQuerier::new(Arc::clone(&client), &Config {
            commitment_prefix: b"store".to_vec(),
            ..Default::default()
        });
        assert_eq!(custom.commitment_prefix(), b"store");
    }

    #[test]
    fn parallel_queries_while_recording() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = Arc::new(get_test_querier(&client));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let client = Arc::clone(&client);
                let querier = Arc::clone(&querier);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let result = querier.query_client_state("a", None, true).unwrap();
                        let root = root_at(&client, result.height);
                        let path = commitment_path(&client_state_path("a"));
                        assert!(commitment::verify(&root, &path, &result.value, &result.proof.unwrap()));
                    }
                })
            })
            .collect();
        for height in 2..12 {
            record_consensus_state(&client, "a", height);
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn pinned_queries_while_pruning() {
        let client = get_test_client();
        create_client(&client, "a", 1);
        let querier = Arc::new(get_test_querier(&client));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let querier = Arc::clone(&querier);
                thread::spawn(move || {
                    let mut results = Vec::new();
                    for _ in 0..30 {
                        for pinned in 1..5 {
                            results.push((pinned, querier.query_client_state("a", Some(pinned), true)));
                        }
                    }
                    results
                })
            })
            .collect();
        for height in 2..12 {
            record_consensus_state(&client, "a", height);
            client.prune(height - 1);
        }

        let path = commitment_path(&client_state_path("a"));
        for reader in readers {
            for (pinned, result) in reader.join().unwrap() {
                match result {
                    Ok(result) => {
                        assert_eq!(result.height, pinned);
                        let root = root_at(&client, pinned);
                        assert!(commitment::verify(&root, &path, &result.value, &result.proof.unwrap()));
                    }
                    Err(Error::HeightNotAvailable(height)) => assert_eq!(height, pinned),
                    Err(err) => panic!("Unexpected error {}", err),
                }
            }
        }
        for pinned in 1..5 {
            match querier.query_client_state("a", Some(pinned), true) {
                Err(Error::HeightNotAvailable(height)) => assert_eq!(height, pinned),
                other => panic!("Unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn latest_queries_survive_automatic_pruning() {
        let client = get_test_client_with_history(1);
        create_client(&client, "a", 1);
        let querier = Arc::new(get_test_querier(&client));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let querier = Arc::clone(&querier);
                thread::spawn(move || {
                    (0..40)
                        .map(|_| querier.query_consensus_state("a", None, true).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for height in 2..12 {
            record_consensus_state(&client, "a", height);
        }

        for reader in readers {
            for result in reader.join().unwrap() {
                let cs = rlp::decode::<ConsensusState>(&result.value).unwrap();
                let path = commitment_path(&consensus_state_path("a", client::ConsensusState::get_height(&cs)));
                let root = root_at(&client, result.height);
                assert!(commitment::verify(&root, &path, &result.value, &result.proof.unwrap()));
            }
        }
    }
}
