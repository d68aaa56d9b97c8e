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

use super::{client_state_path, consensus_state_path, root_path, type_path, validate_identifier, Manager};
use crate::ibc;
use crate::ibc::commitment_23::merkle::Proof;

/// A stored value and, when requested, the proof that the store holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Commitment {
    pub value: Vec<u8>,
    pub proof: Option<Proof>,
}

/// The client state of `id`.
pub fn query_client_state(ctx: &dyn ibc::Context, id: &str, prove: bool) -> Result<Commitment, ibc::Error> {
    validate_identifier(id)?;
    let path = client_state_path(id);
    let value = ctx.get_kv_store().get(&path)?.ok_or_else(|| ibc::Error::ClientNotFound(id.to_string()))?;
    attach_proof(ctx, &path, value, prove)
}

/// The consensus state recorded at the latest height of `id`.
pub fn query_consensus_state(ctx: &dyn ibc::Context, id: &str, prove: bool) -> Result<Commitment, ibc::Error> {
    validate_identifier(id)?;
    let state = Manager::new().query(ctx, id).map_err(|err| match err {
        ibc::Error::ClientNotFound(id) => ibc::Error::ConsensusStateNotFound(id),
        err => err,
    })?;
    let client_state =
        state.get_client_state(ctx)?.ok_or_else(|| ibc::Error::ConsensusStateNotFound(id.to_string()))?;

    let height = client_state.latest_height();
    let path = consensus_state_path(id, height);
    let value = ctx.get_kv_store().get(&path)?.ok_or_else(|| ibc::Error::ConsensusStateExpired {
        id: id.to_string(),
        height,
    })?;
    attach_proof(ctx, &path, value, prove)
}

/// The commitment root recorded for `id` at exactly `height`.
pub fn query_commitment_root(
    ctx: &dyn ibc::Context,
    id: &str,
    height: u64,
    prove: bool,
) -> Result<Commitment, ibc::Error> {
    validate_identifier(id)?;
    if !ctx.get_kv_store().has(&type_path(id))? {
        return Err(ibc::Error::ClientNotFound(id.to_string()))
    }
    let path = root_path(id, height);
    let value = ctx.get_kv_store().get(&path)?.ok_or_else(|| ibc::Error::RootNotFound {
        id: id.to_string(),
        height,
    })?;
    attach_proof(ctx, &path, value, prove)
}

fn attach_proof(ctx: &dyn ibc::Context, path: &str, value: Vec<u8>, prove: bool) -> Result<Commitment, ibc::Error> {
    if !prove {
        return Ok(Commitment {
            value,
            proof: None,
        })
    }
    let proven = ctx.get_kv_store().prove(path).map_err(|err| {
        cwarn!(IBC, "Cannot prove {}: {}", path, err);
        ibc::Error::ProofGenerationFailed(err.to_string())
    })?;
    match proven {
        Some((proven_value, proof)) if proven_value == value => Ok(Commitment {
            value,
            proof: Some(proof),
        }),
        _ => Err(ibc::Error::ProofGenerationFailed(format!("{} has no matching proof", path))),
    }
}
