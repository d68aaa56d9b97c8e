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

use super::commitment_23::merkle::{Prefix, Proof};
use super::kv_store::KVStore;
use super::Error;
use crate::state::TopLevelState;

pub trait Context {
    fn get_kv_store(&self) -> &dyn KVStore;
    fn get_kv_store_mut(&mut self) -> &mut dyn KVStore;
}

pub struct TopLevelContext<'a> {
    kv_store: TopLevelKVStore<'a>,
}

impl<'a> TopLevelContext<'a> {
    pub fn new(state: &'a mut TopLevelState, prefix: Prefix) -> Self {
        TopLevelContext {
            kv_store: TopLevelKVStore {
                state,
                prefix,
            },
        }
    }
}

impl<'a> Context for TopLevelContext<'a> {
    fn get_kv_store(&self) -> &dyn KVStore {
        &self.kv_store
    }

    fn get_kv_store_mut(&mut self) -> &mut dyn KVStore {
        &mut self.kv_store
    }
}

/// Stores every path under `prefix` in the state trie.
struct TopLevelKVStore<'a> {
    state: &'a mut TopLevelState,
    prefix: Prefix,
}

impl<'a> KVStore for TopLevelKVStore<'a> {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.state.get(&self.prefix.key(path))?)
    }

    fn has(&self, path: &str) -> Result<bool, Error> {
        Ok(self.state.contains(&self.prefix.key(path))?)
    }

    fn set(&mut self, path: &str, value: &[u8]) -> Result<(), Error> {
        Ok(self.state.set(&self.prefix.key(path), value)?)
    }

    fn remove(&mut self, path: &str) -> Result<(), Error> {
        Ok(self.state.remove(&self.prefix.key(path))?)
    }

    fn prove(&self, path: &str) -> Result<Option<(Vec<u8>, Proof)>, Error> {
        let key = self.prefix.key(path);
        let found = self.state.get_with_proof(&key)?;
        if let Some((_, proof)) = &found {
            ctrace!(TRIE, "Proof of {} has {} steps", path, proof.steps.len());
        }
        Ok(found.map(|(value, proof)| (value, Proof::new(key, proof))))
    }
}
