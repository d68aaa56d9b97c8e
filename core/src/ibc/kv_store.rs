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

use super::commitment_23::merkle::Proof;
use super::Error;

/// Storage of the IBC paths.
pub trait KVStore {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>, Error>;
    fn has(&self, path: &str) -> Result<bool, Error>;
    fn set(&mut self, path: &str, value: &[u8]) -> Result<(), Error>;
    fn remove(&mut self, path: &str) -> Result<(), Error>;
    /// The value at `path` and the proof that the state holds it.
    fn prove(&self, path: &str) -> Result<Option<(Vec<u8>, Proof)>, Error>;
}
