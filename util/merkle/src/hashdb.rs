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

use elastic_array::ElasticArray128;
use primitives::H256;

/// `HashDB` value type.
pub type DBValue = ElasticArray128<u8>;

/// Trait modelling datastore keyed by a 32-byte BLAKE2b hash.
pub trait HashDB: Send + Sync {
    /// Look up a given hash into the bytes that hash to it, returning None if the
    /// hash is not known.
    fn get(&self, key: &H256) -> Option<DBValue>;

    /// Check for the existance of a hash-key.
    fn contains(&self, key: &H256) -> bool;

    /// Insert a datum item into the DB and return the datum's hash for a later lookup. Insertions
    /// are counted and the equivalent number of `remove()`s must be performed before the data
    /// is considered dead.
    fn insert(&mut self, value: &[u8]) -> H256;

    /// Like `insert()`, except you provide the key and the data is all moved.
    fn emplace(&mut self, key: H256, value: DBValue);

    /// Remove a datum previously inserted. Insertions can be "owed" such that the same number of
    /// `insert()`s may happen without the data being eventually being inserted into the DB.
    /// It can be "owed" more than once.
    fn remove(&mut self, key: &H256);
}
