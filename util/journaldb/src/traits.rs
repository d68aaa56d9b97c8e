// Copyright 2015-2017 Parity Technologies (UK) Ltd.
// This file is part of Parity.

// Parity is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity.  If not, see <http://www.gnu.org/licenses/>.

//! The `JournalDB` trait.

use std::io;
use std::sync::Arc;

use cmerkle::HashDB;
use kvdb::{DBTransaction, KeyValueDB};

/// A `HashDB` whose pending nodes are written to a key-value database on commit.
pub trait JournalDB: HashDB {
    /// Return a copy of ourself, in a box.
    fn boxed_clone(&self) -> Box<dyn JournalDB>;

    /// Inject all changes in a single batch. Returns the number of nodes written.
    fn inject(&mut self, batch: &mut DBTransaction) -> io::Result<u32>;

    /// Get backing database.
    fn backing(&self) -> &Arc<dyn KeyValueDB>;

    /// View as `HashDB`.
    fn as_hashdb(&self) -> &dyn HashDB;

    /// View as mutable `HashDB`.
    fn as_hashdb_mut(&mut self) -> &mut dyn HashDB;

    /// Commit all changes in a single batch.
    fn commit(&mut self) -> io::Result<u32> {
        let mut batch = self.backing().transaction();
        let inserted = self.inject(&mut batch)?;
        self.backing().write(batch)?;
        Ok(inserted)
    }
}
