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

//! `JournalDB` interface and implementation.

#[macro_use]
extern crate log;

extern crate codechain_merkle as cmerkle;
extern crate kvdb;
extern crate primitives;

#[cfg(test)]
extern crate codechain_crypto as ccrypto;
#[cfg(test)]
extern crate kvdb_memorydb;

use std::sync::Arc;

mod archivedb;
mod traits;

pub use self::archivedb::ArchiveDB;
pub use self::traits::JournalDB;

/// How committed nodes are kept in the backing database.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Algorithm {
    /// Keep all keys forever.
    Archive,
}

/// Create a new `JournalDB` trait object over a generic key-value database.
pub fn new(backing: Arc<dyn kvdb::KeyValueDB>, algorithm: Algorithm, col: u32) -> Box<dyn JournalDB> {
    match algorithm {
        Algorithm::Archive => Box::new(archivedb::ArchiveDB::new(backing, col)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{new, Algorithm};

    #[test]
    fn archive_keeps_committed_nodes() {
        let backing: Arc<dyn kvdb::KeyValueDB> = Arc::new(kvdb_memorydb::create(1));
        let mut jdb = new(Arc::clone(&backing), Algorithm::Archive, 0);
        let key = jdb.as_hashdb_mut().insert(b"node");
        jdb.commit().unwrap();

        let reopened = new(backing, Algorithm::Archive, 0);
        assert!(reopened.as_hashdb().contains(&key));
    }
}
