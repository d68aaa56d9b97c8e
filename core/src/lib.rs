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

extern crate codechain_crypto as ccrypto;
#[macro_use]
extern crate codechain_logger as clogger;
extern crate codechain_merkle as cmerkle;
extern crate journaldb;
extern crate kvdb;
extern crate parking_lot;
extern crate primitives;
extern crate rlp;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate toml;

#[macro_use]
extern crate log;

#[cfg(test)]
extern crate hex;
#[cfg(test)]
extern crate kvdb_memorydb;
#[cfg(test)]
extern crate rand;
#[cfg(test)]
extern crate rand_xorshift;

mod client;
pub mod config;
mod db;
mod error;
mod header;
pub mod ibc;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use crate::client::{BlockChainClient, Client, ClientConfig, StateInfo};
pub use crate::db::{COL_STATE, NUM_COLUMNS};
pub use crate::error::Error;
pub use crate::header::Header;
pub use crate::state::{StateDB, TopLevelState};
pub use crate::types::{Address, BlockId, BlockNumber, Public, ValidatorSet};
