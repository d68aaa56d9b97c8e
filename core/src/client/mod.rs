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

mod client;
mod config;

pub use self::client::Client;
pub use self::config::ClientConfig;

use crate::error::Error;
use crate::header::Header;
use crate::state::TopLevelState;
use crate::types::{BlockId, BlockNumber};

/// Read access to the canonical chain.
pub trait BlockChainClient: Sync + Send {
    /// Get the header of a block by block id.
    fn block_header(&self, id: &BlockId) -> Option<Header>;

    /// Get the best block header.
    fn best_block_header(&self) -> Header;

    /// Get the number of a block by block id. Fails for blocks that are not in the chain yet.
    fn block_number(&self, id: &BlockId) -> Option<BlockNumber>;
}

/// Provides the world state at a block.
pub trait StateInfo {
    /// Attempt to get a copy of a specific block's final state.
    fn state_at(&self, id: BlockId) -> Result<TopLevelState, Error>;

    /// The state of the best block with its number, resolved at once.
    fn latest_state(&self) -> Result<(BlockNumber, TopLevelState), Error>;
}
