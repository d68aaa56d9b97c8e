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

use crate::types::Address;

/// Client configuration.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ClientConfig {
    /// Number of recent state snapshots kept after every block. `None` keeps all of them.
    pub state_history: Option<u64>,
    /// Author of the blocks produced by this client.
    pub author: Address,
}
