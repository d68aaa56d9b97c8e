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

/// The name of the store every IBC path lives in.
pub const DEFAULT_COMMITMENT_PREFIX: &[u8] = b"ibc";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prepended to every path before it reaches the state trie.
    pub commitment_prefix: Vec<u8>,
    /// Number of heights a consensus state is kept behind the latest one. `None` keeps all of them.
    pub consensus_state_retention: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            commitment_prefix: DEFAULT_COMMITMENT_PREFIX.to_vec(),
            consensus_state_retention: None,
        }
    }
}
