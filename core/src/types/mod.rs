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

mod ids;

use primitives::{H160, H512};

pub use self::ids::BlockId;

/// Type for block number.
pub type BlockNumber = u64;

/// Block author.
pub type Address = H160;

/// Uncompressed 64-byte validator key.
pub type Public = H512;

pub type ValidatorSet = Vec<Public>;
