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

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use primitives::H256;

type Blake2b256 = Blake2b<U32>;

/// BLAKE256
pub fn blake256<T: AsRef<[u8]>>(s: T) -> H256 {
    let mut hasher = Blake2b256::new();
    hasher.update(s.as_ref());
    H256::from_slice(&hasher.finalize())
}

/// Get the 256-bits BLAKE2b hash of the RLP encoding of empty data.
pub const BLAKE_NULL_RLP: H256 = H256([
    0x45, 0xb0, 0xcf, 0xc2, 0x20, 0xce, 0xec, 0x5b, 0x7c, 0x1c, 0x62, 0xc4, 0xd4, 0x19, 0x3d, 0x38, 0xe4, 0xeb, 0xa4,
    0x8e, 0x88, 0x15, 0x72, 0x9c, 0xe7, 0x5f, 0x9c, 0x0a, 0xb0, 0xe4, 0xc1, 0xc0,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake_empty() {
        let expected = H256([
            0x0e, 0x57, 0x51, 0xc0, 0x26, 0xe5, 0x43, 0xb2, 0xe8, 0xab, 0x2e, 0xb0, 0x60, 0x99, 0xda, 0xa1, 0xd1, 0xe5,
            0xdf, 0x47, 0x77, 0x8f, 0x77, 0x87, 0xfa, 0xab, 0x45, 0xcd, 0xf1, 0x2f, 0xe3, 0xa8,
        ]);
        assert_eq!(blake256([0u8; 0]), expected);
    }

    #[test]
    fn blake_null_rlp() {
        assert_eq!(blake256(rlp::NULL_RLP), BLAKE_NULL_RLP);
    }
}
