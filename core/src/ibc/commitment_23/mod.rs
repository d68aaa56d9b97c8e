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

pub mod merkle;
mod types;

pub use self::types::{Prefix, Proof, Root};

/// Check that `proof` shows the store committed to `root` holds `value` at `path`.
pub fn verify<P: Proof>(root: &P::Root, path: &[u8], value: &[u8], proof: &P) -> bool {
    proof.verify(root, path, value)
}

/// Same as `verify` for a proof in its encoded form. Undecodable proofs do not verify.
pub fn verify_encoded(root: &merkle::Root, path: &[u8], value: &[u8], proof: &[u8]) -> bool {
    match rlp::decode::<merkle::Proof>(proof) {
        Ok(proof) => verify(root, path, value, &proof),
        Err(_) => false,
    }
}
