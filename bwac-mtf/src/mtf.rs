// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain move-to-front recoding: every byte becomes its current rank in a
//! 256-entry permutation, then is promoted to the front.

use crate::permutation::Permutation;
use crate::streaming::StreamingMtf;

/// Size of the move-to-front alphabet: one symbol per byte value.
pub const ALPHABET: usize = 256;

/// Encode `input` as a sequence of ranks in `[0, 256)`.
pub fn forward(input: &[u8]) -> Vec<usize> {
    let mut mtf = StreamingMtf::new();
    input.iter().map(|&byte| mtf.encode(byte)).collect()
}

/// Recover the original bytes from a sequence of move-to-front ranks.
pub fn inverse(ranks: &[usize]) -> Vec<u8> {
    let mut mtf = StreamingMtf::new();
    ranks.iter().map(|&idx| mtf.decode(idx)).collect()
}
