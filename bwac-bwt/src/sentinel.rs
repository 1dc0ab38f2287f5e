// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The non-bijective BWT fallback: a classical full-rotation transform with
//! one explicit primary index per block, rather than a sentinel byte woven
//! into the alphabet.
//!
//! Rather than a single sentinel index, this module carries a small set of
//! sentinel positions transported out-of-band: it chunks the input into
//! fixed-size blocks (mirroring the bounded-memory stream plumbing used
//! elsewhere in this workspace) and transforms each block independently, one
//! primary index per block, all collected into the side-data vector.
//!
//! Within one block, every one of its `n` rotations (not distinct suffixes)
//! is sorted by cyclic lexicographic order with ties — which occur only for
//! periodic blocks — broken by the rotation's starting offset. That keeps
//! the sort a true total order on `n` labelled rotations even when several
//! of them are byte-for-byte identical, which in turn keeps the standard
//! `LF` backward mapping a single `n`-cycle (stepping the conceptual
//! "rotation start offset" back by exactly one on every application), so
//! walking it from the primary index for `n` steps recovers every
//! character regardless of how periodic the block is.

use std::cmp::Ordering;

/// Default block size for the non-bijective transform, matching
/// [`bwac_core::chunk::CHUNK_SIZE`] so both stages agree on a unit of
/// bounded-memory work without a direct dependency between the two crates.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

fn compare_rotations(block: &[u8], a: usize, b: usize) -> Ordering {
    let n = block.len();
    for k in 0..n {
        let ca = block[(a + k) % n];
        let cb = block[(b + k) % n];
        match ca.cmp(&cb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.cmp(&b)
}

/// Forward-transform a single block, returning its last column and the
/// primary index (the sorted-order rank of the rotation starting at offset
/// 0, i.e. the original block itself).
fn forward_block(block: &[u8]) -> (Vec<u8>, usize) {
    let n = block.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare_rotations(block, a, b));

    let last: Vec<u8> = order.iter().map(|&start| block[(start + n - 1) % n]).collect();
    let primary = order.iter().position(|&start| start == 0).expect("offset 0 is always a rotation");
    (last, primary)
}

fn lf_mapping(last: &[u8]) -> Vec<usize> {
    let mut counts = [0usize; 256];
    for &b in last {
        counts[b as usize] += 1;
    }
    let mut base = [0usize; 256];
    let mut running = 0;
    for (c, count) in counts.iter().enumerate() {
        base[c] = running;
        running += count;
    }
    let mut occurrence = [0usize; 256];
    let mut lf = vec![0usize; last.len()];
    for (i, &b) in last.iter().enumerate() {
        let b = b as usize;
        lf[i] = base[b] + occurrence[b];
        occurrence[b] += 1;
    }
    lf
}

fn inverse_block(last: &[u8], primary: usize) -> Vec<u8> {
    let n = last.len();
    if n == 0 {
        return Vec::new();
    }
    let lf = lf_mapping(last);
    let mut reversed = Vec::with_capacity(n);
    let mut row = primary;
    for _ in 0..n {
        reversed.push(last[row]);
        row = lf[row];
    }
    reversed.reverse();
    reversed
}

/// Forward the non-bijective transform over `input`, chunked into blocks of
/// at most `block_size` bytes. Returns the concatenated transformed bytes
/// (same total length as `input`) and one primary index per block.
pub fn forward(input: &[u8], block_size: usize) -> (Vec<u8>, Vec<usize>) {
    debug_assert!(block_size > 0, "block_size must be positive");
    let mut out = Vec::with_capacity(input.len());
    let mut sentinels = Vec::with_capacity(input.len().div_ceil(block_size.max(1)));
    for block in input.chunks(block_size) {
        let (last, primary) = forward_block(block);
        out.extend_from_slice(&last);
        sentinels.push(primary);
    }
    (out, sentinels)
}

/// Invert [`forward`]. `sentinels` must be the primary-index list `forward`
/// returned for the same `block_size`.
pub fn inverse(transformed: &[u8], sentinels: &[usize], block_size: usize) -> Vec<u8> {
    debug_assert!(block_size > 0, "block_size must be positive");
    let mut out = Vec::with_capacity(transformed.len());
    for (block, &primary) in transformed.chunks(block_size).zip(sentinels) {
        out.extend(inverse_block(block, primary));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_round_trip(input: &[u8], block_size: usize) {
        let (transformed, sentinels) = forward(input, block_size);
        assert_eq!(transformed.len(), input.len());
        assert_eq!(inverse(&transformed, &sentinels, block_size), input);
    }

    #[test]
    fn empty_input_round_trips() {
        check_round_trip(b"", DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn single_block_round_trips() {
        check_round_trip(b"abracadabra", DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn periodic_block_round_trips() {
        let input = b"abababababababab";
        check_round_trip(input, DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn multiple_blocks_round_trip_with_one_sentinel_each() {
        let input: Vec<u8> = (0..300u32).map(|i| (i % 251) as u8).collect();
        let block_size = 64;
        let (_, sentinels) = forward(&input, block_size);
        assert_eq!(sentinels.len(), input.len().div_ceil(block_size));
        check_round_trip(&input, block_size);
    }

    #[test]
    fn a_run_of_identical_bytes_round_trips() {
        let input = vec![0u8; 500];
        check_round_trip(&input, 128);
    }
}
