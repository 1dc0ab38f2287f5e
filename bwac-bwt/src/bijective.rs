// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bijective Burrows-Wheeler Transform (Gil/Scott; "BWTS"): a
//! sentinel-free, length-preserving permutation of the input bytes.
//!
//! Forward: factor the input into its Lyndon factorization (see
//! [`crate::lyndon`]), treat every rotation of every factor as a row of an
//! (unmaterialised) sorted matrix under the *infinite* periodic extension of
//! its word, and take the last column. Because each factor is primitive
//! (aperiodic), its rotations are pairwise distinct, and the total rotation
//! count across all factors equals the input length, so this is a bijection
//! on byte strings of a given length rather than merely an injection that
//! needs a sentinel to invert.
//!
//! Inverse: the standard backward (`LF`) mapping used to invert an ordinary
//! BWT decomposes, here, into one cycle per original Lyndon factor rather
//! than a single cycle through a sentinel row. Each cycle is walked to
//! recover one factor's word, the words are sorted back into non-increasing
//! order (the defining property of a Lyndon factorization), and
//! concatenated.

use std::cmp::Ordering;

use crate::lyndon::{self, Factor};

/// Compare two infinite periodic sequences, given as `(length, byte-at)`
/// pairs, lexicographically.
///
/// Two distinct periodic sequences must differ within their first `len_a +
/// len_b` symbols: by the Fine and Wilf theorem, an agreement run at least
/// `len_a + len_b - gcd(len_a, len_b)` long forces a common period of
/// `gcd(len_a, len_b)`, which (since both source words are primitive here)
/// is only possible if the two sequences are identical. `len_a + len_b` is
/// a convenient, slightly looser bound than the tight Fine-Wilf one that
/// avoids computing a gcd on every comparison.
fn compare_periodic(
    len_a: usize,
    get_a: impl Fn(usize) -> u8,
    len_b: usize,
    get_b: impl Fn(usize) -> u8,
) -> Ordering {
    let bound = len_a + len_b;
    for k in 0..bound {
        let ca = get_a(k % len_a);
        let cb = get_b(k % len_b);
        match ca.cmp(&cb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// A rotation: the `len`-periodic sequence beginning `offset` bytes into the
/// factor `[start, start + len)` of the original input.
#[derive(Clone, Copy)]
struct Rotation {
    start: usize,
    len: usize,
    offset: usize,
}

fn compare_rotations(input: &[u8], a: Rotation, b: Rotation) -> Ordering {
    compare_periodic(
        a.len,
        |k| input[a.start + (a.offset + k) % a.len],
        b.len,
        |k| input[b.start + (b.offset + k) % b.len],
    )
    // Two rotations of the *same* factor never tie (a Lyndon word is
    // aperiodic, so its rotations are pairwise distinct), and two rotations
    // of different factors tie only when the factors' words are literally
    // identical bytes, in which case either relative order reproduces the
    // same output, so a positional tie-break is applied only for
    // determinism, not correctness.
    .then_with(|| (a.start, a.offset).cmp(&(b.start, b.offset)))
}

/// Forward bijective BWT: `forward(bytes).len() == bytes.len()`, and
/// `inverse(forward(bytes)) == bytes` for every input.
pub fn forward(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }

    let factors = lyndon::factorize(input);
    let mut rotations = Vec::with_capacity(input.len());
    for Factor { start, len } in factors {
        for offset in 0..len {
            rotations.push(Rotation { start, len, offset });
        }
    }

    rotations.sort_by(|&a, &b| compare_rotations(input, a, b));

    rotations
        .into_iter()
        .map(|r| input[r.start + (r.offset + r.len - 1) % r.len])
        .collect()
}

/// The backward mapping from a BWT last column back to the row each
/// character's occurrence continues from: the standard `LF` array.
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

/// Inverse bijective BWT.
pub fn inverse(last: &[u8]) -> Vec<u8> {
    let n = last.len();
    if n == 0 {
        return Vec::new();
    }

    let lf = lf_mapping(last);

    // Every row belongs to exactly one LF-cycle, and every cycle is exactly
    // the rotation set of one original Lyndon factor.
    let mut visited = vec![false; n];
    let mut words: Vec<Vec<u8>> = Vec::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut cycle = Vec::new();
        let mut row = start;
        while !visited[row] {
            visited[row] = true;
            cycle.push(row);
            row = lf[row];
        }

        // A Lyndon word is strictly less than every one of its own
        // non-trivial rotations, so the row representing rotation-offset 0
        // (the canonical, minimal rotation) is the smallest row index in
        // the cycle — rows are already numbered by sorted order.
        let canonical = *cycle.iter().min().expect("a cycle is never empty");

        // Walking LF from the canonical row visits offsets
        // `0, len-1, len-2, ..., 1`, and `last[row]` at offset `o` holds the
        // word's byte at `o - 1 (mod len)`; so this walk yields the word
        // reversed.
        let mut reversed = Vec::with_capacity(cycle.len());
        let mut row = canonical;
        for _ in 0..cycle.len() {
            reversed.push(last[row]);
            row = lf[row];
        }
        reversed.reverse();
        words.push(reversed);
    }

    // Reassemble in non-increasing order, the defining property of a Lyndon
    // factorization.
    words.sort_by(|a, b| {
        compare_periodic(a.len(), |k| a[k], b.len(), |k| b[k]).then_with(|| a.cmp(b))
    });
    words.reverse();

    let mut out = Vec::with_capacity(n);
    for word in words {
        out.extend_from_slice(&word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_round_trip(input: &[u8]) {
        let transformed = forward(input);
        assert_eq!(transformed.len(), input.len());
        assert_eq!(inverse(&transformed), input, "failed to invert {:?}", input);
    }

    #[test]
    fn empty_input_round_trips() {
        check_round_trip(b"");
    }

    #[test]
    fn single_byte_round_trips() {
        check_round_trip(b"a");
    }

    #[test]
    fn abracadabra_round_trips() {
        check_round_trip(b"abracadabra");
    }

    #[test]
    fn a_run_of_identical_bytes_round_trips() {
        let input = vec![0u8; 4096];
        check_round_trip(&input);
    }

    #[test]
    fn a_strictly_increasing_run_round_trips() {
        let input: Vec<u8> = (0..=255u8).collect();
        check_round_trip(&input);
    }

    #[test]
    fn repeated_short_patterns_round_trip() {
        let input: Vec<u8> = b"banana banana banana".to_vec();
        check_round_trip(&input);
    }

    #[test]
    fn bwt_concentrates_runs_for_a_repetitive_input() {
        let input = b"abababababababab";
        let transformed = forward(input);
        let max_run = transformed
            .iter()
            .fold((0usize, 0usize, None::<u8>), |(best, cur, last), &b| match last {
                Some(l) if l == b => (best.max(cur + 1), cur + 1, Some(b)),
                _ => (best.max(1), 1, Some(b)),
            })
            .0;
        assert!(max_run >= 4, "expected BWT to concentrate repeats into runs, got {:?}", transformed);
    }

    #[test]
    fn random_inputs_round_trip() {
        use rand::{rngs::SmallRng, Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(0xbeef_cafe);
        for _ in 0..20 {
            let len = rng.gen_range(0usize..200);
            let input: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            check_round_trip(&input);
        }
    }
}
