// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Incremental counterparts of [`crate::mtf`] and [`crate::mtfrl`] that
//! process one byte (or one symbol) at a time while carrying their
//! permutation state across calls, for callers driving the recoder from a
//! chunked stream rather than a single in-memory buffer.
//!
//! The whole-slice `forward`/`inverse` functions are expressed in terms of
//! these directly, so there is exactly one copy of each algorithm's logic.

use crate::mtfrl::{ZERO_A, ZERO_B};
use crate::permutation::Permutation;

/// Plain move-to-front, one byte (or rank) at a time.
pub struct StreamingMtf {
    perm: Permutation,
}

impl StreamingMtf {
    pub fn new() -> Self {
        StreamingMtf { perm: Permutation::identity() }
    }

    pub fn encode(&mut self, byte: u8) -> usize {
        let idx = self.perm.index_of(byte);
        self.perm.promote(idx);
        idx
    }

    pub fn decode(&mut self, idx: usize) -> u8 {
        let byte = self.perm.at(idx);
        self.perm.promote(idx);
        byte
    }
}

impl Default for StreamingMtf {
    fn default() -> Self {
        Self::new()
    }
}

/// Move-to-front with run-length folding, one input byte in (via [`Self::encode`])
/// or one coded symbol in (via [`Self::decode`]) at a time.
pub struct StreamingMtfRlEncoder {
    perm: Permutation,
    zero_run: usize,
}

impl StreamingMtfRlEncoder {
    pub fn new() -> Self {
        StreamingMtfRlEncoder { perm: Permutation::identity(), zero_run: 0 }
    }

    /// Encode one byte, returning the symbols (zero or more) it caused to be
    /// emitted. A run of leading move-to-front zeros only becomes symbols
    /// once it is broken by a non-zero rank, or via [`Self::finish`].
    pub fn encode(&mut self, byte: u8) -> Vec<usize> {
        let idx = self.perm.index_of(byte);
        let mut out = Vec::new();
        if idx == 0 {
            self.zero_run += 1;
        } else {
            if self.zero_run > 0 {
                crate::mtfrl::emit_run(&mut out, self.zero_run);
                self.zero_run = 0;
            }
            out.push(idx + 1);
        }
        self.perm.promote(idx);
        out
    }

    /// Flush a trailing zero-run that reached the end of input with no
    /// terminating non-zero symbol. Call exactly once, after the last
    /// [`Self::encode`].
    pub fn finish(&mut self) -> Vec<usize> {
        let mut out = Vec::new();
        if self.zero_run > 0 {
            crate::mtfrl::emit_run(&mut out, self.zero_run);
            self.zero_run = 0;
        }
        out
    }
}

impl Default for StreamingMtfRlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// The decode side of [`StreamingMtfRlEncoder`]: consumes one coded symbol at
/// a time and produces the bytes it resolves to (zero, one, or — at the end
/// of a folded run — several).
pub struct StreamingMtfRlDecoder {
    perm: Permutation,
    digits: Vec<u8>,
    produced: usize,
    target_len: usize,
}

impl StreamingMtfRlDecoder {
    /// `target_len` is the total number of bytes this stream will decode to;
    /// it is what lets a trailing, unterminated zero-run be flushed
    /// correctly without an explicit length prefix in the coded stream.
    pub fn new(target_len: usize) -> Self {
        StreamingMtfRlDecoder {
            perm: Permutation::identity(),
            digits: Vec::new(),
            produced: 0,
            target_len,
        }
    }

    pub fn push(&mut self, symbol: usize) -> Vec<u8> {
        let mut out = Vec::new();
        if self.produced >= self.target_len {
            return out;
        }
        if symbol == ZERO_A || symbol == ZERO_B {
            self.digits.push(if symbol == ZERO_A { 0 } else { 1 });
            return out;
        }

        if !self.digits.is_empty() {
            self.flush_run(&mut out);
        }
        if self.produced < self.target_len {
            let idx = symbol - 1;
            let byte = self.perm.at(idx);
            self.perm.promote(idx);
            out.push(byte);
            self.produced += 1;
        }
        out
    }

    /// Flush a trailing zero-run that reaches `target_len` with no
    /// terminating non-zero symbol. Call exactly once, after the last
    /// [`Self::push`].
    pub fn finish(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        if !self.digits.is_empty() {
            self.flush_run(&mut out);
        }
        out
    }

    fn flush_run(&mut self, out: &mut Vec<u8>) {
        let run = crate::mtfrl::decode_bijective_base2(&self.digits) - 1;
        self.digits.clear();
        for _ in 0..run {
            if self.produced >= self.target_len {
                break;
            }
            out.push(self.perm.at(0));
            self.perm.promote(0);
            self.produced += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_mtf_matches_the_batch_functions() {
        let input = b"abracadabra and then some more text to shuffle the ranks around";
        let mut enc = StreamingMtf::new();
        let streamed: Vec<usize> = input.iter().map(|&b| enc.encode(b)).collect();
        assert_eq!(streamed, crate::mtf::forward(input));

        let mut dec = StreamingMtf::new();
        let recovered: Vec<u8> = streamed.iter().map(|&i| dec.decode(i)).collect();
        assert_eq!(recovered, input);
    }

    #[test]
    fn streaming_mtfrl_matches_the_batch_functions_across_chunk_boundaries() {
        let input = b"aaaaabbbbbcccccaaaaa and some unrepeated tail 123!@#";

        let mut enc = StreamingMtfRlEncoder::new();
        let mut streamed = Vec::new();
        for chunk in input.chunks(7) {
            for &b in chunk {
                streamed.extend(enc.encode(b));
            }
        }
        streamed.extend(enc.finish());
        assert_eq!(streamed, crate::mtfrl::forward(input));

        let mut dec = StreamingMtfRlDecoder::new(input.len());
        let mut recovered = Vec::new();
        for chunk in streamed.chunks(3) {
            for &s in chunk {
                recovered.extend(dec.push(s));
            }
        }
        recovered.extend(dec.finish());
        assert_eq!(recovered, input);
    }

    #[test]
    fn a_trailing_unterminated_run_flushes_on_finish() {
        let mut input = b"hello".to_vec();
        input.extend(std::iter::repeat(b'o').take(20));

        let mut enc = StreamingMtfRlEncoder::new();
        let mut streamed = Vec::new();
        for &b in &input {
            streamed.extend(enc.encode(b));
        }
        streamed.extend(enc.finish());

        let mut dec = StreamingMtfRlDecoder::new(input.len());
        let mut recovered = Vec::new();
        for &s in &streamed {
            recovered.extend(dec.push(s));
        }
        recovered.extend(dec.finish());
        assert_eq!(recovered, input);
    }
}
