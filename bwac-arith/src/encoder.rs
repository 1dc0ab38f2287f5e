// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The arithmetic encoder: narrows a `(low, high)` range by each input
//! `Symbol`'s interval, emitting committed bits through the renormalisation
//! loop described in §4.1.

use bwac_core::{Symbol, Word};

use crate::coder::BitSink;

/// Promoted to fields exactly as the design notes ask: the reference
/// closure-captures `low, high, bits, mask, underflow` over the lifetime of
/// one `Code` call; here they are state on a struct passed by `&mut self`.
pub struct Encoder<W: Word, S: BitSink> {
    low: W,
    high: W,
    underflow: u32,
    sink: S,
    /// Number of `Symbol`s encoded, for the caller's byte-count bookkeeping.
    count: usize,
}

impl<W: Word, S: BitSink> Encoder<W, S> {
    pub fn new(sink: S) -> Self {
        Encoder { low: W::ZERO, high: W::MAX, underflow: 0, sink, count: 0 }
    }

    /// Narrow the range by one `Symbol`'s interval and renormalise.
    pub fn encode(&mut self, symbol: Symbol<W>) {
        debug_assert!(symbol.low < symbol.high);
        debug_assert!(symbol.high <= symbol.scale);

        let range = W::double_add(self.high.wrapping_sub(self.low).widen(), W::double_from_usize(1));
        let scale = symbol.scale.widen();

        let low_term = W::double_div(W::double_mul(range, symbol.low.widen()), scale);
        let high_term = W::double_div(W::double_mul(range, symbol.high.widen()), scale);

        let new_low = self.low.wrapping_add(W::narrow(low_term));
        let new_high = self.low.wrapping_add(W::narrow(high_term)).wrapping_sub(W::ONE);
        self.low = new_low;
        self.high = new_high;
        self.count += 1;

        self.renormalise();
    }

    fn renormalise(&mut self) {
        loop {
            if self.low.and(W::MSB) == self.high.and(W::MSB) {
                let bit = self.high.and(W::MSB) != W::ZERO;
                self.sink.push_bit(bit);
                while self.underflow > 0 {
                    self.sink.push_bit(!bit);
                    self.underflow -= 1;
                }
            } else if self.low.and(W::SECOND_MSB) != W::ZERO && self.high.and(W::SECOND_MSB) == W::ZERO {
                self.low = self.low.and(W::SECOND_MSB.not());
                self.high = self.high.or(W::SECOND_MSB);
                self.underflow += 1;
            } else {
                break;
            }
            self.low = self.low.shl(1);
            self.high = self.high.shl(1).or(W::ONE);
        }
    }

    /// Emit the termination bits and flush the bit sink. The caller should
    /// call this exactly once, after the last `encode`, even for empty
    /// input (the renormalisation loop has never run and a full
    /// termination sequence is still emitted).
    pub fn finish(mut self) -> (Vec<u8>, usize) {
        let bit = self.low.and(W::SECOND_MSB) != W::ZERO;
        self.sink.push_bit(bit);
        self.underflow += 1;
        while self.underflow > 0 {
            self.sink.push_bit(!bit);
            self.underflow -= 1;
        }
        (self.sink.into_bytes(), self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::PackedSink;

    #[test]
    fn empty_input_still_emits_termination_bits() {
        let encoder: Encoder<u16, PackedSink> = Encoder::new(PackedSink::new());
        let (bytes, count) = encoder.finish();
        assert_eq!(count, 0);
        assert!(!bytes.is_empty());
    }

    #[test]
    fn encoding_narrows_a_disjoint_pair_of_intervals_differently() {
        let mut a: Encoder<u16, PackedSink> = Encoder::new(PackedSink::new());
        a.encode(Symbol::new(4u16, 0, 1));
        let (bytes_a, _) = a.finish();

        let mut b: Encoder<u16, PackedSink> = Encoder::new(PackedSink::new());
        b.encode(Symbol::new(4u16, 3, 4));
        let (bytes_b, _) = b.finish();

        assert_ne!(bytes_a, bytes_b);
    }
}
