// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The arithmetic decoder: mirrors [`crate::encoder::Encoder`] bit for bit,
//! pulling a `code` register through the same renormalisation shape while
//! consulting a [`Model`] for the current symbol's interval.

use bwac_core::{Symbol, Word};
use bwac_models::{DecodeSink, Model};

use crate::coder::BitSource;

pub struct Decoder<W: Word, S: BitSource> {
    low: W,
    high: W,
    code: W,
    source: S,
}

impl<W: Word, S: BitSource> Decoder<W, S> {
    /// Preload `W::BITS` bits from `source` into `code`, matching the
    /// reference decoder's priming read before the first symbol.
    pub fn new(mut source: S) -> Self {
        let mut code = W::ZERO;
        for _ in 0..W::BITS {
            let bit = source.next_bit();
            code = code.shl(1).or(if bit { W::ONE } else { W::ZERO });
        }
        Decoder { low: W::ZERO, high: W::MAX, code, source }
    }

    /// Decode one symbol against `model`, feeding the decoded byte(s) to
    /// `sink`. Returns `true` once the model/sink pair has signalled end of
    /// stream, at which point the caller should stop calling `decode`.
    pub fn decode(&mut self, model: &mut dyn Model<W>, sink: &mut dyn DecodeSink) -> bool {
        let scale = model.scale();
        let range = W::double_add(self.high.wrapping_sub(self.low).widen(), W::double_from_usize(1));

        let offset = W::double_add(self.code.wrapping_sub(self.low).widen(), W::double_from_usize(1));
        let numerator = W::double_sub(W::double_mul(offset, scale.widen()), W::double_from_usize(1));
        let p = W::narrow(W::double_div(numerator, range));

        let symbol = model.decode(p, sink);
        if symbol.is_end_of_stream() {
            return true;
        }

        let low_term = W::double_div(W::double_mul(range, symbol.low.widen()), scale.widen());
        let high_term = W::double_div(W::double_mul(range, symbol.high.widen()), scale.widen());

        self.high = self.low.wrapping_add(W::narrow(high_term)).wrapping_sub(W::ONE);
        self.low = self.low.wrapping_add(W::narrow(low_term));

        self.renormalise();
        false
    }

    fn renormalise(&mut self) {
        loop {
            if self.low.and(W::MSB) == self.high.and(W::MSB) {
                // matching top bit, nothing to undo
            } else if self.low.and(W::SECOND_MSB) != W::ZERO && self.high.and(W::SECOND_MSB) == W::ZERO {
                self.low = self.low.and(W::SECOND_MSB.not());
                self.high = self.high.or(W::SECOND_MSB);
                self.code = self.code.xor(W::SECOND_MSB);
            } else {
                break;
            }
            self.low = self.low.shl(1);
            self.high = self.high.shl(1).or(W::ONE);
            let bit = self.source.next_bit();
            self.code = self.code.shl(1).or(if bit { W::ONE } else { W::ZERO });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::{PackedSink, PackedSource};
    use crate::encoder::Encoder;
    use bwac_models::{Order0Model, VecSink};

    #[test]
    fn round_trips_a_short_run_through_an_order0_model() {
        let input = [2u8, 2, 2, 0, 1, 2, 2, 3];
        let mut model: Order0Model<u16> = Order0Model::new(4);
        let mut encoder: Encoder<u16, PackedSink> = Encoder::new(PackedSink::new());
        let mut staging = Vec::new();
        for &b in &input {
            staging.clear();
            model.encode(b as usize, &mut staging);
            for sym in staging.drain(..) {
                encoder.encode(sym);
            }
        }
        let (bytes, _) = encoder.finish();

        let mut decode_model: Order0Model<u16> = Order0Model::new(4);
        let mut decoder: Decoder<u16, PackedSource> = Decoder::new(PackedSource::new(&bytes));
        let mut output = Vec::new();
        let mut sink = VecSink::new(&mut output, input.len());
        for _ in 0..input.len() {
            let done = decoder.decode(&mut decode_model, &mut sink);
            assert!(!done);
        }
        assert_eq!(output, input);
    }
}
