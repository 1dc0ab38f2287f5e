// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Meta16`/`Meta32`: two CDF models at different damping rates, combined by
//! elementwise averaging. The fast-rate model (3) adapts quickly to local
//! structure; the slow-rate model (7) holds a steadier long-run estimate.
//! Both are updated on every symbol.

use bwac_core::{Symbol, Word};

use crate::cdf::CdfModel;
use crate::traits::{DecodeSink, Model};

/// Damping rate for the fast half of the pair.
pub const FAST_RATE: u32 = 3;
/// Damping rate for the slow half of the pair.
pub const SLOW_RATE: u32 = 7;

pub struct MetaCdfModel<W: Word> {
    fast: CdfModel<W>,
    slow: CdfModel<W>,
    alphabet: usize,
    scale: usize,
}

impl<W: Word> MetaCdfModel<W> {
    pub fn new(alphabet: usize, depth: usize) -> Self {
        MetaCdfModel {
            fast: CdfModel::with_rate(alphabet, depth, FAST_RATE),
            slow: CdfModel::with_rate(alphabet, depth, SLOW_RATE),
            alphabet,
            scale: W::CDF_SCALE.to_usize(),
        }
    }

    fn combined(&self) -> Vec<usize> {
        self.fast
            .model_view_pub()
            .iter()
            .zip(self.slow.model_view_pub().iter())
            .map(|(&a, &b)| {
                let a = a.to_usize() as i64;
                let b = b.to_usize() as i64;
                (a + ((b - a) >> 1)) as usize
            })
            .collect()
    }
}

impl<W: Word> Model<W> for MetaCdfModel<W> {
    fn alphabet(&self) -> usize {
        self.alphabet
    }

    fn scale(&self) -> W {
        W::from_usize(self.scale)
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        let combined = self.combined();
        let low = combined[symbol];
        let high = combined[symbol + 1];
        out.push(Symbol::new(W::from_usize(self.scale), W::from_usize(low), W::from_usize(high)));
        self.fast.force_update(symbol);
        self.slow.force_update(symbol);
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        let combined = self.combined();
        let mut s = 0;
        for (i, window) in combined.windows(2).enumerate() {
            if window[1] > p.to_usize() {
                s = i;
                break;
            }
        }
        let low = combined[s];
        let high = combined[s + 1];
        let done = sink.accept(s);
        if done {
            return Symbol::end_of_stream();
        }
        self.fast.force_update(s);
        self.slow.force_update(s);
        Symbol::new(W::from_usize(self.scale), W::from_usize(low), W::from_usize(high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_agree_on_the_interval() {
        let mut enc: MetaCdfModel<u16> = MetaCdfModel::new(8, 0);
        let mut dec: MetaCdfModel<u16> = MetaCdfModel::new(8, 0);
        let mut out = Vec::new();
        for s in [1usize, 1, 1, 5, 0] {
            out.clear();
            enc.encode(s, &mut out);
            let sym = out[0];
            let mut decoded = None;
            let decoded_sym = dec.decode(sym.low, &mut |b: u8| {
                decoded = Some(b as usize);
                false
            });
            assert_eq!(decoded, Some(s));
            assert_eq!(decoded_sym, sym);
        }
    }
}
