// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SlidingWindowModel` (`AdaptiveCoder1`/`AdaptiveDecoder1` in
//! `original_source/model.go`): an order-0 table adapted by a bounded ring of
//! the most recently coded symbols rather than by halve-and-floor.
//!
//! Every symbol coded retires the symbol coded `MAX_SCALE` steps ago from the
//! ring: its count is decremented and the new symbol's count is
//! incremented, so the table always reflects exactly the last `MAX_SCALE`
//! symbols once the ring has filled. This weights recency more heavily than
//! the order-0 model's unbounded halve-and-floor history.

use bwac_core::{Symbol, Word};
use std::marker::PhantomData;

use crate::traits::{DecodeSink, Model};

/// Sentinel meaning "this ring slot has not been written yet".
const UNSET: usize = usize::MAX;

pub struct SlidingWindowModel<W: Word> {
    counts: Vec<usize>,
    scale: usize,
    max_scale: usize,
    history: Vec<usize>,
    head: usize,
    _marker: PhantomData<W>,
}

impl<W: Word> SlidingWindowModel<W> {
    pub fn new(alphabet: usize) -> Self {
        let max_scale = W::MAX_SCALE.to_usize();
        SlidingWindowModel {
            counts: vec![1; alphabet],
            scale: alphabet,
            max_scale,
            history: vec![UNSET; max_scale + 1],
            head: 0,
            _marker: PhantomData,
        }
    }

    fn interval(&self, s: usize) -> (usize, usize) {
        let low: usize = self.counts[..s].iter().sum();
        (low, low + self.counts[s])
    }

    fn find(&self, p: usize) -> (usize, usize, usize) {
        let mut high = 0usize;
        for (s, &count) in self.counts.iter().enumerate() {
            high += count;
            if p < high {
                return (s, high - count, high);
            }
        }
        unreachable!("scaled position out of range of the sliding-window table");
    }

    fn retire_and_admit(&mut self, s: usize) {
        let retiring = self.history[self.head];
        if retiring != UNSET {
            if retiring != s {
                self.history[self.head] = s;
                self.counts[s] += 1;
                self.counts[retiring] -= 1;
            }
        } else if self.scale < self.max_scale {
            self.history[self.head] = s;
            self.counts[s] += 1;
            self.scale += 1;
        }
        self.head = (self.head + 1) % self.history.len();
    }
}

impl<W: Word> Model<W> for SlidingWindowModel<W> {
    fn alphabet(&self) -> usize {
        self.counts.len()
    }

    fn scale(&self) -> W {
        W::from_usize(self.scale)
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        let (low, high) = self.interval(symbol);
        out.push(Symbol::new(W::from_usize(self.scale), W::from_usize(low), W::from_usize(high)));
        self.retire_and_admit(symbol);
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        let (s, low, high) = self.find(p.to_usize());
        let done = sink.accept(s);
        if done {
            return Symbol::end_of_stream();
        }
        let scale = self.scale;
        self.retire_and_admit(s);
        Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_count_stays_at_least_one() {
        let mut model: SlidingWindowModel<u16> = SlidingWindowModel::new(4);
        let mut out = Vec::new();
        for i in 0..10_000usize {
            out.clear();
            model.encode(i % 4, &mut out);
        }
        assert!(model.counts.iter().all(|&c| c >= 1));
        assert!(model.scale <= model.max_scale);
    }

    #[test]
    fn encode_then_decode_agree_on_the_interval() {
        let mut enc: SlidingWindowModel<u16> = SlidingWindowModel::new(6);
        let mut dec: SlidingWindowModel<u16> = SlidingWindowModel::new(6);
        let mut out = Vec::new();
        for s in [5usize, 1, 1, 1, 2, 0] {
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
