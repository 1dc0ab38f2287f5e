// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Order-0 adaptive counting model (`AdaptiveCoder`/`AdaptiveDecoder` in the
//! original source).

use bwac_core::{Symbol, Word};
use std::marker::PhantomData;

use crate::traits::{DecodeSink, Model};

/// An order-0 frequency table: one count per alphabet symbol plus the
/// running sum, with halve-and-floor rebalancing on overflow.
#[derive(Debug, Clone)]
pub(crate) struct CountTable {
    counts: Vec<usize>,
    scale: usize,
    max_scale: usize,
}

impl CountTable {
    pub(crate) fn new(alphabet: usize, max_scale: usize) -> Self {
        debug_assert!(alphabet <= max_scale, "alphabet must fit under MAX_SCALE");
        CountTable { counts: vec![1; alphabet], scale: alphabet, max_scale }
    }

    /// Locate the interval for symbol `s` without mutating state.
    pub(crate) fn interval(&self, s: usize) -> (usize, usize) {
        let low: usize = self.counts[..s].iter().sum();
        (low, low + self.counts[s])
    }

    /// Bump the count for `s` and rebalance on overflow. Call after reading
    /// `interval(s)`, or after establishing `s` from a decode lookup.
    pub(crate) fn bump(&mut self, s: usize) {
        self.counts[s] += 1;
        self.scale += 1;
        if self.scale > self.max_scale {
            self.halve_and_floor();
        }
    }

    fn halve_and_floor(&mut self) {
        let mut sum = 0;
        for count in self.counts.iter_mut() {
            *count >>= 1;
            if *count == 0 {
                *count = 1;
            }
            sum += *count;
        }
        self.scale = sum;
        log::trace!("order-0 table halved, new scale = {sum}");
    }

    /// Linear search for the symbol whose interval contains scaled position
    /// `p`; returns `(symbol, low, high)`.
    pub(crate) fn find(&self, p: usize) -> (usize, usize, usize) {
        let mut high = 0usize;
        for (s, &count) in self.counts.iter().enumerate() {
            high += count;
            if p < high {
                return (s, high - count, high);
            }
        }
        unreachable!("scaled position out of range of the count table");
    }

    pub(crate) fn scale(&self) -> usize {
        self.scale
    }
}

/// `AdaptiveCoder`/`AdaptiveDecoder`: a single order-0 count table shared by
/// encode and decode, halved-and-floored on overflow.
pub struct Order0Model<W: Word> {
    table: CountTable,
    _marker: PhantomData<W>,
}

impl<W: Word> Order0Model<W> {
    pub fn new(alphabet: usize) -> Self {
        Order0Model { table: CountTable::new(alphabet, W::MAX_SCALE.to_usize()), _marker: PhantomData }
    }
}

impl<W: Word> Model<W> for Order0Model<W> {
    fn alphabet(&self) -> usize {
        self.table.counts.len()
    }

    fn scale(&self) -> W {
        W::from_usize(self.table.scale())
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        let (low, high) = self.table.interval(symbol);
        let scale = self.table.scale();
        out.push(Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high)));
        self.table.bump(symbol);
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        let (s, low, high) = self.table.find(p.to_usize());
        let done = sink.accept(s);
        if done {
            return Symbol::end_of_stream();
        }
        let scale = self.table.scale();
        self.table.bump(s);
        Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high))
    }
}
