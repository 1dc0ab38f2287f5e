// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Order-1 adaptive counting model (`AdaptivePredictiveCoder` in the original
//! source): one order-0 table per previous symbol.

use bwac_core::{Symbol, Word};
use std::marker::PhantomData;

use crate::order0::CountTable;
use crate::traits::{DecodeSink, Model};

pub struct Order1Model<W: Word> {
    tables: Vec<CountTable>,
    context: usize,
    _marker: PhantomData<W>,
}

impl<W: Word> Order1Model<W> {
    pub fn new(alphabet: usize) -> Self {
        let max_scale = W::MAX_SCALE.to_usize();
        Order1Model {
            tables: (0..alphabet).map(|_| CountTable::new(alphabet, max_scale)).collect(),
            context: 0,
            _marker: PhantomData,
        }
    }
}

impl<W: Word> Model<W> for Order1Model<W> {
    fn alphabet(&self) -> usize {
        self.tables.len()
    }

    fn scale(&self) -> W {
        W::from_usize(self.tables[self.context].scale())
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        let table = &mut self.tables[self.context];
        let (low, high) = table.interval(symbol);
        let scale = table.scale();
        out.push(Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high)));
        table.bump(symbol);
        self.context = symbol;
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        let table = &mut self.tables[self.context];
        let (s, low, high) = table.find(p.to_usize());
        let done = sink.accept(s);
        if done {
            return Symbol::end_of_stream();
        }
        let scale = table.scale();
        table.bump(s);
        self.context = s;
        Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_switches_to_the_last_symbol_coded() {
        let mut enc: Order1Model<u16> = Order1Model::new(4);
        let mut out = Vec::new();
        enc.encode(2, &mut out);
        assert_eq!(enc.context, 2);
        out.clear();
        enc.encode(0, &mut out);
        assert_eq!(enc.context, 0);
    }

    #[test]
    fn repeating_bigrams_narrow_the_interval_over_time() {
        // "abababab..." should drive each context table to strongly favour
        // the one symbol that always follows it, so the interval width for
        // that symbol (relative to scale) grows over time.
        let mut enc: Order1Model<u16> = Order1Model::new(2);
        let mut out = Vec::new();
        let mut first_ratio = 0.0;
        let mut last_ratio = 0.0;
        for i in 0..64 {
            let s = i % 2;
            out.clear();
            enc.encode(s, &mut out);
            let sym = out[0];
            let ratio = (sym.high - sym.low) as f64 / sym.scale as f64;
            if i == 0 {
                first_ratio = ratio;
            }
            last_ratio = ratio;
        }
        assert!(last_ratio > first_ratio);
    }
}
