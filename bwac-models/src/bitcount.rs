// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bitwise counting models (`AdaptiveBitCoder`/`AdaptivePredictiveBitCoder`):
//! a symbol is coded as `ceil(log2(alphabet))` bits, MSB first, each against
//! a 2-entry count table (for bit 0 and bit 1).
//!
//! `CountingBitModel` uses one shared table for every bit position.
//! `PredictiveCountingBitModel` keys the table by a sliding 16-bit window of
//! previously coded bits (`context <- (context << 1) | bit`, truncated to 16
//! bits), giving each of the 65536 contexts its own table.

use bwac_core::{Symbol, Word};
use std::marker::PhantomData;

use crate::traits::{DecodeSink, Model};

const CONTEXT_BITS: u32 = 16;
const CONTEXT_SIZE: usize = 1 << CONTEXT_BITS;
const CONTEXT_MASK: usize = CONTEXT_SIZE - 1;

#[derive(Clone)]
pub(crate) struct BitCountTable {
    counts: [usize; 2],
    max_scale: usize,
}

impl BitCountTable {
    fn new(max_scale: usize) -> Self {
        BitCountTable { counts: [1, 1], max_scale }
    }

    fn scale(&self) -> usize {
        self.counts[0] + self.counts[1]
    }

    fn interval(&self, bit: u8) -> (usize, usize, usize) {
        let scale = self.scale();
        if bit == 0 {
            (scale, 0, self.counts[0])
        } else {
            (scale, self.counts[0], scale)
        }
    }

    fn find(&self, p: usize) -> (u8, usize, usize) {
        let c0 = self.counts[0];
        if p < c0 {
            (0, 0, c0)
        } else {
            (1, c0, c0 + self.counts[1])
        }
    }

    fn bump(&mut self, bit: u8) {
        self.counts[bit as usize] += 1;
        if self.scale() > self.max_scale {
            for c in self.counts.iter_mut() {
                *c >>= 1;
                if *c == 0 {
                    *c = 1;
                }
            }
            log::trace!("bitwise count table halved");
        }
    }
}

pub(crate) fn bits_per_symbol(alphabet: usize) -> u32 {
    debug_assert!(alphabet > 1, "alphabet must contain at least two symbols");
    let mut bits = 0u32;
    while (1usize << bits) < alphabet {
        bits += 1;
    }
    bits
}

/// Per-bit accumulator shared by both the context-free and predictive
/// variants: tracks the partially-decoded symbol and whether the stream has
/// ended.
pub(crate) struct Accumulator {
    pub(crate) bits_per_symbol: u32,
    partial: usize,
    bits_read: u32,
    pub(crate) done: bool,
}

impl Accumulator {
    pub(crate) fn new(alphabet: usize) -> Self {
        Accumulator { bits_per_symbol: bits_per_symbol(alphabet), partial: 0, bits_read: 0, done: false }
    }

    /// Records one decoded bit; returns `Some(symbol)` once a full symbol has
    /// been accumulated.
    pub(crate) fn push_bit(&mut self, bit: u8) -> Option<usize> {
        self.partial = (self.partial << 1) | bit as usize;
        self.bits_read += 1;
        if self.bits_read == self.bits_per_symbol {
            let symbol = self.partial;
            self.partial = 0;
            self.bits_read = 0;
            Some(symbol)
        } else {
            None
        }
    }
}

pub struct CountingBitModel<W: Word> {
    table: BitCountTable,
    acc: Accumulator,
    alphabet: usize,
    _marker: PhantomData<W>,
}

impl<W: Word> CountingBitModel<W> {
    pub fn new(alphabet: usize) -> Self {
        CountingBitModel {
            table: BitCountTable::new(W::MAX_SCALE.to_usize()),
            acc: Accumulator::new(alphabet),
            alphabet,
            _marker: PhantomData,
        }
    }
}

impl<W: Word> Model<W> for CountingBitModel<W> {
    fn alphabet(&self) -> usize {
        self.alphabet
    }

    fn scale(&self) -> W {
        if self.acc.done {
            W::ONE
        } else {
            W::from_usize(self.table.scale())
        }
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        for i in (0..self.acc.bits_per_symbol).rev() {
            let bit = ((symbol >> i) & 1) as u8;
            let (scale, low, high) = self.table.interval(bit);
            out.push(Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high)));
            self.table.bump(bit);
        }
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        if self.acc.done {
            return Symbol::end_of_stream();
        }
        let (bit, low, high) = self.table.find(p.to_usize());
        let scale = self.table.scale();
        self.table.bump(bit);
        let sym = Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high));
        if let Some(symbol) = self.acc.push_bit(bit) {
            if sink.accept(symbol) {
                self.acc.done = true;
            }
        }
        sym
    }
}

pub struct PredictiveCountingBitModel<W: Word> {
    tables: Vec<BitCountTable>,
    context: usize,
    acc: Accumulator,
    alphabet: usize,
    _marker: PhantomData<W>,
}

impl<W: Word> PredictiveCountingBitModel<W> {
    pub fn new(alphabet: usize) -> Self {
        let max_scale = W::MAX_SCALE.to_usize();
        PredictiveCountingBitModel {
            tables: vec![BitCountTable::new(max_scale); CONTEXT_SIZE],
            context: 0,
            acc: Accumulator::new(alphabet),
            alphabet,
            _marker: PhantomData,
        }
    }

    fn advance_context(&mut self, bit: u8) {
        self.context = ((self.context << 1) | bit as usize) & CONTEXT_MASK;
    }
}

impl<W: Word> Model<W> for PredictiveCountingBitModel<W> {
    fn alphabet(&self) -> usize {
        self.alphabet
    }

    fn scale(&self) -> W {
        if self.acc.done {
            W::ONE
        } else {
            W::from_usize(self.tables[self.context].scale())
        }
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        for i in (0..self.acc.bits_per_symbol).rev() {
            let bit = ((symbol >> i) & 1) as u8;
            let table = &mut self.tables[self.context];
            let (scale, low, high) = table.interval(bit);
            out.push(Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high)));
            table.bump(bit);
            self.advance_context(bit);
        }
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        if self.acc.done {
            return Symbol::end_of_stream();
        }
        let table = &mut self.tables[self.context];
        let (bit, low, high) = table.find(p.to_usize());
        let scale = table.scale();
        table.bump(bit);
        let sym = Symbol::new(W::from_usize(scale), W::from_usize(low), W::from_usize(high));
        self.advance_context(bit);
        if let Some(symbol) = self.acc.push_bit(bit) {
            if sink.accept(symbol) {
                self.acc.done = true;
            }
        }
        sym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_per_symbol_rounds_up_to_the_next_power_of_two() {
        assert_eq!(bits_per_symbol(2), 1);
        assert_eq!(bits_per_symbol(3), 2);
        assert_eq!(bits_per_symbol(256), 8);
        assert_eq!(bits_per_symbol(258), 9);
    }

    #[test]
    fn encode_then_decode_agree_symbol_by_symbol() {
        let mut enc: CountingBitModel<u16> = CountingBitModel::new(256);
        let mut dec: CountingBitModel<u16> = CountingBitModel::new(256);
        let mut out = Vec::new();
        for s in [0usize, 255, 128, 1, 254] {
            out.clear();
            enc.encode(s, &mut out);
            let mut decoded = None;
            for sym in &out {
                let d = dec.decode(sym.low, &mut |b: u8| {
                    decoded = Some(b as usize);
                    false
                });
                assert_eq!(d, *sym);
            }
            assert_eq!(decoded, Some(s));
        }
    }

    #[test]
    fn predictive_variant_tracks_a_sliding_bit_context() {
        let mut model: PredictiveCountingBitModel<u16> = PredictiveCountingBitModel::new(4);
        let mut out = Vec::new();
        model.encode(0b01, &mut out);
        assert_eq!(model.context & 0b11, 0b01);
    }
}
