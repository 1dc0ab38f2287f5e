// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Filtered (leaky-integrator) bitwise models
//! (`FilteredAdaptiveBitCoder`/the predictive variant): a single probability
//! `p1` updated by an exponential moving average instead of exact counts.

use bwac_core::{Symbol, Word};
use std::marker::PhantomData;

use crate::bitcount::{bits_per_symbol, Accumulator};
use crate::traits::{DecodeSink, Model};

/// `filterScale` from the tuning constants.
const SCALE: u32 = 4096;
/// `filterShift`.
const SHIFT: u32 = 5;

const CONTEXT_BITS: u32 = 16;
const CONTEXT_SIZE: usize = 1 << CONTEXT_BITS;
const CONTEXT_MASK: usize = CONTEXT_SIZE - 1;

#[derive(Clone, Copy)]
struct FilteredBit {
    p1: i32,
}

impl FilteredBit {
    fn new() -> Self {
        FilteredBit { p1: SCALE as i32 / 2 }
    }

    /// The probability split point, clamped away from the edges so neither
    /// interval ever collapses to zero width.
    fn split(&self) -> u32 {
        (self.p1.clamp(1, SCALE as i32 - 1)) as u32
    }

    fn interval(&self, bit: u8) -> (u32, u32, u32) {
        let split = self.split();
        if bit == 0 {
            (SCALE, 0, split)
        } else {
            (SCALE, split, SCALE)
        }
    }

    fn find(&self, p: u32) -> (u8, u32, u32) {
        let split = self.split();
        if p < split {
            (0, 0, split)
        } else {
            (1, split, SCALE)
        }
    }

    fn update(&mut self, bit: u8) {
        let target = if bit == 1 { SCALE as i32 } else { 0 };
        self.p1 += (target - self.p1) >> SHIFT;
    }
}

pub struct FilteredBitModel<W: Word> {
    predictor: FilteredBit,
    acc: Accumulator,
    alphabet: usize,
    _marker: PhantomData<W>,
}

impl<W: Word> FilteredBitModel<W> {
    pub fn new(alphabet: usize) -> Self {
        FilteredBitModel {
            predictor: FilteredBit::new(),
            acc: Accumulator::new(alphabet),
            alphabet,
            _marker: PhantomData,
        }
    }
}

impl<W: Word> Model<W> for FilteredBitModel<W> {
    fn alphabet(&self) -> usize {
        self.alphabet
    }

    fn scale(&self) -> W {
        if self.acc.done {
            W::ONE
        } else {
            W::from_usize(SCALE as usize)
        }
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        for i in (0..bits_per_symbol(self.alphabet)).rev() {
            let bit = ((symbol >> i) & 1) as u8;
            let (scale, low, high) = self.predictor.interval(bit);
            out.push(Symbol::new(W::from_usize(scale as usize), W::from_usize(low as usize), W::from_usize(high as usize)));
            self.predictor.update(bit);
        }
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        if self.acc.done {
            return Symbol::end_of_stream();
        }
        let (bit, low, high) = self.predictor.find(p.to_usize() as u32);
        self.predictor.update(bit);
        let sym = Symbol::new(W::from_usize(SCALE as usize), W::from_usize(low as usize), W::from_usize(high as usize));
        if let Some(symbol) = self.acc.push_bit(bit) {
            if sink.accept(symbol) {
                self.acc.done = true;
            }
        }
        sym
    }
}

pub struct PredictiveFilteredBitModel<W: Word> {
    predictors: Vec<FilteredBit>,
    context: usize,
    acc: Accumulator,
    alphabet: usize,
    _marker: PhantomData<W>,
}

impl<W: Word> PredictiveFilteredBitModel<W> {
    pub fn new(alphabet: usize) -> Self {
        PredictiveFilteredBitModel {
            predictors: vec![FilteredBit::new(); CONTEXT_SIZE],
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

impl<W: Word> Model<W> for PredictiveFilteredBitModel<W> {
    fn alphabet(&self) -> usize {
        self.alphabet
    }

    fn scale(&self) -> W {
        if self.acc.done {
            W::ONE
        } else {
            W::from_usize(SCALE as usize)
        }
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        for i in (0..bits_per_symbol(self.alphabet)).rev() {
            let bit = ((symbol >> i) & 1) as u8;
            let predictor = &mut self.predictors[self.context];
            let (scale, low, high) = predictor.interval(bit);
            out.push(Symbol::new(W::from_usize(scale as usize), W::from_usize(low as usize), W::from_usize(high as usize)));
            predictor.update(bit);
            self.advance_context(bit);
        }
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        if self.acc.done {
            return Symbol::end_of_stream();
        }
        let predictor = &mut self.predictors[self.context];
        let (bit, low, high) = predictor.find(p.to_usize() as u32);
        predictor.update(bit);
        let sym = Symbol::new(W::from_usize(SCALE as usize), W::from_usize(low as usize), W::from_usize(high as usize));
        self.advance_context(bit);
        if let Some(symbol) = self.acc.push_bit(bit) {
            if sink.accept(symbol) {
                self.acc.done = true;
            }
        }
        sym
    }
}
