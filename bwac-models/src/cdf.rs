// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The CDF model (`FilteredAdaptiveCoder`) and its context-tree extension
//! (`FilteredAdaptivePredictiveCoder`), both backed by a single
//! `CdfModel` parameterised by context depth.
//!
//! The reference implementation expresses the context tree as a recursion
//! over `*Node16`/`*Node32` pointers. Per the design notes' preferred
//! re-architecture, this is instead an arena: nodes live in a flat `Vec`
//! indexed by integer id, and each node's children are a small hash map from
//! context symbol to child id. Depth 0 (an empty context buffer) degenerates
//! to a single node — the plain CDF model — without any special-casing.

use bwac_core::{Symbol, Word};
use hashbrown::HashMap;
use std::marker::PhantomData;

use crate::traits::{DecodeSink, Model};

/// Default damping rate (`CDF*Rate`).
pub const DEFAULT_RATE: u32 = 5;

struct Node<W: Word> {
    /// Cumulative distribution, `alphabet + 1` entries; `model[0] == 0`,
    /// `model[alphabet] == CDF_SCALE`.
    model: Vec<W>,
    children: HashMap<usize, usize>,
}

impl<W: Word> Node<W> {
    fn new(alphabet: usize, scale: usize) -> Self {
        let mut model = Vec::with_capacity(alphabet + 1);
        for i in 0..=alphabet {
            model.push(W::from_usize(i * scale / alphabet));
        }
        *model.last_mut().unwrap() = W::from_usize(scale);
        Node { model, children: HashMap::new() }
    }
}

/// Builds, for each symbol `s`, the CDF of a unit spike at `s` scaled to
/// `scale` — the "mixin" each update blends the current model towards.
fn build_mixin(alphabet: usize, scale: usize) -> Vec<Vec<usize>> {
    let mut mixin = vec![vec![0usize; alphabet + 1]; alphabet];
    for (i, row) in mixin.iter_mut().enumerate() {
        let mut sum = 0usize;
        for (j, slot) in row.iter_mut().enumerate() {
            *slot = sum;
            sum += 1;
            if j == i {
                sum += scale - alphabet;
            }
        }
    }
    mixin
}

/// A cumulative-distribution model, optionally conditioned on a circular
/// buffer of the last `depth` symbols coded (`depth == 0` is the plain,
/// context-free CDF model).
pub struct CdfModel<W: Word> {
    alphabet: usize,
    scale: usize,
    nodes: Vec<Node<W>>,
    context: Vec<usize>,
    first: usize,
    mixin: Vec<Vec<usize>>,
    rate: u32,
    verify: bool,
    _marker: PhantomData<W>,
}

impl<W: Word> CdfModel<W> {
    pub fn new(alphabet: usize, depth: usize) -> Self {
        Self::with_rate(alphabet, depth, DEFAULT_RATE)
    }

    pub fn with_rate(alphabet: usize, depth: usize, rate: u32) -> Self {
        let scale = W::CDF_SCALE.to_usize();
        CdfModel {
            alphabet,
            scale,
            nodes: vec![Node::new(alphabet, scale)],
            context: vec![0; depth],
            first: 0,
            mixin: build_mixin(alphabet, scale),
            rate,
            verify: false,
            _marker: PhantomData,
        }
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    fn deepest_node(&self) -> usize {
        let length = self.context.len();
        let mut current = self.first;
        let mut node_id = 0;
        let mut depth = 0;
        while depth < length {
            let sym = self.context[current];
            match self.nodes[node_id].children.get(&sym) {
                Some(&child_id) => {
                    node_id = child_id;
                    current = (current + 1) % length;
                    depth += 1;
                }
                None => break,
            }
        }
        node_id
    }

    /// The CDF used for the current context, deepest available node first.
    fn model_view(&self) -> &[W] {
        &self.nodes[self.deepest_node()].model
    }

    /// Public alias of [`Self::model_view`] for the meta-model, which needs
    /// to read two independent `CdfModel`s' views before combining them.
    pub(crate) fn model_view_pub(&self) -> &[W] {
        self.model_view()
    }

    /// Public alias of [`Self::update`] for the meta-model, which applies
    /// the same symbol update to two independently-rated `CdfModel`s rather
    /// than computing a single combined interval first.
    pub(crate) fn force_update(&mut self, s: usize) {
        self.update(s)
    }

    /// Blend every node along the context path towards the mixin for `s`,
    /// creating missing children lazily, then advance the context.
    fn update(&mut self, s: usize) {
        let mixin = self.mixin[s].clone();
        let length = self.context.len();
        let rate = self.rate;
        let scale = self.scale;
        let verify = self.verify;

        let mut current = self.first;
        let mut node_id = 0;
        let mut depth = 0;
        loop {
            {
                let node = &mut self.nodes[node_id];
                let size = node.model.len() - 1;
                for i in 1..size {
                    let a = node.model[i].to_usize() as i64;
                    let b = mixin[i] as i64;
                    node.model[i] = W::from_usize((a + ((b - a) >> rate)) as usize);
                }
                if verify {
                    debug_assert_eq!(node.model[size].to_usize(), scale, "cdf scale drifted");
                    for i in 1..node.model.len() {
                        debug_assert!(
                            node.model[i] > node.model[i - 1],
                            "cdf must stay strictly monotone"
                        );
                    }
                }
            }

            if depth >= length {
                break;
            }
            let sym = self.context[current];
            let child_id = match self.nodes[node_id].children.get(&sym) {
                Some(&id) => id,
                None => {
                    self.nodes.push(Node::new(self.alphabet, scale));
                    let new_id = self.nodes.len() - 1;
                    self.nodes[node_id].children.insert(sym, new_id);
                    new_id
                }
            };
            node_id = child_id;
            current = (current + 1) % length;
            depth += 1;
        }

        if length > 0 {
            self.context[self.first] = s;
            self.first = (self.first + 1) % length;
        }
    }
}

impl<W: Word> Model<W> for CdfModel<W> {
    fn alphabet(&self) -> usize {
        self.alphabet
    }

    fn scale(&self) -> W {
        W::from_usize(self.scale)
    }

    fn encode(&mut self, symbol: usize, out: &mut Vec<Symbol<W>>) {
        let model = self.model_view();
        let low = model[symbol];
        let high = model[symbol + 1];
        out.push(Symbol::new(W::from_usize(self.scale), low, high));
        self.update(symbol);
    }

    fn decode(&mut self, p: W, sink: &mut dyn DecodeSink) -> Symbol<W> {
        let model = self.model_view();
        let mut s = 0;
        for (i, window) in model.windows(2).enumerate() {
            if window[1] > p {
                s = i;
                break;
            }
        }
        let low = model[s];
        let high = model[s + 1];
        let done = sink.accept(s);
        if done {
            return Symbol::end_of_stream();
        }
        self.update(s);
        Symbol::new(W::from_usize(self.scale), low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_cdf_stays_monotone_after_updates() {
        let mut model: CdfModel<u16> = CdfModel::new(256, 0).with_verify(true);
        for s in 0..1000usize {
            model.update(s % 256);
        }
        let cdf = model.model_view();
        assert_eq!(cdf[0].to_usize(), 0);
        assert_eq!(*cdf.last().unwrap(), u16::from_usize(model.scale));
        for w in cdf.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn encode_then_decode_agree_on_the_interval() {
        let mut enc: CdfModel<u16> = CdfModel::new(8, 2);
        let mut dec: CdfModel<u16> = CdfModel::new(8, 2);
        let mut out = Vec::new();
        for s in [3usize, 3, 1, 7, 0, 3] {
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

    #[test]
    fn context_tree_lazily_creates_children() {
        let mut model: CdfModel<u16> = CdfModel::new(4, 2);
        assert_eq!(model.nodes.len(), 1);
        model.update(0);
        model.update(1);
        assert!(model.nodes.len() > 1);
    }
}
