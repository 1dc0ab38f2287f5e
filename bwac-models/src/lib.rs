// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptive probability models for the `bwac` arithmetic coder: order-0 and
//! order-1 counting, a sliding-window counting variant, bitwise counting and
//! filtered (EMA) models (both context-free and context-predictive), and the
//! CDF family (plain, context-tree, and meta/dual-rate).
//!
//! Every model implements [`Model`], the single contract the arithmetic
//! coder drives: push `Symbol` interval(s) for an input symbol on encode,
//! and recover the symbol for a scaled position on decode.

mod bitcount;
mod cdf;
mod filtered;
mod meta;
mod order0;
mod order1;
mod sliding_window;
mod traits;

pub use bitcount::{CountingBitModel, PredictiveCountingBitModel};
pub use cdf::CdfModel;
pub use filtered::{FilteredBitModel, PredictiveFilteredBitModel};
pub use meta::MetaCdfModel;
pub use order0::Order0Model;
pub use order1::Order1Model;
pub use sliding_window::SlidingWindowModel;
pub use traits::{BufferSink, DecodeSink, Model, VecSink};
