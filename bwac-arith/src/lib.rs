// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptive arithmetic coding over a pluggable [`bwac_models::Model`].
//!
//! [`Encoder`] and [`Decoder`] implement the renormalisation loop shared by
//! every probability model: narrow a `(low, high)` range by a `Symbol`
//! interval, emit or consume bits whenever the range's top bit settles or a
//! straddle forces an underflow bit to be deferred. Bit-level framing is
//! abstracted behind [`BitSink`]/[`BitSource`] so the same coder logic can
//! target a packed byte stream or an unpacked one-bit-per-byte stream.

pub mod coder;
pub mod decoder;
pub mod encoder;

pub use coder::{BitSink, BitSource, PackedSink, PackedSource, UnpackedSink, UnpackedSource};
pub use decoder::Decoder;
pub use encoder::Encoder;
