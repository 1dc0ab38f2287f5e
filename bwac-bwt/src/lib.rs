// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Burrows-Wheeler transforms for the `bwac` pipeline: the bijective
//! (sentinel-free) variant used by the core pipeline, and a non-bijective,
//! primary-index-per-block fallback for callers that would rather carry a
//! small amount of side data than require Lyndon factorization.

mod bijective;
mod lyndon;
mod sentinel;

pub use bijective::{forward, inverse};
pub use lyndon::{factorize, Factor};
pub use sentinel::{forward as sentinel_forward, inverse as sentinel_inverse, DEFAULT_BLOCK_SIZE};
