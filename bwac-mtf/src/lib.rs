// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Move-to-front recoding, in its plain form and its run-length-folded
//! variant, sitting between the bijective BWT and the probability models.

mod mtf;
mod mtfrl;
mod permutation;
mod streaming;

pub use mtf::{forward as mtf_forward, inverse as mtf_inverse, ALPHABET as MTF_ALPHABET};
pub use mtfrl::{
    forward as mtfrl_forward, inverse as mtfrl_inverse, ALPHABET as MTFRL_ALPHABET, ZERO_A, ZERO_B,
};
pub use streaming::{StreamingMtf, StreamingMtfRlDecoder, StreamingMtfRlEncoder};
