// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! What a [`crate::Pipeline`] run reports back to the caller once it
//! completes, the results half of the §6.1 options/results split.

/// Summary of a completed encode or decode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Bytes fed into the stage that ran (the plaintext for an encode, the
    /// coded stream for a decode).
    pub bytes_in: usize,
    /// Bytes produced (the coded stream for an encode, the plaintext for a
    /// decode).
    pub bytes_out: usize,
    /// Number of symbols the arithmetic coder processed.
    pub symbols_coded: usize,
    /// Primary-index side data the non-bijective BWT produced on encode, or
    /// consumed on decode. Empty for the bijective variant.
    pub sentinels: Vec<usize>,
    /// `Some(true)` if `PipelineConfig::verify` was set and every invariant
    /// check passed; `None` if verification was not requested. `verify`
    /// never changes `bytes_out` (§8, "Toggling Verify... must produce
    /// identical coded output") — it only gates whether this field is
    /// populated.
    pub verified: Option<bool>,
}
