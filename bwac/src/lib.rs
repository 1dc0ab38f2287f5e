// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A lossless byte-stream compression pipeline built from three composable
//! stages: a bijective (or classical, sentinel-carrying) Burrows-Wheeler
//! transform, a move-to-front recoder (plain or run-length-folded), and an
//! adaptive arithmetic coder driven by a pluggable probability model.
//!
//! The three stages are implemented in [`bwac_bwt`], [`bwac_mtf`], and
//! [`bwac_arith`]/[`bwac_models`] respectively; this crate only composes
//! them, per [`PipelineConfig`], and wires the bounded-memory thread/channel
//! plumbing from [`bwac_core::chunk`] between them.
//!
//! ```
//! use bwac::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::reference());
//! let input = b"abracadabra";
//! let (coded, report) = pipeline.encode(input);
//! let (decoded, _) = pipeline.decode(&coded, input.len(), &report.sentinels);
//! assert_eq!(decoded, input);
//! ```

mod config;
mod model;
mod pipeline;
mod report;

pub use config::{BwtVariant, ModelChoice, MtfVariant, Precision, PipelineConfig};
pub use pipeline::{decode, encode, Pipeline};
pub use report::PipelineReport;
