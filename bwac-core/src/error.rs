// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `error` module defines the common error type for the pipeline.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// `BwacError` enumerates the ways a pipeline stage can fail.
///
/// Per the design, most invariant violations (a count hitting zero, a CDF
/// going non-monotone) are unreachable by construction in a correctly wired
/// pipeline and are caught by `debug_assert!` in hot loops rather than
/// surfaced here. `Invariant` is reserved for the few checks that are cheap
/// enough to make unconditionally and that guard against a misconfigured
/// caller rather than an internal bug (e.g. a zero `scale`).
#[derive(Debug)]
pub enum BwacError {
    /// An I/O error occurred while reading the input or writing the coded
    /// stream.
    Io(io::Error),
    /// A model or coder invariant was violated (e.g. a zero-width interval).
    Invariant(&'static str),
    /// The requested configuration (alphabet size, BWT variant, ...) is not
    /// supported by this stage.
    Unsupported(&'static str),
}

impl fmt::Display for BwacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BwacError::Io(err) => write!(f, "io error: {err}"),
            BwacError::Invariant(msg) => write!(f, "invariant violated: {msg}"),
            BwacError::Unsupported(feature) => write!(f, "unsupported: {feature}"),
        }
    }
}

impl StdError for BwacError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BwacError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BwacError {
    fn from(err: io::Error) -> Self {
        BwacError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, BwacError>;

/// Convenience function to create an invariant-violation error.
pub fn invariant_error<T>(msg: &'static str) -> Result<T> {
    Err(BwacError::Invariant(msg))
}

/// Convenience function to create an unsupported-feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(BwacError::Unsupported(feature))
}
