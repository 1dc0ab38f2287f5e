// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `Word` trait abstracts the 16-bit and 32-bit arithmetic-coder
//! precisions so the coder, the counting models, and the CDF models are
//! written once and monomorphised per precision instead of duplicated.
//!
//! The original source (`Model`/`Model32` in `model.go`, `CDF16`/`CDF32` in
//! `cdf.go`) hand-duplicates every one of these algorithms for `uint16` and
//! `uint32`. `Word` captures exactly the handful of operations those
//! algorithms need (widening multiply/divide for interval projection, the
//! top-bit and second-top-bit masks for renormalisation, and the per-precision
//! tuning constants from the specification) so the duplication collapses into
//! one generic implementation per stage.

use std::fmt::Debug;

/// A fixed-width unsigned integer used as arithmetic-coder state.
///
/// Implemented for `u16` (the "16-bit" precision) and `u32` (the "32-bit"
/// precision).
pub trait Word: Copy + Clone + Debug + Eq + Ord + Send + Sync + 'static {
    /// A double-width unsigned integer used for intermediate products during
    /// interval projection (`u32` for `u16`, `u64` for `u32`).
    type Double: Copy + Clone + Debug;

    /// Width of `Self` in bits (16 or 32).
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    /// `2^BITS - 1`, the initial value of `high`.
    const MAX: Self;
    /// The top bit, e.g. `0x8000` for `u16`.
    const MSB: Self;
    /// The second-from-top bit, e.g. `0x4000` for `u16`.
    const SECOND_MSB: Self;
    /// `MAX_SCALE16`/`MAX_SCALE32`: the overflow ceiling for counting tables.
    const MAX_SCALE: Self;
    /// `CDF16Fixed`/`CDF32Fixed`: the fixed shift for CDF models.
    const CDF_FIXED: u32;
    /// `1 << CDF_FIXED`, the implicit total mass of a CDF model.
    const CDF_SCALE: Self;

    fn to_usize(self) -> usize;
    fn from_usize(v: usize) -> Self;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn shl(self, n: u32) -> Self;
    fn shr(self, n: u32) -> Self;
    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    fn not(self) -> Self;
    fn is_zero(self) -> bool;

    /// Zero-extend `self` into the double-width type.
    fn widen(self) -> Self::Double;
    /// Truncate a double-width value back down to `Self` (wrapping).
    fn narrow(v: Self::Double) -> Self;

    fn double_from_usize(v: usize) -> Self::Double;
    fn double_add(a: Self::Double, b: Self::Double) -> Self::Double;
    fn double_sub(a: Self::Double, b: Self::Double) -> Self::Double;
    fn double_mul(a: Self::Double, b: Self::Double) -> Self::Double;
    fn double_div(a: Self::Double, b: Self::Double) -> Self::Double;
    fn double_shr(a: Self::Double, n: u32) -> Self::Double;
    fn double_shl(a: Self::Double, n: u32) -> Self::Double;
    fn double_gt(a: Self::Double, b: Self::Double) -> bool;
}

impl Word for u16 {
    type Double = u32;

    const BITS: u32 = 16;
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const MAX: Self = 0xffff;
    const MSB: Self = 0x8000;
    const SECOND_MSB: Self = 0x4000;
    const MAX_SCALE: Self = 1 << 13;
    const CDF_FIXED: u32 = 13;
    const CDF_SCALE: Self = 1 << 13;

    #[inline(always)]
    fn to_usize(self) -> usize {
        self as usize
    }
    #[inline(always)]
    fn from_usize(v: usize) -> Self {
        v as u16
    }

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
    #[inline(always)]
    fn wrapping_sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        self << n
    }
    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        self >> n
    }
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self & rhs
    }
    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self | rhs
    }
    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        self ^ rhs
    }
    #[inline(always)]
    fn not(self) -> Self {
        !self
    }
    #[inline(always)]
    fn is_zero(self) -> bool {
        self == 0
    }

    #[inline(always)]
    fn widen(self) -> Self::Double {
        self as u32
    }
    #[inline(always)]
    fn narrow(v: Self::Double) -> Self {
        v as u16
    }

    #[inline(always)]
    fn double_from_usize(v: usize) -> Self::Double {
        v as u32
    }
    #[inline(always)]
    fn double_add(a: Self::Double, b: Self::Double) -> Self::Double {
        a + b
    }
    #[inline(always)]
    fn double_sub(a: Self::Double, b: Self::Double) -> Self::Double {
        a - b
    }
    #[inline(always)]
    fn double_mul(a: Self::Double, b: Self::Double) -> Self::Double {
        a * b
    }
    #[inline(always)]
    fn double_div(a: Self::Double, b: Self::Double) -> Self::Double {
        a / b
    }
    #[inline(always)]
    fn double_shr(a: Self::Double, n: u32) -> Self::Double {
        a >> n
    }
    #[inline(always)]
    fn double_shl(a: Self::Double, n: u32) -> Self::Double {
        a << n
    }
    #[inline(always)]
    fn double_gt(a: Self::Double, b: Self::Double) -> bool {
        a > b
    }
}

impl Word for u32 {
    type Double = u64;

    const BITS: u32 = 32;
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const MAX: Self = 0xffff_ffff;
    const MSB: Self = 0x8000_0000;
    const SECOND_MSB: Self = 0x4000_0000;
    const MAX_SCALE: Self = 1 << 29;
    const CDF_FIXED: u32 = 29;
    const CDF_SCALE: Self = 1 << 29;

    #[inline(always)]
    fn to_usize(self) -> usize {
        self as usize
    }
    #[inline(always)]
    fn from_usize(v: usize) -> Self {
        v as u32
    }

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
    #[inline(always)]
    fn wrapping_sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        self << n
    }
    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        self >> n
    }
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self & rhs
    }
    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self | rhs
    }
    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        self ^ rhs
    }
    #[inline(always)]
    fn not(self) -> Self {
        !self
    }
    #[inline(always)]
    fn is_zero(self) -> bool {
        self == 0
    }

    #[inline(always)]
    fn widen(self) -> Self::Double {
        self as u64
    }
    #[inline(always)]
    fn narrow(v: Self::Double) -> Self {
        v as u32
    }

    #[inline(always)]
    fn double_from_usize(v: usize) -> Self::Double {
        v as u64
    }
    #[inline(always)]
    fn double_add(a: Self::Double, b: Self::Double) -> Self::Double {
        a + b
    }
    #[inline(always)]
    fn double_sub(a: Self::Double, b: Self::Double) -> Self::Double {
        a - b
    }
    #[inline(always)]
    fn double_mul(a: Self::Double, b: Self::Double) -> Self::Double {
        a * b
    }
    #[inline(always)]
    fn double_div(a: Self::Double, b: Self::Double) -> Self::Double {
        a / b
    }
    #[inline(always)]
    fn double_shr(a: Self::Double, n: u32) -> Self::Double {
        a >> n
    }
    #[inline(always)]
    fn double_shl(a: Self::Double, n: u32) -> Self::Double {
        a << n
    }
    #[inline(always)]
    fn double_gt(a: Self::Double, b: Self::Double) -> bool {
        a > b
    }
}
