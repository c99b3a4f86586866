//! Sample and accumulator types for energy computation
//!
//! Squares are summed in an accumulator wide enough for the sample encoding:
//! - `i16` PCM accumulates in `i64` (exact)
//! - `i32` PCM (8/24/32-bit) accumulates in `i128` (exact)
//! - `f32`/`f64` PCM accumulates in `f64`

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// Accumulator type for sums of squared samples
pub trait Energy:
    Copy + PartialOrd + Debug + Send + Sync + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    /// Additive identity
    const ZERO: Self;

    /// `true` when add/subtract never loses precision
    const EXACT: bool;

    /// Convert a threshold into this accumulator
    ///
    /// Integer accumulators round up, so `energy >= threshold` in integer
    /// space matches `energy as f64 >= value`.
    fn from_threshold(value: f64) -> Self;

    /// Lossy conversion for reporting
    fn to_f64(self) -> f64;

    /// Accumulator value for a count (used as a divisor)
    fn from_count(count: usize) -> Self;

    /// Division; integer accumulators floor
    fn div_by(self, divisor: Self) -> Self;
}

impl Energy for i64 {
    const ZERO: Self = 0;
    const EXACT: bool = true;

    fn from_threshold(value: f64) -> Self {
        value.ceil() as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_count(count: usize) -> Self {
        count as i64
    }

    fn div_by(self, divisor: Self) -> Self {
        self / divisor
    }
}

impl Energy for i128 {
    const ZERO: Self = 0;
    const EXACT: bool = true;

    fn from_threshold(value: f64) -> Self {
        value.ceil() as i128
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_count(count: usize) -> Self {
        count as i128
    }

    fn div_by(self, divisor: Self) -> Self {
        self / divisor
    }
}

impl Energy for f64 {
    const ZERO: Self = 0.0;
    const EXACT: bool = false;

    fn from_threshold(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_count(count: usize) -> Self {
        count as f64
    }

    fn div_by(self, divisor: Self) -> Self {
        self / divisor
    }
}

/// A PCM sample that can be squared into an [`Energy`] accumulator
pub trait EnergySample: Copy + Send + Sync {
    /// Accumulator used for this encoding
    type Energy: Energy;

    /// Sample value widened into the accumulator
    fn widen(self) -> Self::Energy;

    /// Squared sample value in the accumulator
    fn square(self) -> Self::Energy {
        let v = self.widen();
        v * v
    }
}

impl EnergySample for i16 {
    type Energy = i64;

    fn widen(self) -> i64 {
        self as i64
    }
}

impl EnergySample for i32 {
    type Energy = i128;

    fn widen(self) -> i128 {
        self as i128
    }
}

impl EnergySample for f32 {
    type Energy = f64;

    fn widen(self) -> f64 {
        self as f64
    }
}

impl EnergySample for f64 {
    type Energy = f64;

    fn widen(self) -> f64 {
        self
    }
}
