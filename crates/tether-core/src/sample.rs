//! Sample type abstraction for f32/f64 audio buffers.
//!
//! The player routes device audio at single precision and may hand the
//! processor a double precision copy. Everything that moves samples between
//! the two goes through [`Sample`], so conversion code is written once and
//! monomorphized per direction.

use std::fmt::Debug;

/// Trait for audio sample types (f32, f64).
///
/// Only conversion and the zero value are needed here: the player copies,
/// zero-fills and converts samples but never does DSP on them.
pub trait Sample: Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Silence.
    const ZERO: Self;

    /// Convert from f64.
    fn from_f64(value: f64) -> Self;

    /// Convert to f64.
    fn to_f64(self) -> f64;

    /// Convert from any other sample type.
    ///
    /// Goes through f64, which is lossless for both directions we care about
    /// (f32 -> f64 is exact, f64 -> f32 rounds once).
    #[inline(always)]
    fn from_sample<T: Sample>(value: T) -> Self {
        Self::from_f64(value.to_f64())
    }
}

impl Sample for f32 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
}
