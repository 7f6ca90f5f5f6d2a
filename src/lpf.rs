// Single-pole low-pass filter
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use num_traits::float::{FloatConst, FloatCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, reject_if, InitError, Param};

/// Exponential moving average, `y[k] = y[k-1] + a * (x[k] - y[k-1])`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawLowPassFilter<T>",
        bound(deserialize = "T: FloatCore + Deserialize<'de>")
    )
)]
pub struct LowPassFilter<T> {
    smoothing_factor: T,
    y: T,
}

/// Filter state as read by a deserializer.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLowPassFilter<T> {
    smoothing_factor: T,
    y: T,
}

#[cfg(feature = "serde")]
impl<T: FloatCore> TryFrom<RawLowPassFilter<T>> for LowPassFilter<T> {
    type Error = InitError;

    /// Restores a filter mid-stream: `y` is the last filtered value, not a seed.
    fn try_from(raw: RawLowPassFilter<T>) -> Result<Self, Self::Error> {
        ensure_finite(raw.smoothing_factor, Param::SmoothingFactor)?;
        ensure_finite(raw.y, Param::Seed)?;
        ensure_range(raw.smoothing_factor)?;
        Ok(Self {
            smoothing_factor: raw.smoothing_factor,
            y: raw.y,
        })
    }
}

/// `0 < a < 1`, which also rejects NaN.
fn ensure_range<T: FloatCore>(smoothing_factor: T) -> Result<(), InitError> {
    let in_range = smoothing_factor > T::zero() && smoothing_factor < T::one();
    reject_if(!in_range, Param::SmoothingFactor)
}

impl<T: FloatCore> LowPassFilter<T> {
    /// Creates a filter seeded with `x0`.
    ///
    /// The stored value starts at `smoothing_factor * x0`, i.e. the seed has already gone through
    /// one smoothing step from zero.
    ///
    /// # Arguments
    /// - `smoothing_factor`: Weight of the newest sample, strictly between zero and one.
    /// - `x0`: The seed value.
    pub fn new(smoothing_factor: T, x0: T) -> Result<Self, InitError> {
        ensure_finite(smoothing_factor, Param::SmoothingFactor)?;
        ensure_finite(x0, Param::Seed)?;
        ensure_range(smoothing_factor)?;

        Ok(Self {
            smoothing_factor,
            y: smoothing_factor * x0,
        })
    }

    /// Creates a filter from the sampling period and the desired cutoff frequency.
    ///
    /// See [`smoothing_factor`] for the mapping.
    pub fn from_cutoff(sample_period: T, cutoff_hz: T, x0: T) -> Result<Self, InitError>
    where
        T: FloatConst,
    {
        Self::new(smoothing_factor(sample_period, cutoff_hz)?, x0)
    }

    /// Feeds one sample and returns the filtered value.
    pub fn calc(&mut self, input: T) -> T {
        self.y = self.y + self.smoothing_factor * (input - self.y);
        self.y
    }

    /// Returns the last filtered value.
    pub fn value(&self) -> T {
        self.y
    }

    /// Returns the smoothing factor.
    pub fn smoothing_factor(&self) -> T {
        self.smoothing_factor
    }
}

/// Maps a sampling period and a cutoff frequency to a smoothing factor:
/// `a = 2π·Δt·fc / (2π·Δt·fc + 1)`.
///
/// # Arguments
/// - `sample_period`: Sampling period in seconds, must be greater than zero.
/// - `cutoff_hz`: Cutoff frequency in hertz, must be greater than zero.
pub fn smoothing_factor<T: FloatCore + FloatConst>(
    sample_period: T,
    cutoff_hz: T,
) -> Result<T, InitError> {
    ensure_finite(sample_period, Param::SamplePeriod)?;
    ensure_finite(cutoff_hz, Param::CutoffFrequency)?;
    reject_if(sample_period <= T::zero(), Param::SamplePeriod)?;
    reject_if(cutoff_hz <= T::zero(), Param::CutoffFrequency)?;

    let omega_dt = T::TAU() * sample_period * cutoff_hz;
    Ok(omega_dt / (omega_dt + T::one()))
}
