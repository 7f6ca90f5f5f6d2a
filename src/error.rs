// Errors reported by the controller and filter initializers
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

use core::fmt;

use num_traits::float::FloatCore;

/// Names the initializer argument that failed validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// The previous measurement `x[k-1]`.
    PrevMeasurement,
    /// The measurement before the previous one, `x[k-2]`.
    PrevPrevMeasurement,
    /// The previous controller output `y[k-1]`.
    PrevOutput,
    /// Proportional gain.
    Kp,
    /// Integral gain.
    Ki,
    /// Derivative gain.
    Kd,
    /// Integral time constant `Ti`.
    IntegralTime,
    /// Derivative time constant `Td`.
    DerivativeTime,
    /// Sampling period `Ts`.
    SamplePeriod,
    /// Low-pass filter smoothing factor.
    SmoothingFactor,
    /// Low-pass filter cutoff frequency.
    CutoffFrequency,
    /// Low-pass filter seed value.
    Seed,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Param::PrevMeasurement => "previous measurement x[k-1]",
            Param::PrevPrevMeasurement => "previous measurement x[k-2]",
            Param::PrevOutput => "previous output y[k-1]",
            Param::Kp => "proportional gain",
            Param::Ki => "integral gain",
            Param::Kd => "derivative gain",
            Param::IntegralTime => "integral time constant",
            Param::DerivativeTime => "derivative time constant",
            Param::SamplePeriod => "sample period",
            Param::SmoothingFactor => "smoothing factor",
            Param::CutoffFrequency => "cutoff frequency",
            Param::Seed => "filter seed",
        };
        f.write_str(name)
    }
}

/// The two failure kinds of an initializer, without the offending parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value violates its sign, range or zero constraint.
    Initialization,
    /// A value is NaN or infinite.
    FloatingPoint,
}

/// Error returned by the controller and filter initializers.
///
/// Initialization is the only place errors are reported. The per-tick calculation and
/// summation paths are infallible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum InitError {
    /// A gain, time constant or smoothing factor is out of its allowed range.
    #[cfg_attr(feature = "std", error("{0} is out of range"))]
    Initialization(Param),

    /// An input is NaN or infinite. Only reported with the `validate-float` feature.
    #[cfg_attr(feature = "std", error("{0} is not a finite number"))]
    FloatingPoint(Param),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Initialization(param) => write!(f, "{param} is out of range"),
            InitError::FloatingPoint(param) => write!(f, "{param} is not a finite number"),
        }
    }
}

impl InitError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InitError::Initialization(_) => ErrorKind::Initialization,
            InitError::FloatingPoint(_) => ErrorKind::FloatingPoint,
        }
    }

    /// Returns the parameter that failed validation.
    pub fn param(&self) -> Param {
        match *self {
            InitError::Initialization(param) | InitError::FloatingPoint(param) => param,
        }
    }
}

/// Rejects NaN and infinities. A no-op unless `validate-float` is enabled.
#[inline]
pub(crate) fn ensure_finite<T: FloatCore>(value: T, param: Param) -> Result<(), InitError> {
    if cfg!(feature = "validate-float") && !value.is_finite() {
        log::debug!("rejecting {param}: not a finite number");
        return Err(InitError::FloatingPoint(param));
    }
    Ok(())
}

/// Fails with [`InitError::Initialization`] if `invalid` holds.
#[inline]
pub(crate) fn reject_if(invalid: bool, param: Param) -> Result<(), InitError> {
    if invalid {
        log::debug!("rejecting {param}: out of range");
        return Err(InitError::Initialization(param));
    }
    Ok(())
}

/// Snaps `value` into `[lo, hi]`, reordering the bounds if they are inverted.
///
/// Unlike `clamp`, this never panics; NaN bounds leave `value` untouched on that side.
#[inline]
pub(crate) fn saturate<T: FloatCore>(value: T, lo: T, hi: T) -> T {
    let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
    if value > hi {
        hi
    } else if value < lo {
        lo
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_reorders_inverted_bounds() {
        assert_eq!(saturate(10.0, 5.0, -5.0), 5.0);
        assert_eq!(saturate(-10.0, 5.0, -5.0), -5.0);
        assert_eq!(saturate(1.0, 5.0, -5.0), 1.0);
    }

    #[test]
    fn test_saturate_snaps_to_bounds() {
        assert_eq!(saturate(515.0, 0.0, 500.0), 500.0);
        assert_eq!(saturate(-1.0_f32, 0.0, 500.0), 0.0);
        assert_eq!(saturate(250.0, 0.0, 500.0), 250.0);
    }

    #[test]
    fn test_error_kind_and_param() {
        let err = InitError::FloatingPoint(Param::Kd);
        assert_eq!(err.kind(), ErrorKind::FloatingPoint);
        assert_eq!(err.param(), Param::Kd);

        let err = InitError::Initialization(Param::SmoothingFactor);
        assert_eq!(err.kind(), ErrorKind::Initialization);
        assert_eq!(err.param(), Param::SmoothingFactor);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_error_messages() {
        use std::string::ToString;

        assert_eq!(
            InitError::Initialization(Param::Ki).to_string(),
            "integral gain is out of range"
        );
        assert_eq!(
            InitError::FloatingPoint(Param::SamplePeriod).to_string(),
            "sample period is not a finite number"
        );
    }
}
