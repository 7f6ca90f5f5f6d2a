// Delta-form (Type-C) PID controller
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

//! The controller computes its terms as increments on the previous output:
//!
//! - `P[k] = Kp * (x[k-1] - x[k])`
//! - `I[k] = Ki * (SP - x[k])`
//! - `D[k] = Kd * (2 * x[k-1] - x[k-2] - x[k])`
//! - `y[k] = y[k-1] + P[k] + I[k] + D[k]`
//!
//! where `x` is the measured process variable and `y` is the control output.

use num_traits::float::FloatCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, reject_if, saturate, InitError, Param};
use crate::lpf::LowPassFilter;

/// Validated controller gains.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawGains<T>",
        bound(deserialize = "T: FloatCore + Deserialize<'de>")
    )
)]
pub struct Gains<T> {
    kp: T,
    ki: T,
    kd: T,
}

impl<T: FloatCore> Gains<T> {
    /// Validates and packs the proportional, integral and derivative gains.
    ///
    /// # Arguments
    /// - `kp`: Proportional gain, must be greater than zero.
    /// - `ki`: Integral gain, must be greater than zero.
    /// - `kd`: Derivative gain, must be zero or greater. A zero `kd` yields a PI controller.
    ///
    /// # Returns
    /// - `Err(InitError::FloatingPoint(_))` if any gain is NaN or infinite (`validate-float` only).
    /// - `Err(InitError::Initialization(_))` if any gain is out of range.
    pub fn new(kp: T, ki: T, kd: T) -> Result<Self, InitError> {
        ensure_finite(kp, Param::Kp)?;
        ensure_finite(ki, Param::Ki)?;
        ensure_finite(kd, Param::Kd)?;

        // Comparisons are false for NaN, so a NaN gain is only caught by the finite checks
        reject_if(kp <= T::zero(), Param::Kp)?;
        reject_if(ki <= T::zero(), Param::Ki)?;
        reject_if(kd < T::zero(), Param::Kd)?;

        Ok(Self { kp, ki, kd })
    }

    /// Derives gains from `Kp` and the integral and derivative time constants.
    ///
    /// `Ki = (Kp * Ts) / Ti` and `Kd = Kp * (Td / Ts)`.
    ///
    /// # Arguments
    /// - `kp`: Proportional gain.
    /// - `ti`: Integral time constant, must be greater than zero.
    /// - `td`: Derivative time constant, must be zero or greater.
    /// - `sample_period`: Sampling period `Ts` in the same time unit as `ti` and `td`.
    pub fn from_time_constants(kp: T, ti: T, td: T, sample_period: T) -> Result<Self, InitError> {
        let (ki, kd) = derive_gains(kp, ti, td, sample_period)?;
        Self::new(kp, ki, kd)
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> T {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> T {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> T {
        self.kd
    }
}

/// Unvalidated gains as read by a deserializer.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGains<T> {
    kp: T,
    ki: T,
    kd: T,
}

#[cfg(feature = "serde")]
impl<T: FloatCore> TryFrom<RawGains<T>> for Gains<T> {
    type Error = InitError;

    fn try_from(raw: RawGains<T>) -> Result<Self, Self::Error> {
        Self::new(raw.kp, raw.ki, raw.kd)
    }
}

fn derive_gains<T: FloatCore>(kp: T, ti: T, td: T, sample_period: T) -> Result<(T, T), InitError> {
    ensure_finite(ti, Param::IntegralTime)?;
    ensure_finite(sample_period, Param::SamplePeriod)?;

    reject_if(ti <= T::zero(), Param::IntegralTime)?;
    reject_if(td < T::zero(), Param::DerivativeTime)?;
    reject_if(sample_period <= T::zero(), Param::SamplePeriod)?;

    let ki = (kp * sample_period) / ti;
    let kd = kp * (td / sample_period);
    Ok((ki, kd))
}

fn ensure_history<T: FloatCore>(xk_1: T, xk_2: T, y_previous: T) -> Result<(), InitError> {
    ensure_finite(xk_1, Param::PrevMeasurement)?;
    ensure_finite(xk_2, Param::PrevPrevMeasurement)?;
    ensure_finite(y_previous, Param::PrevOutput)
}

/// A delta-form PID controller.
///
/// The controller holds its gains, the last two measurements and the last output. Each sample
/// tick is a two-phase operation: [`Controller::calc_pi`] or [`Controller::calc_pid`] computes
/// the terms and shifts the measurement history, returning a pending step that borrows the
/// controller; summing the step folds the terms into the output and clamps it.
///
/// ```rust
/// use delta_pid::pid::Controller;
///
/// let mut pid = Controller::init(20.0, 20.0, 0.0, 500.0, 10.0, 200.0).unwrap();
///
/// let measurement = 20.5;
/// let output = pid
///     .calc_pid(70.0, measurement)
///     .clamp_integral(-100.0, 100.0)
///     .sum(0.0, 500.0);
///
/// assert_eq!(output, pid.output());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawController<T>",
        bound(deserialize = "T: FloatCore + Deserialize<'de>")
    )
)]
pub struct Controller<T> {
    gains: Gains<T>,

    /// Measurement `x[k-1]`
    xk_1: T,

    /// Measurement `x[k-2]`, only used by the derivative term
    xk_2: T,

    /// Output `y[k-1]`, the accumulator for the next summation
    y_out: T,
}

/// Controller state as read by a deserializer. The gains are validated on their own.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: FloatCore + Deserialize<'de>"))]
struct RawController<T> {
    gains: Gains<T>,
    xk_1: T,
    xk_2: T,
    y_out: T,
}

#[cfg(feature = "serde")]
impl<T: FloatCore> TryFrom<RawController<T>> for Controller<T> {
    type Error = InitError;

    fn try_from(raw: RawController<T>) -> Result<Self, Self::Error> {
        Self::with_gains(raw.gains, raw.xk_1, raw.xk_2, raw.y_out)
    }
}

impl<T: FloatCore> Controller<T> {
    /// Initializes a controller by direct gain assignment.
    ///
    /// # Arguments
    /// - `xk_1`: The previous measurement `x[k-1]`.
    /// - `xk_2`: The measurement before that, `x[k-2]`, used by the derivative term.
    /// - `y_previous`: The previous control output `y[k-1]`.
    /// - `kp`, `ki`, `kd`: Gains, see [`Gains::new`] for their constraints.
    ///
    /// # Returns
    /// - `Err(InitError::FloatingPoint(_))` if any input is NaN or infinite (`validate-float` only).
    /// - `Err(InitError::Initialization(_))` if a gain is out of range.
    pub fn init(xk_1: T, xk_2: T, y_previous: T, kp: T, ki: T, kd: T) -> Result<Self, InitError> {
        ensure_history(xk_1, xk_2, y_previous)?;
        Self::with_gains(Gains::new(kp, ki, kd)?, xk_1, xk_2, y_previous)
    }

    /// Initializes a controller from `Kp` and the integral and derivative time constants.
    ///
    /// The time constants are validated first, then the derived gains go through
    /// [`Controller::init`]. See [`Gains::from_time_constants`] for the derivation.
    pub fn init_from_time_constants(
        xk_1: T,
        xk_2: T,
        y_previous: T,
        kp: T,
        ti: T,
        td: T,
        sample_period: T,
    ) -> Result<Self, InitError> {
        let (ki, kd) = derive_gains(kp, ti, td, sample_period)?;
        Self::init(xk_1, xk_2, y_previous, kp, ki, kd)
    }

    /// Initializes a controller with already validated gains.
    pub fn with_gains(gains: Gains<T>, xk_1: T, xk_2: T, y_previous: T) -> Result<Self, InitError> {
        ensure_history(xk_1, xk_2, y_previous)?;
        Ok(Self {
            gains,
            xk_1,
            xk_2,
            y_out: y_previous,
        })
    }

    /// Overwrites the measurement history and the output, keeping the gains.
    ///
    /// On error the controller is left unchanged.
    pub fn reset(&mut self, xk_1: T, xk_2: T, y_previous: T) -> Result<(), InitError> {
        ensure_history(xk_1, xk_2, y_previous)?;
        self.xk_1 = xk_1;
        self.xk_2 = xk_2;
        self.y_out = y_previous;
        Ok(())
    }

    /// Replaces the gains. The history and the output are kept, so the next output continues
    /// from the current one.
    pub fn set_gains(&mut self, gains: Gains<T>) {
        self.gains = gains;
    }

    /// Returns the gains.
    pub fn gains(&self) -> Gains<T> {
        self.gains
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> T {
        self.gains.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> T {
        self.gains.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> T {
        self.gains.kd
    }

    /// Returns the last measurement passed to a calculation, `x[k-1]`.
    pub fn prev_measurement(&self) -> T {
        self.xk_1
    }

    /// Returns the measurement before the last one, `x[k-2]`.
    ///
    /// Only [`Controller::calc_pid`] shifts this value.
    pub fn prev_prev_measurement(&self) -> T {
        self.xk_2
    }

    /// Returns the last control output.
    pub fn output(&self) -> T {
        self.y_out
    }

    /// Computes the P and I terms for one sample tick and shifts `x[k-1]`.
    ///
    /// # Arguments
    /// - `setpoint`: The desired value (SP).
    /// - `measurement`: The measured process variable (PV).
    ///
    /// # Returns
    /// A pending step that must be summed to update the output.
    pub fn calc_pi(&mut self, setpoint: T, measurement: T) -> PiStep<'_, T> {
        let p = self.gains.kp * (self.xk_1 - measurement);
        let i = self.gains.ki * (setpoint - measurement);

        self.xk_1 = measurement;

        PiStep {
            controller: self,
            p,
            i,
        }
    }

    /// Computes the P, I and D terms for one sample tick and shifts `x[k-2]` and `x[k-1]`.
    ///
    /// The derivative term is not filtered. Use [`PidStep::filter_derivative`] or filter the
    /// measurement beforehand if the signal is noisy.
    ///
    /// # Arguments
    /// - `setpoint`: The desired value (SP).
    /// - `measurement`: The measured process variable (PV).
    ///
    /// # Returns
    /// A pending step that must be summed to update the output.
    pub fn calc_pid(&mut self, setpoint: T, measurement: T) -> PidStep<'_, T> {
        let p_raw = self.xk_1 - measurement;
        let d = self.gains.kd * (self.xk_1 + p_raw - self.xk_2);
        let p = self.gains.kp * p_raw;
        let i = self.gains.ki * (setpoint - measurement);

        // x[k-2] must take the old x[k-1] before it is overwritten
        self.xk_2 = self.xk_1;
        self.xk_1 = measurement;

        PidStep {
            controller: self,
            p,
            i,
            d,
        }
    }

    /// `y[k] = y[k-1] + delta[k]`, then limits `y[k]` to the output bounds.
    fn accumulate(&mut self, delta: T, out_min: T, out_max: T) -> T {
        let y_prev = self.y_out;
        let mut y = y_prev + delta;

        if cfg!(feature = "validate-float") && y.is_nan() {
            y = y_prev;
        }

        self.y_out = saturate(y, out_min, out_max);
        self.y_out
    }
}

/// Pending P and I terms of a PI controller tick.
///
/// Created by [`Controller::calc_pi`]. The step holds the controller mutably borrowed until it is
/// summed or dropped. Dropping a step without summing it leaves the output unchanged, which
/// callers can use to implement a deadband on [`PiStep::delta`].
#[must_use = "the control output is only updated once the step is summed"]
#[derive(Debug)]
pub struct PiStep<'a, T> {
    controller: &'a mut Controller<T>,
    p: T,
    i: T,
}

impl<T: FloatCore> PiStep<'_, T> {
    /// Returns the proportional term `P[k]`.
    pub fn p(&self) -> T {
        self.p
    }

    /// Returns the integral term `I[k]`.
    pub fn i(&self) -> T {
        self.i
    }

    /// Returns the output increment `P[k] + I[k]`.
    pub fn delta(&self) -> T {
        self.p + self.i
    }

    /// Limits the integral term to `[i_min, i_max]` as an integrator anti-windup.
    pub fn clamp_integral(mut self, i_min: T, i_max: T) -> Self {
        self.i = saturate(self.i, i_min, i_max);
        self
    }

    /// Replaces the integral term with `f(I[k])`.
    pub fn map_integral(mut self, f: impl FnOnce(T) -> T) -> Self {
        self.i = f(self.i);
        self
    }

    /// Adds the terms to the output and limits it to `[out_min, out_max]`.
    ///
    /// With `validate-float`, a NaN result is discarded and the previous output is kept before
    /// limiting. Inverted bounds are swapped.
    ///
    /// # Returns
    /// The new control output.
    pub fn sum(self, out_min: T, out_max: T) -> T {
        let delta = self.p + self.i;
        self.controller.accumulate(delta, out_min, out_max)
    }
}

/// Pending P, I and D terms of a PID controller tick.
///
/// Created by [`Controller::calc_pid`]. See [`PiStep`] for the borrowing rules.
#[must_use = "the control output is only updated once the step is summed"]
#[derive(Debug)]
pub struct PidStep<'a, T> {
    controller: &'a mut Controller<T>,
    p: T,
    i: T,
    d: T,
}

impl<T: FloatCore> PidStep<'_, T> {
    /// Returns the proportional term `P[k]`.
    pub fn p(&self) -> T {
        self.p
    }

    /// Returns the integral term `I[k]`.
    pub fn i(&self) -> T {
        self.i
    }

    /// Returns the derivative term `D[k]`.
    pub fn d(&self) -> T {
        self.d
    }

    /// Returns the output increment `P[k] + I[k] + D[k]`.
    pub fn delta(&self) -> T {
        self.p + self.i + self.d
    }

    /// Limits the integral term to `[i_min, i_max]` as an integrator anti-windup.
    pub fn clamp_integral(mut self, i_min: T, i_max: T) -> Self {
        self.i = saturate(self.i, i_min, i_max);
        self
    }

    /// Replaces the integral term with `f(I[k])`.
    pub fn map_integral(mut self, f: impl FnOnce(T) -> T) -> Self {
        self.i = f(self.i);
        self
    }

    /// Replaces the derivative term with `f(D[k])`.
    pub fn map_derivative(mut self, f: impl FnOnce(T) -> T) -> Self {
        self.d = f(self.d);
        self
    }

    /// Passes the derivative term through a low-pass filter.
    pub fn filter_derivative(mut self, lpf: &mut LowPassFilter<T>) -> Self {
        self.d = lpf.calc(self.d);
        self
    }

    /// Adds the terms to the output and limits it to `[out_min, out_max]`.
    ///
    /// With `validate-float`, a NaN result is discarded and the previous output is kept before
    /// limiting. Inverted bounds are swapped.
    ///
    /// # Returns
    /// The new control output.
    pub fn sum(self, out_min: T, out_max: T) -> T {
        let delta = self.p + self.i + self.d;
        self.controller.accumulate(delta, out_min, out_max)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum GainSpec<T> {
    Direct { kp: T, ki: T, kd: T },
    TimeConstants { kp: T, ti: T, td: T, sample_period: T },
}

/// Builder for [`Controller`].
///
/// Defaults to a zeroed history and output with `kp = 1`, `ki = 1` and `kd = 0`.
///
/// ```rust
/// use delta_pid::pid::ControllerBuilder;
///
/// let pid = ControllerBuilder::default()
///     .history(20.0, 20.0)
///     .time_constants(10.0, 2.0, 0.5, 0.1)
///     .build()
///     .expect("Invalid controller parameters");
///
/// assert_eq!(pid.ki(), 0.5);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerBuilder<T> {
    xk_1: T,
    xk_2: T,
    y_previous: T,
    gains: GainSpec<T>,
}

impl<T: FloatCore> Default for ControllerBuilder<T> {
    fn default() -> Self {
        Self {
            xk_1: T::zero(),
            xk_2: T::zero(),
            y_previous: T::zero(),
            gains: GainSpec::Direct {
                kp: T::one(),
                ki: T::one(),
                kd: T::zero(),
            },
        }
    }
}

impl<T: FloatCore> ControllerBuilder<T> {
    /// Sets the measurement history `x[k-1]` and `x[k-2]`.
    pub fn history(mut self, xk_1: T, xk_2: T) -> Self {
        self.xk_1 = xk_1;
        self.xk_2 = xk_2;
        self
    }

    /// Sets the previous output `y[k-1]`.
    pub fn previous_output(mut self, y_previous: T) -> Self {
        self.y_previous = y_previous;
        self
    }

    /// Uses direct gains. Overrides [`ControllerBuilder::time_constants`].
    pub fn gains(mut self, kp: T, ki: T, kd: T) -> Self {
        self.gains = GainSpec::Direct { kp, ki, kd };
        self
    }

    /// Derives the gains from time constants. Overrides [`ControllerBuilder::gains`].
    pub fn time_constants(mut self, kp: T, ti: T, td: T, sample_period: T) -> Self {
        self.gains = GainSpec::TimeConstants {
            kp,
            ti,
            td,
            sample_period,
        };
        self
    }

    /// Validates the parameters and creates the controller.
    pub fn build(self) -> Result<Controller<T>, InitError> {
        match self.gains {
            GainSpec::Direct { kp, ki, kd } => {
                Controller::init(self.xk_1, self.xk_2, self.y_previous, kp, ki, kd)
            }
            GainSpec::TimeConstants {
                kp,
                ti,
                td,
                sample_period,
            } => Controller::init_from_time_constants(
                self.xk_1,
                self.xk_2,
                self.y_previous,
                kp,
                ti,
                td,
                sample_period,
            ),
        }
    }
}
