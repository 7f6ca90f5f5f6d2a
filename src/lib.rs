#![warn(missing_docs)]

//! # Delta-form PID Controller Library
//!
//! This library provides an allocation-free discrete PID (Proportional-Integral-Derivative)
//! controller in the delta (Type-C) form, plus a single-pole low-pass filter for taming noisy
//! terms.
//!
//! The controller expresses every term as an increment on the previous output:
//!
//! - `P[k] = Kp * (x[k-1] - x[k])`
//! - `I[k] = Ki * (SP - x[k])`
//! - `D[k] = Kd * (2 * x[k-1] - x[k-2] - x[k])`
//! - `y[k] = y[k-1] + P[k] + I[k] + D[k]`
//!
//! Because the output itself carries the accumulated history, limiting it is all the
//! anti-windup the P and D terms need.
//!
//! ## Features
//!
//! - Validated initialization, either from `Kp`/`Ki`/`Kd` or from `Kp` and the `Ti`/`Td` time
//!   constants.
//! - A two-phase tick: computing the terms returns a pending step that borrows the controller,
//!   and summing the step updates the output. Stale or mismatched terms cannot be summed.
//! - Output limiting, integrator anti-windup and NaN rollback of the output.
//! - Generic over `f32` and `f64`, `no_std`, constant time per call.
//!
//! ## Cargo features
//!
//! - `std` (default): implements `std::error::Error` for [`error::InitError`].
//! - `validate-float` (default): initializers reject NaN and infinite inputs, and summation
//!   discards NaN outputs. Disable it to trade these checks for code size.
//! - `serde`: serialization of the controller and filter state. Deserialized values are
//!   validated like the initializers' inputs.
//!
//! ## Usage
//!
//! ```rust
//! use delta_pid::lpf::LowPassFilter;
//! use delta_pid::pid::Controller;
//!
//! let mut pid = Controller::<f64>::init(20.0, 20.0, 0.0, 500.0, 10.0, 200.0)
//!     .expect("Invalid controller parameters");
//! let mut d_filter = LowPassFilter::from_cutoff(0.1, 1.0, 0.0)
//!     .expect("Invalid filter parameters");
//!
//! let setpoint = 70.0;
//! let measurement = 20.0;
//!
//! let step = pid.calc_pid(setpoint, measurement);
//! // Skip tiny corrections
//! if step.delta().abs() >= 0.01 {
//!     step.filter_derivative(&mut d_filter)
//!         .clamp_integral(-100.0, 100.0)
//!         .sum(0.0, 500.0);
//! }
//!
//! assert_eq!(pid.output(), 100.0);
//! ```
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// Initialization errors and the validation helpers shared by the controller and filter.
pub mod error;

/// The delta-form PID controller.
pub mod pid;

/// The single-pole low-pass filter.
pub mod lpf;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

pub use error::{ErrorKind, InitError, Param};
pub use lpf::LowPassFilter;
pub use pid::{Controller, ControllerBuilder, Gains, PiStep, PidStep};

/// The version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
