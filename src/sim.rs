// Plants and signal generators for demos and closed-loop tests
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

use std::f64::consts::PI;

/// A cube of water heated by an element and cooled through its steel walls.
pub struct HeatingSystem {
    /// Water temperature in °C
    pub temperature: f64,
    /// Ambient temperature in °C
    pub room_temperature: f64,
    /// J/(g·°C)
    pub specific_heat: f64,
    /// Grams
    pub mass: f64,
    /// Heat exchange surface in m²
    pub surface: f64,
    /// W/(m²·K)
    pub heat_transfer_coeff: f64,
}

impl Default for HeatingSystem {
    /// 100 g of water in a 5 cm steel cube at 20 °C.
    fn default() -> Self {
        Self {
            temperature: 20.0,
            room_temperature: 20.0,
            specific_heat: 4.186,
            mass: 100.0,
            surface: 6.0 * 0.0025,
            heat_transfer_coeff: 11.3,
        }
    }
}

impl HeatingSystem {
    /// Advances the plant by `dt` seconds with `power` watts on the heater and returns the new
    /// temperature. Negative power is ignored; the heater cannot cool.
    pub fn step(&mut self, power: f64, dt: f64) -> f64 {
        let loss =
            self.heat_transfer_coeff * (self.temperature - self.room_temperature) * self.surface;
        let joules = dt * (power.max(0.0) - loss);
        self.temperature += joules / (self.specific_heat * self.mass);
        self.temperature
    }
}

/// A sine wave with two superimposed sinusoidal disturbances at a higher frequency.
pub struct NoisySine {
    /// Hz
    pub frequency: f64,
    /// Amplitude of the clean signal
    pub amplitude: f64,
    /// Hz
    pub noise_frequency: f64,
    /// Amplitude of each noise component
    pub noise_amplitude: f64,
}

impl Default for NoisySine {
    fn default() -> Self {
        Self {
            frequency: 10.0,
            amplitude: 1.0,
            noise_frequency: 250.0,
            noise_amplitude: 0.2,
        }
    }
}

impl NoisySine {
    /// The clean signal at time `t` seconds.
    pub fn ideal(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * t).sin()
    }

    /// The signal plus noise at `noise_frequency` and half of it.
    pub fn sample(&self, t: f64) -> f64 {
        self.ideal(t)
            + self.noise_amplitude * (2.0 * PI * self.noise_frequency * t).sin()
            + self.noise_amplitude * (2.0 * PI * 0.5 * self.noise_frequency * t).sin()
    }
}
