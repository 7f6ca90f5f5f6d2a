//! Closed-loop temperature control of a water heater.
//! This example requires the `--features simulation` flag to be enabled.
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

use delta_pid::pid::Controller;
use delta_pid::sim::HeatingSystem;

const KP: f64 = 500.0;
const KI: f64 = 10.0;
const KD: f64 = 200.0;

const OUTPUT_MIN_W: f64 = 0.0;
const OUTPUT_MAX_W: f64 = 500.0;

const SAMPLE_PERIOD_S: f64 = 0.1;
const SIMULATION_TIME_S: f64 = 6.0 * 60.0;

const DEADBAND: f64 = 0.0;

/// Setpoint and plant disturbances applied once the simulation clock passes a given time.
enum Event {
    ColdWater(f64),
    SetpointChange(f64),
}

static SCHEDULE: [(f64, Event); 3] = [
    (100.0, Event::ColdWater(7.0)),
    (150.0, Event::SetpointChange(7.0)),
    (220.0, Event::SetpointChange(-2.0)),
];

fn main() {
    let mut plant = HeatingSystem::default();
    let mut setpoint: f64 = 70.0;

    let mut pid = match Controller::init(plant.temperature, plant.temperature, 0.0, KP, KI, KD) {
        Ok(pid) => pid,
        Err(e) => {
            eprintln!("Failed to initialize the controller: {e}");
            std::process::exit(1);
        }
    };

    println!("Time (s)\tSystem Sensor (C)\tController Output (W)\tPID Delta");

    let mut events = SCHEDULE.iter().peekable();
    let n_steps = (SIMULATION_TIME_S / SAMPLE_PERIOD_S) as usize;
    for k in 0..=n_steps {
        let t = k as f64 * SAMPLE_PERIOD_S;

        while let Some((_, event)) = events.next_if(|(at, _)| t > *at) {
            match event {
                Event::ColdWater(cooling) => plant.temperature -= *cooling,
                Event::SetpointChange(change) => setpoint += *change,
            }
        }

        let measurement = plant.temperature;
        let step = pid.calc_pid(setpoint, measurement);
        let delta = step.delta();
        if !delta.is_finite() || delta.abs() >= DEADBAND {
            step.sum(OUTPUT_MIN_W, OUTPUT_MAX_W);
        }

        plant.step(pid.output(), SAMPLE_PERIOD_S);
        println!("{t:.2}\t{measurement:.6}\t{:.6}\t{delta:.6}", pid.output());
    }
}
