//! Low-pass filtering of a noisy sine wave.
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

use delta_pid::lpf::LowPassFilter;
use delta_pid::sim::NoisySine;

// At least twice the highest noise frequency
const SAMPLE_PERIOD_S: f64 = 0.001;
const N_SAMPLES: usize = 250;
const CUTOFF_HZ: f64 = 20.0;

fn main() {
    let signal = NoisySine::default();

    let mut lpf = match LowPassFilter::from_cutoff(SAMPLE_PERIOD_S, CUTOFF_HZ, signal.sample(0.0))
    {
        Ok(lpf) => lpf,
        Err(e) => {
            eprintln!("Failed to initialize the filter: {e}");
            std::process::exit(1);
        }
    };

    println!("Time (s)\tInput(t)\tOutput(t)\tIdeal(t)");
    for i in 0..N_SAMPLES {
        let t = SAMPLE_PERIOD_S * i as f64;
        let input = signal.sample(t);
        let output = lpf.calc(input);
        println!("{t:.6}\t{input:.6}\t{output:.6}\t{:.6}", signal.ideal(t));
    }
}
