//! IIR low-pass filtering and moving-average smoothing.

use std::f64::consts::PI;

pub trait Filter {
    fn process(&mut self, x: f64) -> f64;

    fn process_buffer(&mut self, samples: &mut [f64]) {
        for s in samples.iter_mut() {
            *s = self.process(*s);
        }
    }
}

/// Second-order section, direct form I, RBJ cookbook coefficients.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    pub fn lowpass(cutoff: f64, sr: u32, q: f64) -> Self {
        let w0 = 2.0 * PI * cutoff / sr as f64;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }
}

impl Filter for Biquad {
    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// 4th-order Butterworth low-pass as two cascaded biquads.
#[derive(Debug, Clone, Copy)]
pub struct ButterworthLowpass {
    stages: [Biquad; 2],
}

impl ButterworthLowpass {
    pub fn new(cutoff: f64, sr: u32) -> Self {
        let nyquist = 0.5 * sr as f64;
        // keep the normalized cutoff strictly inside (0, 1)
        let cutoff = (cutoff / nyquist).clamp(1e-6, 0.99) * nyquist;
        let q1 = 1.0 / (2.0 * (PI / 8.0).cos());
        let q2 = 1.0 / (2.0 * (3.0 * PI / 8.0).cos());
        Self {
            stages: [Biquad::lowpass(cutoff, sr, q1), Biquad::lowpass(cutoff, sr, q2)],
        }
    }
}

impl Filter for ButterworthLowpass {
    fn process(&mut self, x: f64) -> f64 {
        let y = self.stages[0].process(x);
        self.stages[1].process(y)
    }
}

/// Low-pass a whole buffer from a zero initial state.
pub fn lowpass(samples: &[f64], cutoff: f64, sr: u32) -> Vec<f64> {
    let mut out = samples.to_vec();
    ButterworthLowpass::new(cutoff, sr).process_buffer(&mut out);
    out
}

/// Centered moving average with zero padding; output length equals input.
pub fn moving_average(samples: &[f64], width: usize) -> Vec<f64> {
    if width <= 1 || samples.is_empty() {
        return samples.to_vec();
    }
    let mut prefix = Vec::with_capacity(samples.len() + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &s in samples {
        acc += s;
        prefix.push(acc);
    }

    let half = (width - 1) / 2;
    let n = samples.len();
    (0..n)
        .map(|i| {
            let hi = (i + half + 1).min(n);
            let lo = (i + half + 1).saturating_sub(width);
            (prefix[hi] - prefix[lo]) / width as f64
        })
        .collect()
}
