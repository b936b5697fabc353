//! Pulsed-carrier (isochronic) background tone.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::audio::effects::samples_for;
use crate::audio::filter::{lowpass, moving_average};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntrainmentParams {
    /// Gate rate in Hz
    pub pulse_hz: f64,
    pub carrier_hz: f64,
    /// 0 = ungated carrier, 1 = gate fully closes between pulses
    pub depth: f64,
    /// Gate smoothing window in milliseconds
    pub smooth_ms: f64,
    pub gain: f64,
}

impl Default for EntrainmentParams {
    fn default() -> Self {
        Self {
            pulse_hz: 8.0,
            carrier_hz: 180.0,
            depth: 0.88,
            smooth_ms: 10.0,
            gain: 0.22,
        }
    }
}

impl EntrainmentParams {
    pub fn cutoff_hz(&self) -> f64 {
        (self.carrier_hz * 12.0).min(8000.0)
    }
}

/// Background track of `duration_s` seconds starting at time zero.
pub fn isochronic_track(duration_s: f64, sr: u32, params: &EntrainmentParams) -> Vec<f64> {
    isochronic_chunk(0.0, duration_s, sr, params)
}

/// Background samples for `[offset_s, offset_s + duration_s)`.
///
/// Oscillator phase follows `offset_s`; gate smoothing and filter state
/// start fresh for every call.
pub fn isochronic_chunk(
    offset_s: f64,
    duration_s: f64,
    sr: u32,
    params: &EntrainmentParams,
) -> Vec<f64> {
    let n = samples_for(duration_s, sr);
    if n == 0 {
        return vec![];
    }
    let time = |i: usize| i as f64 / sr as f64 + offset_s;

    let gate: Vec<f64> = (0..n)
        .map(|i| {
            if (2.0 * PI * params.pulse_hz * time(i)).sin() > 0.0 {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    let width = ((params.smooth_ms / 1000.0) * sr as f64).max(1.0) as usize;
    let gate = moving_average(&gate, width);

    let x: Vec<f64> = gate
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let carrier = (2.0 * PI * params.carrier_hz * time(i)).sin();
            let g = (1.0 - params.depth) + params.depth * g;
            params.gain * carrier * g
        })
        .collect();

    lowpass(&x, params.cutoff_hz(), sr)
}
