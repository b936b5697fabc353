//! Token events → voice samples: sine tone, ADSR envelope, class effects.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::audio::effects::{click, concatenate, generate_silence, mix_into, samples_for, scale};
use crate::audio::filter::lowpass;
use crate::types::{Event, ToneEvent};

const CLICK_MAX_S: f64 = 0.03;
const CLICK_STRENGTH: f64 = 0.26;
const NASAL_GAIN: f64 = 0.18;
const NASAL_CUTOFF_HZ: f64 = 600.0;
const EMPHATIC_CUTOFF_HZ: f64 = 1400.0;

/// Envelope shape. Segment lengths are in seconds; sustain is a level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeParams {
    pub attack_s: f64,
    pub decay_s: f64,
    pub sustain_level: f64,
    pub release_s: f64,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack_s: 0.01,
            decay_s: 0.06,
            sustain_level: 0.70,
            release_s: 0.10,
        }
    }
}

/// Attack–decay–sustain–release envelope of exactly `n` samples.
///
/// Extra length goes to the sustain segment. When attack, decay and release
/// together exceed `n`, all three shrink proportionally and sustain is
/// empty.
pub fn adsr(n: usize, sr: u32, p: &EnvelopeParams) -> Vec<f64> {
    if n == 0 {
        return vec![];
    }
    let mut a = samples_for(p.attack_s, sr);
    let mut d = samples_for(p.decay_s, sr);
    let mut r = samples_for(p.release_s, sr);
    let total = a + d + r;
    if total > n {
        let k = n as f64 / total as f64;
        a = (a as f64 * k) as usize;
        d = (d as f64 * k) as usize;
        r = (r as f64 * k) as usize;
    }
    let s = n - (a + d + r);
    let level = p.sustain_level;

    let mut env = Vec::with_capacity(n);
    env.extend((0..a).map(|i| i as f64 / a as f64));
    env.extend((0..d).map(|i| 1.0 + (level - 1.0) * i as f64 / d as f64));
    env.extend(std::iter::repeat(level).take(s));

    // release ramps from wherever the envelope got to, down to zero
    let from = env.last().copied().unwrap_or(level);
    let release = n - env.len();
    env.extend((0..release).map(|i| {
        if release > 1 {
            from * (1.0 - i as f64 / (release - 1) as f64)
        } else {
            from
        }
    }));
    env
}

pub fn osc_sine(freq: f64, duration_s: f64, sr: u32) -> Vec<f64> {
    let n = samples_for(duration_s, sr);
    (0..n)
        .map(|i| (2.0 * PI * freq * i as f64 / sr as f64).sin())
        .collect()
}

/// Renders events into voice samples at a fixed sample rate.
#[derive(Debug, Clone)]
pub struct Voice {
    pub sample_rate: u32,
    pub envelope: EnvelopeParams,
    /// Gain applied to every tone chunk
    pub gain: f64,
}

impl Voice {
    pub fn new(sample_rate: u32, envelope: EnvelopeParams, gain: f64) -> Self {
        Self {
            sample_rate,
            envelope,
            gain,
        }
    }

    /// Tone samples followed by the tone's tail silence.
    pub fn render_tone(&self, tone: &ToneEvent) -> Vec<f64> {
        let sr = self.sample_rate;
        let mut x = osc_sine(tone.frequency, tone.sounded, sr);
        let env = adsr(x.len(), sr, &self.envelope);
        for (s, e) in x.iter_mut().zip(&env) {
            *s *= e;
        }

        if tone.effects.percussive {
            mix_into(&mut x, &click(CLICK_MAX_S.min(tone.sounded), sr, CLICK_STRENGTH));
        }
        if tone.effects.nasal {
            let mut nasal = osc_sine(tone.frequency * 0.5, tone.sounded, sr);
            scale(&mut nasal, NASAL_GAIN);
            mix_into(&mut x, &lowpass(&nasal, NASAL_CUTOFF_HZ, sr));
        }
        if tone.effects.dark {
            x = lowpass(&x, EMPHATIC_CUTOFF_HZ, sr);
        }

        x.extend(generate_silence(tone.tail, sr));
        scale(&mut x, self.gain);
        x
    }

    pub fn render_event(&self, event: &Event) -> Vec<f64> {
        match event {
            Event::Tone(tone) => self.render_tone(tone),
            Event::Rest(d) => generate_silence(*d, self.sample_rate),
        }
    }

    /// Order-preserving concatenation of every event's chunk.
    pub fn render_events(&self, events: &[Event]) -> Vec<f64> {
        let chunks: Vec<Vec<f64>> = events.iter().map(|e| self.render_event(e)).collect();
        concatenate(&chunks)
    }
}
