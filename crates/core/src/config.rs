//! Run configuration for the three output modes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SonifyError};
use crate::pitch::scale::ScaleSpec;
use crate::render::entrainment::EntrainmentParams;
use crate::render::voice::EnvelopeParams;
use crate::timing::tempo::TempoCurve;

/// Parameters shared by every sink that turns text into sound or notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub sample_rate: u32,
    pub tempo: TempoCurve,
    pub scale: ScaleSpec,
    pub envelope: EnvelopeParams,
    pub entrainment: EntrainmentParams,
    /// Gain applied to every voice chunk before mixing
    pub voice_gain: f64,
    /// Silence between consecutive units (seconds)
    pub unit_gap_s: f64,
    /// Target absolute peak after normalization
    pub peak: f64,
    /// Embed pulse-click markers in the rendered file
    pub click_track: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            tempo: TempoCurve::default(),
            scale: ScaleSpec::default(),
            envelope: EnvelopeParams::default(),
            entrainment: EntrainmentParams::default(),
            voice_gain: 0.62,
            unit_gap_s: 0.05,
            peak: 0.98,
            click_track: false,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SonifyError::config("sample rate must be positive"));
        }
        if !(self.tempo.base_bpm.is_finite() && self.tempo.base_bpm > 0.0) {
            return Err(SonifyError::config(format!(
                "base tempo must be a positive number, got {}",
                self.tempo.base_bpm
            )));
        }
        if !self.tempo.spread.is_finite() || self.tempo.min_bpm() <= 0.0 {
            return Err(SonifyError::config(format!(
                "base tempo {} with spread {} drops to {} BPM on later units; \
                 raise the base tempo above {}",
                self.tempo.base_bpm,
                self.tempo.spread,
                self.tempo.min_bpm(),
                self.tempo.spread.abs() / 2.0
            )));
        }
        let e = &self.entrainment;
        if !(e.pulse_hz.is_finite() && e.carrier_hz.is_finite() && e.smooth_ms.is_finite()) {
            return Err(SonifyError::config(
                "entrainment pulse, carrier and smoothing must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&e.depth) {
            return Err(SonifyError::config(format!(
                "entrainment depth must be within [0, 1], got {}",
                e.depth
            )));
        }
        if !(e.pulse_hz > 0.0 && e.carrier_hz > 0.0) {
            return Err(SonifyError::config(
                "entrainment pulse and carrier frequencies must be positive",
            ));
        }
        if !(e.gain.is_finite() && e.gain >= 0.0) {
            return Err(SonifyError::config("entrainment gain must be non-negative"));
        }
        if !(self.voice_gain.is_finite() && self.voice_gain >= 0.0) {
            return Err(SonifyError::config("voice gain must be non-negative"));
        }
        if !(self.peak > 0.0 && self.peak <= 1.0) {
            return Err(SonifyError::config(format!(
                "peak ceiling must be within (0, 1], got {}",
                self.peak
            )));
        }
        // Surface scale errors before anything is rendered
        self.scale.frequencies()?;
        Ok(())
    }
}

/// Chunking for the live audio sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    pub unit_gap_s: f64,
    /// Per-chunk peak ceiling
    pub peak: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            unit_gap_s: 0.03,
            peak: 0.9,
        }
    }
}

/// Symbolic (MIDI) output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidiConfig {
    pub channel: u8,
    pub velocity: u8,
    /// Emit 24-ppqn clock pulses for hardware sync
    pub send_clock: bool,
    /// Rest after every unit (seconds)
    pub unit_rest_s: f64,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            velocity: 80,
            send_clock: false,
            unit_rest_s: 0.08,
        }
    }
}

impl MidiConfig {
    pub fn new(channel: u8, velocity: u8, send_clock: bool) -> Result<Self> {
        if channel > 15 {
            return Err(SonifyError::config(format!(
                "MIDI channel must be 0-15, got {channel}"
            )));
        }
        Ok(Self {
            channel,
            velocity: velocity.clamp(1, 127),
            send_clock,
            ..Self::default()
        })
    }
}
