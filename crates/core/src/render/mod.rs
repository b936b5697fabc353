//! Waveform rendering: per-token voice, background track, final mix.

pub mod entrainment;
pub mod mix;
pub mod voice;
