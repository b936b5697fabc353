//! Sample-buffer primitives, filters, WAV I/O and device playback.

pub mod effects;
pub mod filter;
pub mod io;
pub mod playback;
