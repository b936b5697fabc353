//! Live playback, one unit per chunk.

use crate::audio::effects::{generate_silence, mix_into, normalize_peak};
use crate::audio::playback::AudioOutput;
use crate::config::{RenderConfig, StreamConfig};
use crate::error::Result;
use crate::render::entrainment::{isochronic_chunk, EntrainmentParams};
use crate::render::mix::voice_for;
use crate::render::voice::Voice;
use crate::types::UnitEvents;

use super::EventSink;

/// Builds per-unit chunks, carrying the background's time origin forward so
/// its oscillators stay continuous across chunks.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    voice: Voice,
    entrainment: EntrainmentParams,
    stream: StreamConfig,
    elapsed_s: f64,
}

impl ChunkBuilder {
    pub fn new(config: &RenderConfig, stream: &StreamConfig) -> Self {
        Self {
            voice: voice_for(config),
            entrainment: config.entrainment.clone(),
            stream: stream.clone(),
            elapsed_s: 0.0,
        }
    }

    /// Voice plus background for one unit, normalized to the chunk ceiling.
    pub fn build(&mut self, unit: &UnitEvents) -> Vec<f64> {
        let sr = self.voice.sample_rate;
        let mut chunk = self.voice.render_events(&unit.events);
        let dur_s = chunk.len() as f64 / sr as f64;

        let background = isochronic_chunk(self.elapsed_s, dur_s, sr, &self.entrainment);
        mix_into(&mut chunk, &background);
        self.elapsed_s += dur_s;

        normalize_peak(&mut chunk, self.stream.peak);
        chunk
    }

    pub fn gap(&self) -> Vec<f64> {
        generate_silence(self.stream.unit_gap_s, self.voice.sample_rate)
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn sample_rate(&self) -> u32 {
        self.voice.sample_rate
    }
}

/// Plays each unit as soon as it is rendered. Only one chunk is ever queued
/// on the device; `consume` blocks until it has been played.
pub struct StreamSink {
    output: AudioOutput,
    chunks: ChunkBuilder,
}

impl StreamSink {
    /// Opens the default output device immediately.
    pub fn open(config: &RenderConfig, stream: &StreamConfig) -> Result<Self> {
        let output = AudioOutput::open()?;
        log::info!("Streaming to default audio output at {} Hz", config.sample_rate);
        Ok(Self {
            output,
            chunks: ChunkBuilder::new(config, stream),
        })
    }
}

impl EventSink for StreamSink {
    fn consume(&mut self, unit: &UnitEvents) -> Result<()> {
        let sr = self.chunks.sample_rate();
        let chunk = self.chunks.build(unit);
        log::debug!(
            "Playing unit {}:{} ({:.2}s)",
            unit.major,
            unit.minor,
            chunk.len() as f64 / sr as f64
        );
        self.output.play_blocking(&chunk, sr);
        self.output.play_blocking(&self.chunks.gap(), sr);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::info!("Streamed {:.1}s of audio", self.chunks.elapsed_s());
        Ok(())
    }
}
