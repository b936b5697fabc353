//! Render everything into memory, then write one WAV file.

use std::path::{Path, PathBuf};

use crate::audio::io::write_wav;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::render::mix::{finish_mix, render_unit_with_gap, voice_for};
use crate::render::voice::Voice;
use crate::types::UnitEvents;

use super::EventSink;

pub struct FileSink {
    path: PathBuf,
    config: RenderConfig,
    voice: Voice,
    buffer: Vec<f64>,
    written: usize,
}

impl FileSink {
    /// Nothing touches the filesystem until [`EventSink::finish`].
    pub fn new(path: &Path, config: &RenderConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            config: config.clone(),
            voice: voice_for(config),
            buffer: Vec::new(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sample count of the last written file.
    pub fn written_samples(&self) -> usize {
        self.written
    }
}

impl EventSink for FileSink {
    fn consume(&mut self, unit: &UnitEvents) -> Result<()> {
        let chunk = render_unit_with_gap(unit, &self.voice, self.config.unit_gap_s);
        self.buffer.extend(chunk);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let voice = std::mem::take(&mut self.buffer);
        let mix = finish_mix(voice, &self.config);
        log::info!(
            "Writing {} samples ({:.1}s) to {}",
            mix.len(),
            mix.len() as f64 / self.config.sample_rate as f64,
            self.path.display()
        );
        write_wav(&self.path, &mix, self.config.sample_rate)?;
        self.written = mix.len();
        Ok(())
    }
}
