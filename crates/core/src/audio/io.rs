//! 16-bit PCM WAV output, plus a reader for checking what was written.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{Result, SonifyError};

const PCM_SCALE: f64 = i16::MAX as f64;

fn mono_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn to_pcm(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * PCM_SCALE) as i16
}

/// Write mono samples as 16-bit PCM, clipping to [-1, 1].
///
/// Output goes to a `.part` sibling first and is renamed over `path` only
/// after the header is finalized; on failure the sibling is removed.
pub fn write_wav(path: &Path, samples: &[f64], sample_rate: u32) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SonifyError::io(dir, e))?;
    }

    let partial = partial_path(path);
    let result = write_pcm(&partial, samples, sample_rate)
        .and_then(|()| std::fs::rename(&partial, path).map_err(|e| SonifyError::io(path, e)));
    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

fn write_pcm(path: &Path, samples: &[f64], sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, mono_spec(sample_rate))?;
    {
        let mut frames = writer.get_i16_writer(samples.len() as u32);
        for &s in samples {
            frames.write_sample(to_pcm(s));
        }
        frames.flush()?;
    }
    writer.finalize()?;
    Ok(())
}

/// First channel of an integer or float WAV as f64 in [-1, 1], with its
/// sample rate.
pub fn read_wav(path: &Path) -> Result<(Vec<f64>, u32)> {
    let mut reader = WavReader::open(path)?;
    let WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format,
    } = reader.spec();
    let stride = usize::from(channels.max(1));

    let samples = match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(stride)
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let full_scale = f64::from(1u32 << (bits_per_sample - 1));
            reader
                .samples::<i32>()
                .step_by(stride)
                .map(|s| s.map(|v| f64::from(v) / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok((samples, sample_rate))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
