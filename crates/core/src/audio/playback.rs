//! Live playback on the default output device via rodio.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::error::{Result, SonifyError};

const DEVICE: &str = "audio output device";

/// An open handle on the default output device.
pub struct AudioOutput {
    // Dropping the stream closes the device
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl AudioOutput {
    /// Open the default output device. Fails eagerly if none is available.
    pub fn open() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            SonifyError::device(
                DEVICE,
                format!("{e}; connect or enable a sound output device and retry"),
            )
        })?;
        let sink = Sink::try_new(&handle).map_err(|e| {
            SonifyError::device(DEVICE, format!("{e}; the device refused a playback stream"))
        })?;
        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    /// Queue one chunk and block until the device has played it.
    pub fn play_blocking(&self, samples: &[f64], sample_rate: u32) {
        if samples.is_empty() {
            return;
        }
        self.sink.append(mono_buffer(samples, sample_rate));
        self.sink.sleep_until_end();
    }
}

/// Mono f32 buffer for the device, clipped to [-1, 1].
pub fn mono_buffer(samples: &[f64], sample_rate: u32) -> SamplesBuffer<f32> {
    let pcm: Vec<f32> = samples.iter().map(|&s| s.clamp(-1.0, 1.0) as f32).collect();
    SamplesBuffer::new(1, sample_rate, pcm)
}
