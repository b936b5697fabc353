//! Error taxonomy shared by every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SonifyError {
    /// A non-blank input line that does not match the record pattern.
    #[error("line {line} is not in '{expected}' format")]
    Format { line: usize, expected: &'static str },

    #[error("no records found in {}", path.display())]
    EmptyInput { path: PathBuf },

    #[error("configuration error: {0}")]
    Config(String),

    /// A live audio device or MIDI port is missing or cannot be opened.
    /// `hint` says what to do about it and is reported separately.
    #[error("{device} unavailable")]
    DeviceUnavailable { device: String, hint: String },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("MIDI send failed: {0}")]
    Midi(String),
}

impl SonifyError {
    pub fn config(msg: impl Into<String>) -> Self {
        SonifyError::Config(msg.into())
    }

    pub fn device(device: impl Into<String>, hint: impl Into<String>) -> Self {
        SonifyError::DeviceUnavailable {
            device: device.into(),
            hint: hint.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SonifyError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the input file or parameters rather than
    /// the runtime environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SonifyError::Format { .. } | SonifyError::EmptyInput { .. } | SonifyError::Config(_)
        )
    }

    /// Remediation hint, present only for environment-dependent failures.
    pub fn remediation(&self) -> Option<&str> {
        match self {
            SonifyError::DeviceUnavailable { hint, .. } => Some(hint),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SonifyError>;
