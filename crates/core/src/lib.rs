//! Tartil: sonify diacritic-marked Arabic text as timed, pitched tones.

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pitch;
pub mod render;
pub mod sink;
pub mod text;
pub mod timing;
pub mod types;

pub use error::{Result, SonifyError};
