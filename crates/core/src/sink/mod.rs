//! Consumers of the rendered event stream.
//!
//! Every sink receives the same per-unit [`UnitEvents`] in playback order,
//! followed by exactly one call to [`EventSink::finish`].

pub mod file;
pub mod midi;
pub mod stream;

use crate::error::Result;
use crate::types::UnitEvents;

pub use file::FileSink;
pub use midi::{list_midi_ports, MidiSink};
pub use stream::StreamSink;

pub trait EventSink {
    fn consume(&mut self, unit: &UnitEvents) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub units: Vec<UnitEvents>,
    pub finished: bool,
}

impl EventSink for CollectSink {
    fn consume(&mut self, unit: &UnitEvents) -> Result<()> {
        self.units.push(unit.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
