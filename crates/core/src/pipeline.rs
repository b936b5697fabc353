//! Reader → tokenizer → (durations ∥ pitch) → events → sink.

use std::path::Path;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::pitch::scale::PitchMap;
use crate::sink::EventSink;
use crate::text::marks;
use crate::text::reader::read_units;
use crate::text::tokenize::tokenize;
use crate::timing::duration::{estimate_duration, TimingRules};
use crate::timing::tempo::TempoCurve;
use crate::types::{Effects, Event, Token, ToneEvent, Unit, UnitEvents};

/// Turns units into timed, pitched event streams.
///
/// The pitch map is built once and shared read-only by every unit.
#[derive(Debug, Clone)]
pub struct Sonifier {
    pitch: PitchMap,
    tempo: TempoCurve,
}

impl Sonifier {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            pitch: PitchMap::from_spec(&config.scale)?,
            tempo: config.tempo.clone(),
        })
    }

    pub fn pitch_map(&self) -> &PitchMap {
        &self.pitch
    }

    pub fn unit_events(&self, unit: &Unit) -> UnitEvents {
        let bpm = self.tempo.bpm_for(unit.major);
        let rules = TimingRules::for_tempo(bpm);
        let tokens = tokenize(&unit.text);

        let events = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let (sounded, tail) = estimate_duration(token, tokens.get(i + 1), &rules);
                match token.letter {
                    None => Event::Rest(tail),
                    Some(letter) => Event::Tone(ToneEvent {
                        letter,
                        frequency: self.pitch.frequency(letter),
                        sounded,
                        tail,
                        effects: effects_for(token),
                    }),
                }
            })
            .collect();

        UnitEvents {
            major: unit.major,
            minor: unit.minor,
            bpm,
            events,
        }
    }

    /// Feed every unit to `sink` in order, then finish it.
    pub fn run(&self, units: &[Unit], sink: &mut dyn EventSink) -> Result<()> {
        for unit in units {
            let events = self.unit_events(unit);
            log::debug!(
                "Unit {}:{} at {:.1} BPM, {} events",
                unit.major,
                unit.minor,
                events.bpm,
                events.events.len()
            );
            if events.events.is_empty() {
                log::warn!("Unit {}:{} has no sounding text", unit.major, unit.minor);
            }
            sink.consume(&events)?;
        }
        sink.finish()?;
        log::info!("Sonified {} units", units.len());
        Ok(())
    }
}

/// Read `path` and drive `sink`. Fails before the sink sees anything if the
/// input or configuration is invalid.
pub fn sonify_file(path: &Path, config: &RenderConfig, sink: &mut dyn EventSink) -> Result<()> {
    config.validate()?;
    let sonifier = Sonifier::new(config)?;
    let units = read_units(path)?;
    sonifier.run(&units, sink)
}

/// Phonetic-class effects for a letter token.
pub fn effects_for(token: &Token) -> Effects {
    let Some(letter) = token.letter else {
        return Effects::default();
    };
    Effects {
        percussive: marks::is_qalqalah(letter) && token.has_mark(marks::SUKUN),
        nasal: marks::is_nasal(letter) && token.has_mark(marks::SHADDA),
        dark: marks::is_emphatic(letter),
    }
}
