//! Symbolic note output to a MIDI port, paced in real time, with optional
//! MIDI clock for hardware sync.

use std::time::{Duration, Instant};

use midir::{MidiOutput, MidiOutputConnection};
use midly::live::{LiveEvent, SystemRealtime};
use midly::num::{u4, u7};
use midly::MidiMessage;

use crate::config::MidiConfig;
use crate::error::{Result, SonifyError};
use crate::pitch::scale::hz_to_midi;
use crate::types::{Event, ToneEvent, UnitEvents};

use super::EventSink;

const CLIENT_NAME: &str = "tartil";
const CLOCKS_PER_BEAT: f64 = 24.0;
const NASAL_VELOCITY: f64 = 0.75;
const NASAL_STRETCH: f64 = 1.10;
const RESTRIKE_VELOCITY: f64 = 0.6;
const RESTRIKE_MAX_S: f64 = 0.06;
const MIN_ACCENT_VELOCITY: u8 = 20;

/// Anything that accepts raw MIDI messages.
pub trait MidiOut {
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

/// Time source used to pace events.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin; never decreases.
    fn now(&self) -> f64;

    fn sleep(&mut self, secs: f64);
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, secs: f64) {
        if secs > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(secs));
        }
    }
}

/// A connected midir output port.
pub struct MidirPort {
    conn: MidiOutputConnection,
}

impl MidirPort {
    pub fn open(port_name: &str) -> Result<Self> {
        let output = midi_output()?;
        let ports = output.ports();
        let port = ports
            .iter()
            .find(|p| output.port_name(p).map(|n| n == port_name).unwrap_or(false))
            .ok_or_else(|| {
                let available: Vec<String> =
                    ports.iter().filter_map(|p| output.port_name(p).ok()).collect();
                SonifyError::device(
                    format!("MIDI output port '{port_name}'"),
                    format!(
                        "choose one of the available ports: [{}]",
                        available.join(", ")
                    ),
                )
            })?
            .clone();

        let conn = output.connect(&port, CLIENT_NAME).map_err(|e| {
            SonifyError::device(
                format!("MIDI output port '{port_name}'"),
                format!("{e}; close other programs using the port and retry"),
            )
        })?;
        log::info!("Connected to MIDI output '{}'", port_name);
        Ok(Self { conn })
    }
}

impl MidiOut for MidirPort {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.conn
            .send(message)
            .map_err(|e| SonifyError::Midi(e.to_string()))
    }
}

fn midi_output() -> Result<MidiOutput> {
    MidiOutput::new(CLIENT_NAME).map_err(|e| {
        SonifyError::device(
            "MIDI subsystem",
            format!("{e}; install or start the platform MIDI service"),
        )
    })
}

/// Names of every MIDI output port currently available.
pub fn list_midi_ports() -> Result<Vec<String>> {
    let output = midi_output()?;
    Ok(output
        .ports()
        .iter()
        .filter_map(|p| output.port_name(p).ok())
        .collect())
}

fn encode(event: LiveEvent) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3);
    // Writing into a Vec cannot fail
    let _ = event.write_std(&mut buf);
    buf
}

/// Turns tone events into note-on/note-off pairs at wall-clock pace.
///
/// Waits are scheduled against a running timeline rather than slept one
/// after another, so rounding in individual sleeps does not accumulate.
pub struct MidiSink<O: MidiOut, C: Clock> {
    out: O,
    clock: C,
    config: MidiConfig,
    /// Timeline position reached so far
    cursor: f64,
    next_tick: f64,
    clock_running: bool,
}

impl MidiSink<MidirPort, SystemClock> {
    /// Connect to `port_name`. Fails eagerly if the port cannot be opened.
    pub fn open(port_name: &str, config: &MidiConfig) -> Result<Self> {
        let port = MidirPort::open(port_name)?;
        Ok(Self::new(port, SystemClock::new(), config))
    }
}

impl<O: MidiOut, C: Clock> MidiSink<O, C> {
    pub fn new(out: O, clock: C, config: &MidiConfig) -> Self {
        let cursor = clock.now();
        Self {
            out,
            clock,
            config: config.clone(),
            cursor,
            next_tick: cursor,
            clock_running: false,
        }
    }

    pub fn into_parts(self) -> (O, C) {
        (self.out, self.clock)
    }

    fn channel(&self) -> u4 {
        u4::new(self.config.channel & 0x0F)
    }

    fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        let msg = encode(LiveEvent::Midi {
            channel: self.channel(),
            message: MidiMessage::NoteOn {
                key: u7::new(note.min(127)),
                vel: u7::new(velocity.min(127)),
            },
        });
        self.out.send(&msg)
    }

    fn note_off(&mut self, note: u8) -> Result<()> {
        let msg = encode(LiveEvent::Midi {
            channel: self.channel(),
            message: MidiMessage::NoteOff {
                key: u7::new(note.min(127)),
                vel: u7::new(0),
            },
        });
        self.out.send(&msg)
    }

    fn realtime(&mut self, event: SystemRealtime) -> Result<()> {
        self.out.send(&encode(LiveEvent::Realtime(event)))
    }

    fn sleep_until(&mut self, t: f64) {
        let remaining = t - self.clock.now();
        if remaining > 0.0 {
            self.clock.sleep(remaining);
        }
    }

    /// Advance the timeline by `dur`, emitting clock pulses on the way when
    /// enabled.
    fn wait(&mut self, dur: f64, bpm: f64) -> Result<()> {
        let target = self.cursor + dur.max(0.0);
        if self.config.send_clock {
            if !self.clock_running {
                self.realtime(SystemRealtime::Start)?;
                self.clock_running = true;
                self.next_tick = self.cursor;
            }
            let interval = (60.0 / bpm.max(1e-6)) / CLOCKS_PER_BEAT;
            while self.next_tick < target {
                self.sleep_until(self.next_tick);
                self.realtime(SystemRealtime::TimingClock)?;
                self.next_tick += interval;
            }
        }
        self.sleep_until(target);
        self.cursor = target;
        Ok(())
    }

    fn play_tone(&mut self, tone: &ToneEvent, bpm: f64) -> Result<()> {
        let note = hz_to_midi(tone.frequency);
        let mut velocity = self.config.velocity.clamp(1, 127);
        let mut dur = tone.sounded;

        if tone.effects.nasal {
            velocity = MIN_ACCENT_VELOCITY.max((velocity as f64 * NASAL_VELOCITY) as u8);
            dur *= NASAL_STRETCH;
        }

        self.note_on(note, velocity)?;
        self.wait(dur, bpm)?;
        self.note_off(note)?;

        if tone.effects.percussive {
            let restrike = MIN_ACCENT_VELOCITY.max((velocity as f64 * RESTRIKE_VELOCITY) as u8);
            self.note_on(note, restrike)?;
            self.wait(RESTRIKE_MAX_S.min(dur * 0.25), bpm)?;
            self.note_off(note)?;
        }

        if tone.tail > 0.0 {
            self.wait(tone.tail, bpm)?;
        }
        Ok(())
    }
}

impl<O: MidiOut, C: Clock> EventSink for MidiSink<O, C> {
    fn consume(&mut self, unit: &UnitEvents) -> Result<()> {
        for event in &unit.events {
            match event {
                Event::Tone(tone) => self.play_tone(tone, unit.bpm)?,
                Event::Rest(d) => self.wait(*d, unit.bpm)?,
            }
        }
        self.wait(self.config.unit_rest_s, unit.bpm)
    }

    fn finish(&mut self) -> Result<()> {
        if self.clock_running {
            self.realtime(SystemRealtime::Stop)?;
            self.clock_running = false;
        }
        Ok(())
    }
}
