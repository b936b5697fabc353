use serde::{Deserialize, Serialize};

/// One record of source text (a line of `major|minor|text`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    /// Chapter-level index; drives the tempo gradient
    pub major: u32,
    /// Verse-level index within the chapter
    pub minor: u32,
    pub text: String,
}

/// A base letter with its attached combining marks, or a separator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// `None` for separator tokens (whitespace/punctuation)
    pub letter: Option<char>,
    /// Combining marks in source order
    pub marks: Vec<char>,
    /// Exact source span this token was built from
    pub raw: String,
}

impl Token {
    pub fn letter(letter: char) -> Self {
        Self {
            letter: Some(letter),
            marks: Vec::new(),
            raw: letter.to_string(),
        }
    }

    pub fn separator(ch: char) -> Self {
        Self {
            letter: None,
            marks: Vec::new(),
            raw: ch.to_string(),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.letter.is_none()
    }

    pub fn has_mark(&self, mark: char) -> bool {
        self.marks.contains(&mark)
    }

    /// Attach a trailing combining mark.
    pub fn push_mark(&mut self, mark: char) {
        self.marks.push(mark);
        self.raw.push(mark);
    }
}

/// Class-specific audio treatments resolved for a tone.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Effects {
    /// Stop consonant under sukun: short decaying transient
    pub percussive: bool,
    /// Nasal consonant under shadda: low-passed sub-octave overtone
    pub nasal: bool,
    /// Emphatic consonant: whole token low-passed
    pub dark: bool,
}

/// A sounded token with its resolved pitch and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToneEvent {
    pub letter: char,
    /// Frequency in Hz
    pub frequency: f64,
    /// Sounded duration in seconds
    pub sounded: f64,
    /// Silence appended after the tone (seconds)
    pub tail: f64,
    pub effects: Effects,
}

/// One step of the rendered token stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    Tone(ToneEvent),
    /// Separator rest in seconds
    Rest(f64),
}

impl Event {
    /// Total wall-clock time this event occupies.
    pub fn duration(&self) -> f64 {
        match self {
            Event::Tone(t) => t.sounded + t.tail,
            Event::Rest(d) => *d,
        }
    }
}

/// All events of one unit together with the tempo it plays at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitEvents {
    pub major: u32,
    pub minor: u32,
    pub bpm: f64,
    pub events: Vec<Event>,
}

impl UnitEvents {
    pub fn duration(&self) -> f64 {
        self.events.iter().map(Event::duration).sum()
    }
}
