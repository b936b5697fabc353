//! Maqam-style scales and the letter → frequency map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SonifyError};

pub const BASE_HZ: f64 = 220.0;
pub const OCTAVES: u32 = 2;
pub const DEFAULT_HZ: f64 = 220.0;

/// Letters in pitch-assignment order.
pub const ALPHABET: &str = "ءأإآؤئابتثجحخدذرزسشصضطظعغفقكلمنهةويىٱ";

/// Approximate maqam presets in 12-TET semitones.
pub const PRESETS: &[(&str, [f64; 7])] = &[
    ("rast", [0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0]),
    ("bayati", [0.0, 2.0, 3.0, 5.0, 7.0, 8.0, 10.0]),
    ("hijaz", [0.0, 1.0, 4.0, 5.0, 7.0, 8.0, 11.0]),
    ("saba", [0.0, 1.0, 3.0, 5.0, 6.0, 8.0, 10.0]),
    ("nahawand", [0.0, 2.0, 3.0, 5.0, 7.0, 8.0, 10.0]),
];

/// Which interval list to build the scale from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ScaleSpec {
    Preset(String),
    Custom(Vec<f64>),
}

impl Default for ScaleSpec {
    fn default() -> Self {
        ScaleSpec::Preset("hijaz".into())
    }
}

impl ScaleSpec {
    /// A JSON list of semitones, when given, overrides the preset name.
    pub fn from_cli(maqam: &str, scale_json: Option<&str>) -> Result<Self> {
        match scale_json {
            Some(json) => parse_custom(json).map(ScaleSpec::Custom),
            None => Ok(ScaleSpec::Preset(maqam.to_string())),
        }
    }

    pub fn semitones(&self) -> Result<Vec<f64>> {
        match self {
            ScaleSpec::Preset(name) => preset(name).map(|s| s.to_vec()).ok_or_else(|| {
                let names: Vec<&str> = PRESETS.iter().map(|(n, _)| *n).collect();
                SonifyError::config(format!(
                    "unknown maqam '{}'. Choose from: {}",
                    name,
                    names.join(", ")
                ))
            }),
            ScaleSpec::Custom(semis) => {
                if semis.is_empty() {
                    return Err(SonifyError::config("custom scale must not be empty"));
                }
                if semis.iter().any(|s| !s.is_finite()) {
                    return Err(SonifyError::config("custom scale entries must be finite"));
                }
                Ok(semis.clone())
            }
        }
    }

    /// The built scale in Hz. Every note must be a finite, positive
    /// frequency.
    pub fn frequencies(&self) -> Result<Vec<f64>> {
        let scale = build_scale(BASE_HZ, &self.semitones()?, OCTAVES);
        match scale.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            Some(bad) => Err(SonifyError::config(format!(
                "scale produces an unusable frequency ({bad} Hz); keep semitone offsets within a few octaves"
            ))),
            None => Ok(scale),
        }
    }
}

fn preset(name: &str) -> Option<&'static [f64; 7]> {
    let lower = name.to_lowercase();
    PRESETS.iter().find(|(n, _)| *n == lower).map(|(_, s)| s)
}

fn parse_custom(json: &str) -> Result<Vec<f64>> {
    serde_json::from_str::<Vec<f64>>(json).map_err(|e| {
        SonifyError::config(format!(
            "--scale-json must be a JSON list of numbers (semitones): {}",
            e
        ))
    })
}

pub fn semitone_ratio(n: f64) -> f64 {
    2.0f64.powf(n / 12.0)
}

/// Repeat `semis` over `octaves` octaves above `base_hz`, then close with
/// the octave note on top.
pub fn build_scale(base_hz: f64, semis: &[f64], octaves: u32) -> Vec<f64> {
    let mut out = Vec::with_capacity(semis.len() * octaves as usize + 1);
    for o in 0..octaves {
        for &s in semis {
            out.push(base_hz * semitone_ratio(s + 12.0 * o as f64));
        }
    }
    out.push(base_hz * semitone_ratio(12.0 * octaves as f64));
    out
}

/// Deterministic letter → frequency lookup.
#[derive(Debug, Clone)]
pub struct PitchMap {
    map: HashMap<char, f64>,
    default_hz: f64,
}

impl PitchMap {
    pub fn new(scale: &[f64], default_hz: f64) -> Self {
        let map = if scale.is_empty() {
            HashMap::new()
        } else {
            ALPHABET
                .chars()
                .enumerate()
                .map(|(i, letter)| (letter, scale[i % scale.len()]))
                .collect()
        };
        Self { map, default_hz }
    }

    pub fn from_spec(spec: &ScaleSpec) -> Result<Self> {
        Ok(Self::new(&spec.frequencies()?, DEFAULT_HZ))
    }

    pub fn frequency(&self, letter: char) -> f64 {
        self.map.get(&letter).copied().unwrap_or(self.default_hz)
    }
}

/// Nearest equal-tempered MIDI note (A4 = 440 Hz = 69), clamped to 0..=127.
pub fn hz_to_midi(freq: f64) -> u8 {
    if freq <= 0.0 || !freq.is_finite() {
        return 60;
    }
    let note = 69.0 + 12.0 * (freq / 440.0).log2();
    note.round().clamp(0.0, 127.0) as u8
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_scale_shape() {
        let scale = build_scale(220.0, &[0.0, 2.0, 4.0], 2);
        assert_eq!(scale.len(), 7);
        assert!((scale[0] - 220.0).abs() < 1e-9);
        assert!((scale[3] - 440.0).abs() < 1e-9);
        assert!((scale[6] - 880.0).abs() < 1e-9);
    }

    #[test]
    fn test_preset_lookup_case_insensitive() {
        let s = ScaleSpec::Preset("HiJaZ".into()).semitones().unwrap();
        assert_eq!(s, vec![0.0, 1.0, 4.0, 5.0, 7.0, 8.0, 11.0]);
    }

    #[test]
    fn test_unknown_preset() {
        let err = ScaleSpec::Preset("foo".into()).semitones().unwrap_err();
        assert!(matches!(err, SonifyError::Config(_)));
        assert!(err.to_string().contains("'foo'"));
    }

    #[test]
    fn test_custom_json() {
        let spec = ScaleSpec::from_cli("ignored", Some("[0, 3.5, 7]")).unwrap();
        assert_eq!(spec, ScaleSpec::Custom(vec![0.0, 3.5, 7.0]));
    }

    #[test]
    fn test_custom_json_rejects_non_numeric() {
        assert!(matches!(
            ScaleSpec::from_cli("hijaz", Some("[0, \"x\"]")),
            Err(SonifyError::Config(_))
        ));
        assert!(ScaleSpec::from_cli("hijaz", Some("{\"a\": 1}")).is_err());
        assert!(ScaleSpec::Custom(vec![]).semitones().is_err());
    }

    #[test]
    fn test_pitch_map_totality() {
        let map = PitchMap::from_spec(&ScaleSpec::default()).unwrap();
        for letter in ALPHABET.chars() {
            assert!(map.frequency(letter) > 0.0);
        }
        assert_eq!(map.frequency('x'), DEFAULT_HZ);
        assert_eq!(map.frequency('ـ'), DEFAULT_HZ);
    }

    #[test]
    fn test_pitch_map_wraps() {
        let scale = build_scale(220.0, &[0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0], 2);
        let map = PitchMap::new(&scale, DEFAULT_HZ);
        let letters: Vec<char> = ALPHABET.chars().collect();
        assert!(letters.len() > scale.len());
        assert_eq!(map.frequency(letters[0]), map.frequency(letters[scale.len()]));
    }

    #[test]
    fn test_pitch_map_deterministic() {
        let a = PitchMap::from_spec(&ScaleSpec::Preset("saba".into())).unwrap();
        let b = PitchMap::from_spec(&ScaleSpec::Preset("saba".into())).unwrap();
        for letter in ALPHABET.chars() {
            assert_eq!(a.frequency(letter), b.frequency(letter));
        }
    }

    #[test]
    fn test_hz_to_midi() {
        assert_eq!(hz_to_midi(440.0), 69);
        assert_eq!(hz_to_midi(220.0), 57);
        assert_eq!(hz_to_midi(0.0), 60);
        assert_eq!(hz_to_midi(1e9), 127);
        assert_eq!(hz_to_midi(1.0), 0);
    }

    #[test]
    fn test_hz_to_midi_rounds_to_nearest() {
        // C4 and a quarter tone above it
        assert_eq!(hz_to_midi(261.63), 60);
        assert_eq!(hz_to_midi(261.63 * 2.0f64.powf(0.4 / 12.0)), 60);
        assert_eq!(hz_to_midi(261.63 * 2.0f64.powf(0.6 / 12.0)), 61);
    }

    #[test]
    fn test_frequencies_reject_overflowing_scale() {
        let err = ScaleSpec::Custom(vec![0.0, 20000.0]).frequencies().unwrap_err();
        assert!(matches!(err, SonifyError::Config(_)));
        assert!(PitchMap::from_spec(&ScaleSpec::Custom(vec![0.0, 20000.0])).is_err());

        let ok = ScaleSpec::Custom(vec![0.0, -24.0]).frequencies().unwrap();
        assert!(ok.iter().all(|f| f.is_finite() && *f > 0.0));
    }
}
