//! Per-token sounded duration and trailing rest from orthographic marks.

use serde::{Deserialize, Serialize};

use crate::text::marks;
use crate::types::Token;

/// Timing adjustments keyed by diacritic class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingRules {
    /// Duration of one plain letter (seconds)
    pub base_unit_s: f64,
    /// Madd floor, in base units
    pub madd_counts: f64,
    pub shadda_mult: f64,
    pub sukun_mult: f64,
    pub tanwin_extra_s: f64,
    /// Rest for a separator token
    pub space_rest_s: f64,
}

impl Default for TimingRules {
    fn default() -> Self {
        Self::for_tempo(84.0)
    }
}

impl TimingRules {
    /// Rules for a tempo: one letter is a third of a beat.
    pub fn for_tempo(bpm: f64) -> Self {
        let beat_s = 60.0 / bpm.max(1e-6);
        Self {
            base_unit_s: beat_s / 3.0,
            madd_counts: 4.0,
            shadda_mult: 1.6,
            sukun_mult: 0.9,
            tanwin_extra_s: 0.05,
            space_rest_s: 0.10,
        }
    }

    pub fn madd_floor(&self) -> f64 {
        self.base_unit_s * self.madd_counts
    }
}

/// Returns `(sounded, tail_silence)` for `token`, looking ahead at `next`.
pub fn estimate_duration(token: &Token, next: Option<&Token>, rules: &TimingRules) -> (f64, f64) {
    if token.is_separator() {
        return (0.0, rules.space_rest_s.max(0.0));
    }

    let mut dur = rules.base_unit_s;

    if token.has_mark(marks::SHADDA) {
        dur *= rules.shadda_mult;
    }
    if token.has_mark(marks::SUKUN) {
        dur *= rules.sukun_mult;
    }
    if marks::TANWIN.iter().any(|&m| token.has_mark(m)) {
        dur += rules.tanwin_extra_s;
    }

    if marks::LENGTHENING.iter().any(|&m| token.has_mark(m)) {
        dur = dur.max(rules.madd_floor());
    } else if lengthened_by_next(token, next) {
        dur = dur.max(rules.madd_floor());
    }

    let tail = token
        .marks
        .iter()
        .filter_map(|&m| marks::waqf_pause(m))
        .fold(0.0f64, f64::max);

    (dur.max(0.0), tail)
}

/// Short vowel followed by a long-vowel letter.
fn lengthened_by_next(token: &Token, next: Option<&Token>) -> bool {
    let next_is_long = next
        .and_then(|t| t.letter)
        .map(|l| marks::LONG_VOWEL_LETTERS.contains(&l))
        .unwrap_or(false);
    next_is_long && marks::SHORT_VOWELS.iter().any(|&m| token.has_mark(m))
}
