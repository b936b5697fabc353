//! Letter, diacritic and pause-mark tables for Uthmani-script text.

use std::collections::{HashMap, HashSet};

pub const FATHA: char = '\u{064E}';
pub const DAMMA: char = '\u{064F}';
pub const KASRA: char = '\u{0650}';
pub const SUKUN: char = '\u{0652}';
pub const SHADDA: char = '\u{0651}';
pub const TANWIN_FATH: char = '\u{064B}';
pub const TANWIN_DAMM: char = '\u{064C}';
pub const TANWIN_KASR: char = '\u{064D}';
pub const MADDAH: char = '\u{0653}';
pub const DAGGER_ALIF: char = '\u{0670}';
pub const SMALL_WAW: char = '\u{06E5}';
pub const SMALL_YA: char = '\u{06E6}';
pub const TATWEEL: char = '\u{0640}';

pub const ALIF: char = '\u{0627}';
pub const WAW: char = '\u{0648}';
pub const YA: char = '\u{064A}';
pub const NOON: char = 'ن';
pub const MEEM: char = 'م';

/// Short vowels that can be prolonged by a following long-vowel letter.
pub const SHORT_VOWELS: [char; 3] = [FATHA, DAMMA, KASRA];
pub const TANWIN: [char; 3] = [TANWIN_FATH, TANWIN_DAMM, TANWIN_KASR];
/// Marks that stretch the carrying letter to the madd floor.
pub const LENGTHENING: [char; 2] = [DAGGER_ALIF, MADDAH];
/// Letters that lengthen a preceding short vowel.
pub const LONG_VOWEL_LETTERS: [char; 3] = [ALIF, WAW, YA];

/// Punctuation rendered as a rest, in addition to whitespace.
pub const PUNCTUATION: &str = "،.؛:!?\"'()[]{}«»";

lazy_static::lazy_static! {
    /// Every codepoint that attaches to a preceding letter.
    static ref DIACRITICS: HashSet<char> = {
        let mut s: HashSet<char> = [
            FATHA, DAMMA, KASRA, SUKUN, SHADDA,
            TANWIN_FATH, TANWIN_DAMM, TANWIN_KASR,
            MADDAH, DAGGER_ALIF, SMALL_WAW, SMALL_YA,
        ].into_iter().collect();
        // Qur'anic annotation marks
        s.extend((0x06D6u32..=0x06ED).filter_map(char::from_u32));
        s
    };

    /// Pause (waqf) marks and their rest in seconds.
    static ref WAQF_PAUSES: HashMap<char, f64> = {
        [
            ('\u{06D6}', 0.10),
            ('\u{06D7}', 0.12),
            ('\u{06D8}', 0.14),
            ('\u{06D9}', 0.18),
            ('\u{06DA}', 0.22),
            ('\u{06DB}', 0.28),
            ('\u{06DC}', 0.16),
        ].into_iter().collect()
    };

    /// Stop consonants that bounce under sukun (qalqalah).
    static ref QALQALAH: HashSet<char> = "قطبجد".chars().collect();

    static ref EMPHATICS: HashSet<char> = "صضطظقغخ".chars().collect();
}

pub fn is_letter(ch: char) -> bool {
    matches!(ch, '\u{0621}'..='\u{063A}' | '\u{0641}'..='\u{064A}' | '\u{0671}'..='\u{06D3}')
}

pub fn is_diacritic(ch: char) -> bool {
    DIACRITICS.contains(&ch)
}

pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || PUNCTUATION.contains(ch)
}

/// Pause duration for a waqf mark, `None` for any other codepoint.
pub fn waqf_pause(mark: char) -> Option<f64> {
    WAQF_PAUSES.get(&mark).copied()
}

pub fn is_qalqalah(letter: char) -> bool {
    QALQALAH.contains(&letter)
}

pub fn is_nasal(letter: char) -> bool {
    letter == NOON || letter == MEEM
}

pub fn is_emphatic(letter: char) -> bool {
    EMPHATICS.contains(&letter)
}
