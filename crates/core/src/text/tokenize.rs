//! Split text into letter-plus-diacritics tokens and separator tokens.

use crate::types::Token;

use super::marks;

/// Single forward scan over the codepoints of `text`.
///
/// A letter starts a token and swallows the diacritics that follow it. A
/// diacritic with no letter in front is attached to the previous token when
/// that token is a letter; otherwise it is dropped along with tatweel and
/// any other unclassified codepoint.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = text.chars().filter(|&c| c != marks::TATWEEL).peekable();

    while let Some(ch) = chars.next() {
        if marks::is_letter(ch) {
            let mut token = Token::letter(ch);
            while let Some(&next) = chars.peek() {
                if !marks::is_diacritic(next) {
                    break;
                }
                token.push_mark(next);
                chars.next();
            }
            tokens.push(token);
        } else if marks::is_diacritic(ch) {
            if let Some(last) = tokens.last_mut().filter(|t| !t.is_separator()) {
                last.push_mark(ch);
            }
        } else if marks::is_separator(ch) {
            tokens.push(Token::separator(ch));
        }
    }

    tokens
}
