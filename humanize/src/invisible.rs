//! Invisible separator injection
//!
//! Inserts a zero-width code point inside some words. The word still renders
//! the same but is split in two at the code point level.

use std::borrow::Cow;

use fastrand::Rng;

use crate::rejoin_words;

/// Zero width space, word joiner, zero width non-joiner, zero width joiner
pub const INVISIBLE_SEPARATORS: [char; 4] = ['\u{200B}', '\u{2060}', '\u{200C}', '\u{200D}'];

/// Tokens at or below this many code points are left alone
pub const MIN_INJECTION_CHARS: usize = 3;

/// Chance that an eligible token receives a separator
pub const INJECTION_PROBABILITY: f64 = 0.4;

pub fn is_invisible_separator(ch: char) -> bool {
    INVISIBLE_SEPARATORS.contains(&ch)
}

/// Insert one invisible separator strictly inside `word` at a random
/// code point boundary. Words shorter than two code points are returned as is.
pub fn inject_into_word(word: &str, rng: &mut Rng) -> String {
    let len = word.chars().count();
    if len < 2 {
        return word.to_string();
    }
    let split = rng.usize(1..len);
    let separator = INVISIBLE_SEPARATORS[rng.usize(..INVISIBLE_SEPARATORS.len())];

    let byte_index = word
        .char_indices()
        .nth(split)
        .map(|(i, _)| i)
        .unwrap_or(word.len());
    let mut output = String::with_capacity(word.len() + separator.len_utf8());
    output.push_str(&word[..byte_index]);
    output.push(separator);
    output.push_str(&word[byte_index..]);
    output
}

/// Inject separators into words longer than three code points, each with
/// probability 0.4
///
/// Words are rejoined with single spaces.
pub fn inject_invisible_separators(text: &str, rng: &mut Rng) -> String {
    let mut injected = 0usize;
    let words = text.split_whitespace().map(|word| {
        if word.chars().count() > MIN_INJECTION_CHARS && rng.f64() < INJECTION_PROBABILITY {
            injected += 1;
            inject_into_word(word, rng)
        } else {
            word.to_string()
        }
    });
    let output = rejoin_words(words);

    tracing::debug!(injected, "invisible separators injected");
    output
}

/// Remove every invisible separator from `text`
///
/// Borrows the input when it contains none.
pub fn strip_invisible_separators(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_invisible_separator) {
        Cow::Owned(text.chars().filter(|&c| !is_invisible_separator(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}
