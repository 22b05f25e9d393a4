// Pass/fail check deciding whether the cascade may stop
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_CHARS: usize = 200;
pub const MIN_WORDS: usize = 20;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

/// Text is usable when it is longer than [`MIN_CHARS`] characters and holds
/// more than [`MIN_WORDS`] alphabetic words of three letters or more.
///
/// The word floor rejects output that is long only because of whitespace or
/// control characters from a broken content stream.
pub fn is_sufficient(text: &str) -> bool {
    text.chars().count() > MIN_CHARS && count_words(text) > MIN_WORDS
}

pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}
