use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

use crate::multiline::GeneratorEntry;

const MIN_ANSWERED: usize = 3;
const MIN_TEXT_CHARS: usize = 20;
const MAX_NON_ASCII_RATIO: f64 = 0.5;
const MAX_EMOJI: usize = 10;
const MAX_SPECIAL_RATIO: f64 = 0.3;
const SPAM_MIN_WORDS: usize = 10;
const MIN_UNIQUE_WORD_RATIO: f64 = 0.3;

static RE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(none|n[/-]?a|idk|i\s*don'?t\s*know|nothing|null|nil|-+|\?+)\s*\.?\s*$").unwrap()
});

/// Why an Idea Generator entry was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("fewer than three answered fields")]
    MissingFields,
    #[error("placeholder answer")]
    PlaceholderAnswer,
    #[error("mostly non-ASCII text")]
    NonAscii,
    #[error("too many emoji")]
    EmojiFlood,
    #[error("too many special characters")]
    SpecialChars,
    #[error("text too short")]
    TooShort,
    #[error("repetitive text")]
    Repetitive,
}

fn is_emoji(c: char) -> bool {
    matches!(c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0xFE00..=0xFE0F)
}

fn is_special(c: char) -> bool {
    !(c.is_alphanumeric() || c.is_whitespace() || ".,'\"-!?:;()/&".contains(c))
}

/// Screen free text for junk: non-ASCII floods, emoji spam, symbol noise,
/// trivially short answers and repeated words.
pub fn check_text(text: &str) -> Result<(), Rejection> {
    let total = text.chars().count();
    let non_ascii = text.chars().filter(|c| !c.is_ascii()).count();
    if total > 0 && non_ascii as f64 / total as f64 > MAX_NON_ASCII_RATIO {
        return Err(Rejection::NonAscii);
    }
    if text.chars().filter(|&c| is_emoji(c)).count() > MAX_EMOJI {
        return Err(Rejection::EmojiFlood);
    }
    let special = text.chars().filter(|&c| is_special(c)).count();
    if total > 0 && special as f64 > MAX_SPECIAL_RATIO * total as f64 {
        return Err(Rejection::SpecialChars);
    }
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(Rejection::TooShort);
    }
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.len() > SPAM_MIN_WORDS {
        let unique: HashSet<&String> = words.iter().collect();
        if (unique.len() as f64) < MIN_UNIQUE_WORD_RATIO * words.len() as f64 {
            return Err(Rejection::Repetitive);
        }
    }
    Ok(())
}

/// Keep an entry only when at least three of industry, skills, problem and
/// customer are answered, none with a placeholder, and the combined answers
/// pass [`check_text`].
pub fn check_entry(entry: &GeneratorEntry) -> Result<(), Rejection> {
    let answered: Vec<&str> = entry
        .answers()
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    if answered.len() < MIN_ANSWERED {
        return Err(Rejection::MissingFields);
    }
    if answered.iter().any(|a| RE_PLACEHOLDER.is_match(a)) {
        return Err(Rejection::PlaceholderAnswer);
    }
    check_text(&answered.join(" "))
}
