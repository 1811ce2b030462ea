use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Startup/tech vocabulary matched as plain substrings of the lowercased text.
pub const COMMON_KEYWORDS: &[&str] = &[
    "ai", "saas", "fintech", "healthtech", "ecommerce", "edtech", "proptech",
    "logistics", "energy", "pet", "fitness", "marketplace", "blockchain",
    "crypto", "analytics", "automation", "security", "climate", "food",
    "travel", "gaming", "mobile", "b2b", "creator", "agent",
];

/// Cap on positional tokens taken from a single text.
pub const MAX_RAW_TOKENS: usize = 10;

/// Four-letter words that still carry meaning in a problem statement.
const SHORT_WHITELIST: &[&str] = &[
    "cost", "price", "paid", "free", "safe", "fast", "slow", "easy", "hard",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "above", "after", "again", "against", "along", "always", "among",
        "another", "anyone", "anything", "around", "because", "before", "behind",
        "being", "below", "between", "could", "doing", "during", "either", "every",
        "everyone", "everything", "getting", "going", "having", "however", "instead",
        "itself", "little", "maybe", "might", "needs", "never", "nothing", "often",
        "other", "others", "people", "person", "please", "really", "right", "should",
        "since", "someone", "something", "sometimes", "still", "their", "theirs",
        "there", "these", "thing", "things", "think", "those", "though", "through",
        "today", "trying", "under", "until", "using", "usually", "wants", "where",
        "which", "while", "would", "without", "yourself", "making", "better",
    ]
    .into_iter()
    .collect()
});

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Keywords that drive clustering: every vocabulary term present as a
/// substring, plus the first ten tokens of three or more characters.
/// Tokens are not stop-word filtered here.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let mut out: BTreeSet<String> = COMMON_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();
    out.extend(
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= 3)
            .take(MAX_RAW_TOKENS)
            .map(str::to_string),
    );
    out
}

/// Content words of a problem statement: five or more characters or a
/// whitelisted four-letter word, minus stop words.
pub fn extract_meaningful_keywords(problem: &str) -> BTreeSet<String> {
    let lower = problem.to_lowercase();
    RE_WORD
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| {
            let len = w.chars().count();
            len >= 5 || SHORT_WHITELIST.contains(w)
        })
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_tokens_are_capped_positionally() {
        let text = "alpha bravo charlie delta echoes foxtrot golfer hotel india juliet kilo lima";
        let kws = extract_keywords(text);
        assert!(kws.contains("juliet"));
        assert!(!kws.contains("kilo"));
        assert!(!kws.contains("lima"));
    }

    #[test]
    fn stop_list_covers_generic_words() {
        assert!(STOP_WORDS.len() >= 70);
    }
}
