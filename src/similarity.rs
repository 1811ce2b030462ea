use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Length of the normalized identity used for cross-period lookups.
pub const NORMALIZED_LEN: usize = 50;

/// Share of the shorter text's words that must be shared for a match.
const WORD_OVERLAP_RATIO: f64 = 0.6;

static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Lowercase, drop punctuation, collapse whitespace, keep the first 50 chars.
/// Idempotent.
pub fn normalize_problem_name(problem: &str) -> String {
    let lower = problem.to_lowercase();
    let stripped = RE_NON_WORD.replace_all(&lower, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(NORMALIZED_LEN).collect();
    truncated.trim_end().to_string()
}

/// Whether two problem strings describe the same thing: identical, one
/// containing the other (both longer than 20 chars), or sharing at least 60%
/// of the shorter one's words longer than three characters.
pub fn are_similar(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    if a_lower.chars().count() > 20
        && b_lower.chars().count() > 20
        && (a_lower.contains(&b_lower) || b_lower.contains(&a_lower))
    {
        return true;
    }
    let words_a = overlap_words(&a_lower);
    let words_b = overlap_words(&b_lower);
    let shorter = words_a.len().min(words_b.len());
    if shorter == 0 {
        return false;
    }
    let common = words_a.intersection(&words_b).count();
    let needed = (WORD_OVERLAP_RATIO * shorter as f64).ceil() as usize;
    common >= needed
}

fn overlap_words(s: &str) -> BTreeSet<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 3)
        .map(singular)
        .collect()
}

// "agents" and "agent" count as the same word.
fn singular(w: &str) -> String {
    if w.len() > 4 && w.ends_with('s') && !w.ends_with("ss") {
        w[..w.len() - 1].to_string()
    } else {
        w.to_string()
    }
}

/// Shared element count and Jaccard ratio of two keyword sets.
pub fn keyword_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> (usize, f64) {
    let common = a.intersection(b).count();
    let union = a.union(b).count();
    let ratio = if union == 0 { 0.0 } else { common as f64 / union as f64 };
    (common, ratio)
}
