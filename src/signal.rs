use serde::Serialize;

use crate::parser::{Idea, DEFAULT_CATEGORY};

pub const MAX_SIGNAL_SCORE: u32 = 100;

const COMPETITOR_TERMS: &[&str] = &["competitor", "alternative", "vs", "like", "similar to", "instead of"];
const TRACTION_TERMS: &[&str] = &["mvp", "launched", "paying"];
const MVP_TERMS: &[&str] = &["mvp", "minimum viable product", "prototype"];
const PAYING_TERMS: &[&str] = &["paying", "revenue", "paying customers", "mrr", "arr"];
const LAUNCHED_TERMS: &[&str] = &["launched", "live", "public"];

/// Which scoring rules an idea satisfies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleHits {
    pub clear_problem: bool,
    pub described_problem: bool,
    pub named_competitor: bool,
    pub concise_description: bool,
    pub moderate_description: bool,
    pub specific_category: bool,
    pub has_keywords: bool,
    pub traction: bool,
}

impl RuleHits {
    pub fn score(&self) -> u32 {
        let mut score = 0;
        if self.clear_problem {
            score += 30;
        } else if self.described_problem {
            score += 15;
        }
        if self.named_competitor {
            score += 20;
        }
        if self.concise_description {
            score += 20;
        } else if self.moderate_description {
            score += 10;
        }
        if self.specific_category {
            score += 10;
        }
        if self.has_keywords {
            score += 10;
        }
        if self.traction {
            score += 10;
        }
        score.min(MAX_SIGNAL_SCORE)
    }
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| haystack.contains(t))
}

/// Lowercased title, description and problem.
fn combined_text(idea: &Idea) -> String {
    let mut text = idea.text();
    if let Some(p) = idea.problem.as_deref() {
        text.push(' ');
        text.push_str(p);
    }
    text.to_lowercase()
}

fn status_or_text_contains(idea: &Idea, text: &str, terms: &[&str]) -> bool {
    let status = idea.status.as_deref().unwrap_or("").to_lowercase();
    contains_any(&status, terms) || contains_any(text, terms)
}

pub fn evaluate_rules(idea: &Idea) -> RuleHits {
    let desc_len = idea.description.as_deref().map(|d| d.chars().count()).unwrap_or(0);
    let problem_len = idea.problem.as_deref().map(|p| p.chars().count()).unwrap_or(0);
    let title_desc = idea.text().to_lowercase();
    let category = idea.category.trim();
    RuleHits {
        clear_problem: problem_len > 10,
        described_problem: desc_len > 50,
        named_competitor: contains_any(&title_desc, COMPETITOR_TERMS),
        concise_description: desc_len > 0 && desc_len < 200,
        moderate_description: (200..500).contains(&desc_len),
        specific_category: !category.is_empty() && !category.eq_ignore_ascii_case(DEFAULT_CATEGORY),
        has_keywords: !idea.keywords.is_empty(),
        traction: status_or_text_contains(idea, &title_desc, TRACTION_TERMS),
    }
}

/// Rule-based 0-100 signal score of one idea.
pub fn signal_score(idea: &Idea) -> u32 {
    evaluate_rules(idea).score()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePassRates {
    pub clear_problem: u32,
    pub named_competitor: u32,
    pub concise_description: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalScoreStats {
    pub average: u32,
    pub top_decile: u32,
    pub rules: RulePassRates,
}

fn percent(hits: usize, total: usize) -> u32 {
    if total == 0 { 0 } else { ((hits as f64 / total as f64) * 100.0).round() as u32 }
}

/// Average score, the score at rank `floor(n * 0.1)` of the descending
/// scores, and per-rule pass rates (percent).
pub fn signal_score_stats(ideas: &[&Idea]) -> SignalScoreStats {
    if ideas.is_empty() {
        return SignalScoreStats::default();
    }
    let hits: Vec<RuleHits> = ideas.iter().map(|i| evaluate_rules(i)).collect();
    let mut scores: Vec<u32> = hits.iter().map(RuleHits::score).collect();
    scores.sort_unstable_by(|a, b| b.cmp(a));
    let n = scores.len();
    let sum: u64 = scores.iter().map(|&s| s as u64).sum();
    let top_index = ((n as f64) * 0.1).floor() as usize;
    SignalScoreStats {
        average: (sum as f64 / n as f64).round() as u32,
        top_decile: scores[top_index.min(n - 1)],
        rules: RulePassRates {
            clear_problem: percent(hits.iter().filter(|h| h.clear_problem).count(), n),
            named_competitor: percent(hits.iter().filter(|h| h.named_competitor).count(), n),
            concise_description: percent(hits.iter().filter(|h| h.concise_description).count(), n),
        },
    }
}

/// Fractions of ideas showing each lifecycle signal. Not exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationStats {
    pub mvp: f64,
    pub paying: f64,
    pub mrr: f64,
    pub launched: f64,
}

pub fn validation_stats(ideas: &[&Idea]) -> ValidationStats {
    if ideas.is_empty() {
        return ValidationStats::default();
    }
    let mut mvp = 0usize;
    let mut paying = 0usize;
    let mut launched = 0usize;
    for idea in ideas {
        let text = combined_text(idea);
        if status_or_text_contains(idea, &text, MVP_TERMS) {
            mvp += 1;
        }
        if status_or_text_contains(idea, &text, PAYING_TERMS) {
            paying += 1;
        }
        if status_or_text_contains(idea, &text, LAUNCHED_TERMS) {
            launched += 1;
        }
    }
    let n = ideas.len() as f64;
    let paying = paying as f64 / n;
    ValidationStats {
        mvp: mvp as f64 / n,
        paying,
        mrr: paying,
        launched: launched as f64 / n,
    }
}
