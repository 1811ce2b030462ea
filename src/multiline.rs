use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parser::{Idea, LineFormat, DEFAULT_CATEGORY};
use crate::temporal::start_of_day;

/// One Idea Generator session: the answers a user gave plus the ideas the
/// generator produced and the one they picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorEntry {
    pub date: Option<NaiveDate>,
    pub industry: Option<String>,
    pub skills: Option<String>,
    pub problem: Option<String>,
    pub customer: Option<String>,
    pub generated_ideas: Vec<String>,
    pub selected_idea: Option<String>,
    #[serde(skip)]
    pub raw: String,
}

impl GeneratorEntry {
    /// The four answers in a fixed order.
    pub fn answers(&self) -> [Option<&str>; 4] {
        [
            self.industry.as_deref(),
            self.skills.as_deref(),
            self.problem.as_deref(),
            self.customer.as_deref(),
        ]
    }

    /// Convert to an idea: titled by the selected idea, else the first
    /// generated one, else the problem. `None` when none of those exist.
    pub fn to_idea(&self) -> Option<Idea> {
        let title = self
            .selected_idea
            .clone()
            .or_else(|| self.generated_ideas.first().cloned())
            .or_else(|| self.problem.clone())?;
        let mut idea = Idea::new(title, LineFormat::Generator, &self.raw);
        idea.category = self
            .industry
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        idea.problem = self.problem.clone();
        idea.customer = self.customer.clone();
        idea.date = self.date.map(start_of_day);
        idea.refresh_keywords();
        Some(idea)
    }
}

static RE_DATE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*date:\s*(\d{4}-\d{2}-\d{2})").unwrap()
});
static RE_SELECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)selected\s+idea:\s*(.+)$").unwrap()
});
static RE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z _]*?)\s*:\s*(.*)$").unwrap()
});
static RE_LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+(.+)$").unwrap()
});

/// Accumulates Idea Generator entries spanning several lines. A line
/// starting with `Date:YYYY-MM-DD` opens a new entry, except the
/// `Date:... | Selected Idea: ...` form which completes the open one.
#[derive(Default)]
pub struct GeneratorAggregator {
    current: Option<GeneratorEntry>,
    in_idea_list: bool,
}

impl GeneratorAggregator {
    pub fn push(&mut self, line: &str) -> Option<GeneratorEntry> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(caps) = RE_DATE_MARKER.captures(trimmed) {
            if let Some(sel) = RE_SELECTED.captures(trimmed) {
                if let Some(cur) = self.current.as_mut() {
                    cur.selected_idea = non_blank(&sel[1]);
                    push_raw(cur, trimmed);
                }
                return None;
            }
            let finished = self.current.take();
            let mut entry = GeneratorEntry {
                date: NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok(),
                raw: trimmed.to_string(),
                ..Default::default()
            };
            // Single-line form: `Date:... | Industry: ... | Problem: ...`
            for segment in trimmed.split('|').skip(1) {
                apply_field(&mut entry, segment, &mut self.in_idea_list);
            }
            self.in_idea_list = false;
            self.current = Some(entry);
            return finished;
        }

        let Some(cur) = self.current.as_mut() else {
            return None;
        };
        push_raw(cur, trimmed);
        if self.in_idea_list {
            if let Some(item) = RE_LIST_ITEM.captures(trimmed) {
                if let Some(idea) = non_blank(&item[1]) {
                    cur.generated_ideas.push(idea);
                }
                return None;
            }
        }
        if !apply_field(cur, trimmed, &mut self.in_idea_list) && self.in_idea_list {
            cur.generated_ideas.push(trimmed.to_string());
        }
        None
    }

    pub fn finish(&mut self) -> Option<GeneratorEntry> {
        self.in_idea_list = false;
        self.current.take()
    }
}

fn push_raw(entry: &mut GeneratorEntry, line: &str) {
    entry.raw.push('\n');
    entry.raw.push_str(line);
}

fn non_blank(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Apply a `Key: value` line to the entry. Returns whether the key was known.
fn apply_field(entry: &mut GeneratorEntry, segment: &str, in_idea_list: &mut bool) -> bool {
    let Some(caps) = RE_FIELD.captures(segment) else {
        return false;
    };
    let key = caps[1].trim().to_lowercase().replace('_', " ");
    let value = non_blank(&caps[2]);
    match key.as_str() {
        "industry" => entry.industry = value,
        "skills" | "skill" => entry.skills = value,
        "problem" => entry.problem = value,
        "customer" | "customers" | "target customer" | "target customers" => entry.customer = value,
        "selected idea" => entry.selected_idea = value,
        "ideas" | "generated ideas" => {
            *in_idea_list = true;
            if let Some(v) = value {
                entry.generated_ideas.extend(v.split(';').filter_map(non_blank));
            }
        }
        _ => return false,
    }
    if key != "ideas" && key != "generated ideas" {
        *in_idea_list = false;
    }
    true
}

/// Parse a whole Idea Generator log into entries, in order.
pub fn parse_generator_log(text: &str) -> Vec<GeneratorEntry> {
    let mut agg = GeneratorAggregator::default();
    let mut out = Vec::new();
    for line in text.lines() {
        if let Some(e) = agg.push(line) {
            out.push(e);
        }
    }
    if let Some(e) = agg.finish() {
        out.push(e);
    }
    out
}
