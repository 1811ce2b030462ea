// Duplicate removal across merged sources. First occurrence wins, so
// callers pass the higher-priority source first.

use ahash::AHashSet;

use crate::chart::ChartEntry;
use crate::parser::Idea;

/// Identity of an idea: its lowercased, trimmed title.
pub fn idea_key(idea: &Idea) -> String {
    idea.title.trim().to_lowercase()
}

pub fn dedupe_ideas(ideas: Vec<Idea>) -> Vec<Idea> {
    let mut seen: AHashSet<String> = AHashSet::new();
    ideas.into_iter().filter(|i| seen.insert(idea_key(i))).collect()
}

pub fn chart_key(entry: &ChartEntry) -> String {
    format!(
        "{}|{}|{}",
        entry.date.trim(),
        entry.email.trim().to_lowercase(),
        entry.name.trim().to_lowercase()
    )
}

pub fn dedupe_chart_entries(entries: Vec<ChartEntry>) -> Vec<ChartEntry> {
    let mut seen: AHashSet<String> = AHashSet::new();
    entries.into_iter().filter(|e| seen.insert(chart_key(e))).collect()
}
