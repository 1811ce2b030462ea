use ahash::AHashMap;
use serde::Serialize;

use crate::chart::ChartEntry;
use crate::parser::Idea;
use crate::temporal::calculate_wow_change;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub name: String,
    pub count: usize,
    pub delta: f64,
}

/// Split a possibly multi-valued category on "/", trimmed and lowercased.
pub fn split_category(category: &str) -> Vec<String> {
    category
        .split('/')
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect()
}

pub fn count_categories<'a, I>(categories: I) -> AHashMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for category in categories {
        for sub in split_category(category) {
            *counts.entry(sub).or_insert(0) += 1;
        }
    }
    counts
}

/// Category stats for the current period with week-over-week delta against
/// the previous one. Only categories seen in the current period are listed,
/// largest first; ties by name.
pub fn category_stats(
    current: &AHashMap<String, usize>,
    previous: &AHashMap<String, usize>,
) -> Vec<CategoryStat> {
    let mut stats: Vec<CategoryStat> = current
        .iter()
        .map(|(name, &count)| CategoryStat {
            name: name.clone(),
            count,
            delta: calculate_wow_change(count, previous.get(name).copied().unwrap_or(0)),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    stats
}

pub fn chart_category_stats(current: &[&ChartEntry], previous: &[&ChartEntry]) -> Vec<CategoryStat> {
    category_stats(
        &count_categories(current.iter().map(|e| e.category.as_str())),
        &count_categories(previous.iter().map(|e| e.category.as_str())),
    )
}

pub fn idea_category_stats(current: &[&Idea], previous: &[&Idea]) -> Vec<CategoryStat> {
    category_stats(
        &count_categories(current.iter().map(|i| i.category.as_str())),
        &count_categories(previous.iter().map(|i| i.category.as_str())),
    )
}
