use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use tracing::debug;

use crate::categories::CategoryStat;
use crate::config::AnalysisConfig;
use crate::heatmap::ProblemBucket;
use crate::parser::Idea;
use crate::temporal::calculate_wow_change;

/// Keywords shorter than this never name a cluster.
pub const MIN_KEYWORD_LEN: usize = 3;
pub const PROBLEM_CLUSTER_NAME_LEN: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub name: String,
    pub count: usize,
    pub wow: f64,
}

/// Number of ideas carrying each clusterable keyword.
pub fn keyword_counts(ideas: &[&Idea]) -> AHashMap<String, usize> {
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for idea in ideas {
        for kw in idea.keywords.iter().filter(|k| k.chars().count() >= MIN_KEYWORD_LEN) {
            *counts.entry(kw.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Keywords shared by at least `min_size` current ideas, largest first.
pub fn keyword_clusters(current: &[&Idea], previous: &[&Idea], min_size: usize) -> Vec<Cluster> {
    let before = keyword_counts(previous);
    let mut clusters: Vec<Cluster> = keyword_counts(current)
        .into_iter()
        .filter(|(_, count)| *count >= min_size)
        .map(|(name, count)| {
            let wow = calculate_wow_change(count, before.get(&name).copied().unwrap_or(0));
            Cluster { name, count, wow }
        })
        .collect();
    clusters.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    clusters
}

/// Growing, well-populated categories as pseudo-clusters. `categories`
/// arrives sorted by count.
pub fn category_fallback(categories: &[CategoryStat], cfg: &AnalysisConfig) -> Vec<Cluster> {
    categories
        .iter()
        .filter(|c| c.count >= cfg.category_fallback_min_count && c.delta > cfg.category_fallback_min_delta)
        .take(cfg.category_fallback_limit)
        .map(|c| Cluster { name: c.name.clone(), count: c.count, wow: c.delta })
        .collect()
}

/// Heavily mentioned problems as pseudo-clusters.
pub fn problem_fallback(heatmap: &[ProblemBucket], cfg: &AnalysisConfig) -> Vec<Cluster> {
    heatmap
        .iter()
        .filter(|p| p.count >= cfg.problem_fallback_min_count)
        .take(cfg.problem_fallback_limit)
        .map(|p| Cluster {
            name: p.problem.chars().take(PROBLEM_CLUSTER_NAME_LEN).collect(),
            count: p.count,
            wow: p.delta,
        })
        .collect()
}

fn cluster_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Concatenate in priority order, keep the first cluster per name
/// (case-insensitive), then rank by count and cap. The sort is stable so
/// equal counts keep priority order.
pub fn merge_clusters(lists: Vec<Vec<Cluster>>, max: usize) -> Vec<Cluster> {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut merged: Vec<Cluster> = lists
        .into_iter()
        .flatten()
        .filter(|c| seen.insert(cluster_key(&c.name)))
        .collect();
    merged.sort_by(|a, b| b.count.cmp(&a.count));
    merged.truncate(max);
    merged
}

/// Keyword clusters first; category and then problem fallbacks only while
/// fewer than `fallback_trigger` clusters exist.
pub fn build_clusters(
    current: &[&Idea],
    previous: &[&Idea],
    categories: &[CategoryStat],
    heatmap: &[ProblemBucket],
    cfg: &AnalysisConfig,
) -> Vec<Cluster> {
    let keyword = keyword_clusters(current, previous, cfg.min_cluster_size);
    let category = if keyword.len() < cfg.fallback_trigger {
        category_fallback(categories, cfg)
    } else {
        Vec::new()
    };
    let problem = if keyword.len() + category.len() < cfg.fallback_trigger {
        problem_fallback(heatmap, cfg)
    } else {
        Vec::new()
    };
    debug!(
        keyword = keyword.len(),
        category = category.len(),
        problem = problem.len(),
        "cluster strategies"
    );
    merge_clusters(vec![keyword, category, problem], cfg.max_clusters)
}
