use ahash::AHashMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::chart::ChartEntry;
use crate::config::AnalysisConfig;
use crate::keywords::extract_meaningful_keywords;
use crate::parser::Idea;
use crate::similarity::{are_similar, keyword_overlap, normalize_problem_name};
use crate::temporal::calculate_wow_change;

pub const PROBLEM_NAME_LEN: usize = 150;
/// Problems this short or shorter carry no signal.
pub const MIN_PROBLEM_LEN: usize = 10;
pub const MAX_EXAMPLES: usize = 3;
const MIN_COMMON_KEYWORDS: usize = 2;
const MIN_KEYWORD_JACCARD: f64 = 0.5;

static RE_PAREN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*$").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemBucket {
    pub problem: String,
    pub count: usize,
    pub delta: f64,
    pub examples: Vec<String>,
}

/// A problem string with the derived forms grouping compares.
#[derive(Debug, Clone)]
pub struct ProblemCandidate {
    pub text: String,
    pub normalized: String,
    pub keywords: BTreeSet<String>,
}

impl ProblemCandidate {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            normalized: normalize_problem_name(text),
            keywords: extract_meaningful_keywords(text),
        }
    }

    fn matches(&self, other: &ProblemCandidate) -> bool {
        if are_similar(&self.normalized, &other.normalized) {
            return true;
        }
        let (common, jaccard) = keyword_overlap(&self.keywords, &other.keywords);
        common >= MIN_COMMON_KEYWORDS && jaccard >= MIN_KEYWORD_JACCARD
    }
}

/// Problem statements longer than ten characters, in idea order.
pub fn collect_problems(ideas: &[&Idea]) -> Vec<String> {
    ideas
        .iter()
        .filter_map(|i| i.problem.as_deref())
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PROBLEM_LEN)
        .map(str::to_string)
        .collect()
}

/// Greedy grouping over candidate indices. The first unvisited candidate
/// seeds a group and absorbs every later unvisited candidate that matches
/// the seed; absorbed candidates are never revisited.
pub fn group_problems(candidates: &[ProblemCandidate]) -> Vec<Vec<usize>> {
    let mut visited = vec![false; candidates.len()];
    let mut groups = Vec::new();
    for seed in 0..candidates.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut members = vec![seed];
        for other in (seed + 1)..candidates.len() {
            if !visited[other] && candidates[seed].matches(&candidates[other]) {
                visited[other] = true;
                members.push(other);
            }
        }
        groups.push(members);
    }
    groups
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Up to three distinct members, those similar to the group name first,
/// otherwise in member order.
fn select_examples(name: &str, members: &[&ProblemCandidate]) -> Vec<String> {
    let name_norm = normalize_problem_name(name);
    let (similar, rest): (Vec<&&ProblemCandidate>, Vec<&&ProblemCandidate>) =
        members.iter().partition(|c| are_similar(&c.normalized, &name_norm));
    similar
        .into_iter()
        .chain(rest)
        .unique_by(|c| c.normalized.clone())
        .take(MAX_EXAMPLES)
        .map(|c| truncate_chars(&c.text, PROBLEM_NAME_LEN))
        .collect()
}

/// Group sizes keyed by normalized group name, for delta lookups against a
/// later period.
pub fn problem_counts(ideas: &[&Idea]) -> BTreeMap<String, usize> {
    let candidates: Vec<ProblemCandidate> =
        collect_problems(ideas).iter().map(|p| ProblemCandidate::new(p)).collect();
    let mut counts = BTreeMap::new();
    for members in group_problems(&candidates) {
        let name = truncate_chars(&candidates[members[0]].text, PROBLEM_NAME_LEN);
        *counts.entry(normalize_problem_name(&name)).or_insert(0) += members.len();
    }
    counts
}

/// Ranked recurring problems from the ideas' stated problems.
pub fn build_problem_heatmap(
    ideas: &[&Idea],
    previous_counts: &BTreeMap<String, usize>,
    limit: usize,
) -> Vec<ProblemBucket> {
    let candidates: Vec<ProblemCandidate> =
        collect_problems(ideas).iter().map(|p| ProblemCandidate::new(p)).collect();
    let groups = group_problems(&candidates);
    debug!(problems = candidates.len(), groups = groups.len(), "grouped problem statements");

    let mut buckets: Vec<ProblemBucket> = groups
        .iter()
        .map(|members| {
            let name = truncate_chars(&candidates[members[0]].text, PROBLEM_NAME_LEN);
            let previous = previous_counts
                .get(&normalize_problem_name(&name))
                .copied()
                .unwrap_or(0);
            let member_refs: Vec<&ProblemCandidate> =
                members.iter().map(|&i| &candidates[i]).collect();
            ProblemBucket {
                examples: select_examples(&name, &member_refs),
                count: members.len(),
                delta: calculate_wow_change(members.len(), previous),
                problem: name,
            }
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(limit);
    buckets
}

/// Chart category with any parenthetical suffix removed, lowercased.
pub fn proxy_name(category: &str) -> String {
    RE_PAREN_SUFFIX.replace(category.trim(), "").trim().to_lowercase()
}

struct ProxyTally {
    count: usize,
    examples: Vec<String>,
}

fn tally_proxies<'a, I>(entries: I) -> AHashMap<String, ProxyTally>
where
    I: IntoIterator<Item = &'a ChartEntry>,
{
    let mut tallies: AHashMap<String, ProxyTally> = AHashMap::new();
    for entry in entries {
        for category in entry.categories() {
            let name = proxy_name(category);
            if name.is_empty() {
                continue;
            }
            let tally = tallies.entry(name).or_insert(ProxyTally { count: 0, examples: Vec::new() });
            tally.count += 1;
            let example = entry.name.trim();
            if !example.is_empty()
                && tally.examples.len() < MAX_EXAMPLES
                && !tally.examples.iter().any(|e| e == example)
            {
                tally.examples.push(example.to_string());
            }
        }
    }
    tallies
}

fn ranked(tallies: AHashMap<String, ProxyTally>) -> Vec<(String, ProxyTally)> {
    tallies
        .into_iter()
        .sorted_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

/// Problem areas inferred from chart data when no idea states a problem.
///
/// Categories of low-scoring entries stand in for problem areas: they mark
/// where submissions struggle, not problems anyone wrote down. When fewer
/// than `min_problem_proxies` areas turn up, the most frequent categories
/// overall (at least `backfill_min_count` entries) are appended until that
/// many exist. Low-score areas come first, each block ranked by count.
pub fn chart_problem_proxies(
    current: &[&ChartEntry],
    previous: &[&ChartEntry],
    cfg: &AnalysisConfig,
) -> Vec<ProblemBucket> {
    let is_low = |e: &&&ChartEntry| e.score < cfg.low_score_threshold;
    let low_now = tally_proxies(current.iter().filter(is_low).copied());
    let low_before = tally_proxies(previous.iter().filter(is_low).copied());

    let mut buckets: Vec<ProblemBucket> = ranked(low_now)
        .into_iter()
        .map(|(name, tally)| {
            let prev = low_before.get(&name).map(|t| t.count).unwrap_or(0);
            ProblemBucket {
                delta: calculate_wow_change(tally.count, prev),
                count: tally.count,
                examples: tally.examples,
                problem: name,
            }
        })
        .collect();

    if buckets.len() < cfg.min_problem_proxies {
        let all_before = tally_proxies(previous.iter().copied());
        let backfill: Vec<ProblemBucket> = ranked(tally_proxies(current.iter().copied()))
            .into_iter()
            .filter(|(name, tally)| {
                tally.count >= cfg.backfill_min_count && !buckets.iter().any(|b| &b.problem == name)
            })
            .take(cfg.min_problem_proxies - buckets.len())
            .map(|(name, tally)| {
                let prev = all_before.get(&name).map(|t| t.count).unwrap_or(0);
                ProblemBucket {
                    delta: calculate_wow_change(tally.count, prev),
                    count: tally.count,
                    examples: tally.examples,
                    problem: name,
                }
            })
            .collect();
        buckets.extend(backfill);
    }
    buckets.truncate(cfg.heatmap_limit);
    buckets
}
