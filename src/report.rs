use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::categories::{self, CategoryStat};
use crate::chart::ChartEntry;
use crate::clustering::{self, Cluster};
use crate::config::AnalysisConfig;
use crate::dedup;
use crate::heatmap::{self, ProblemBucket};
use crate::parser::Idea;
use crate::signal::{self, SignalScoreStats, ValidationStats};
use crate::sources::CollectedInputs;
use crate::temporal::{end_of_day, WeekWindows};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Relabels (e.g. translates) display names after aggregation. Returning
/// `None` keeps the original name.
pub trait Labeler {
    fn label(&self, text: &str) -> Option<String>;
}

impl<F> Labeler for F
where
    F: Fn(&str) -> Option<String>,
{
    fn label(&self, text: &str) -> Option<String> {
        self(text)
    }
}

/// Keeps every name as aggregated.
pub struct NoLabel;

impl Labeler for NoLabel {
    fn label(&self, _text: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    Chart,
    Ideas,
}

/// What the problem heatmap was built from. `ChartCategories` entries are
/// low-score category areas, not problems anyone stated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapSource {
    Ideas,
    ChartCategories,
    None,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub total_ideas: usize,
    pub current_week_ideas: usize,
    pub previous_week_ideas: usize,
    pub chart_entries: usize,
    pub generator_entries: usize,
    pub generator_rejected: usize,
    pub duplicates_removed: usize,
    pub daily_logs_found: usize,
    pub daily_logs_missing: usize,
    pub category_source: CategorySource,
    pub problem_heatmap_source: HeatmapSource,
}

/// One day's snapshot, the shape downstream rendering consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: String,
    pub categories: Vec<CategoryStat>,
    pub clusters: Vec<Cluster>,
    pub validation: ValidationStats,
    pub problem_heatmap: Vec<ProblemBucket>,
    pub signal_score: SignalScoreStats,
    pub ideas: Vec<Idea>,
    pub metadata: ReportMetadata,
}

/// Overall ideas first, then daily, then generator entries; duplicates by
/// title are dropped with the first occurrence kept. Returns the merged
/// ideas and how many duplicates were removed.
pub fn merge_ideas(inputs: &CollectedInputs) -> (Vec<Idea>, usize) {
    let mut all: Vec<Idea> = Vec::with_capacity(inputs.overall.len() + inputs.daily.len());
    all.extend(inputs.overall.iter().cloned());
    all.extend(inputs.daily.iter().cloned());
    all.extend(inputs.generator.iter().filter_map(|e| e.to_idea()));
    let before = all.len();
    let merged = dedup::dedupe_ideas(all);
    let removed = before - merged.len();
    (merged, removed)
}

pub fn build_report(date: NaiveDate, inputs: &CollectedInputs, cfg: &AnalysisConfig) -> DailyReport {
    build_report_with_labeler(date, inputs, cfg, &NoLabel)
}

pub fn build_report_with_labeler(
    date: NaiveDate,
    inputs: &CollectedInputs,
    cfg: &AnalysisConfig,
    labeler: &dyn Labeler,
) -> DailyReport {
    let (ideas, duplicates_removed) = merge_ideas(inputs);
    let chart: Vec<ChartEntry> = dedup::dedupe_chart_entries(inputs.chart.clone());
    let windows = WeekWindows::new(end_of_day(date), cfg.window_days);
    let (current, previous) = windows.split(&ideas, |i| i.date);
    let (chart_current, chart_previous) = windows.split(&chart, |e| e.date_obj);
    debug!(
        ideas = ideas.len(),
        current = current.len(),
        previous = previous.len(),
        duplicates_removed,
        "windowed ideas"
    );

    let (category_stats, category_source) = if chart.is_empty() {
        (categories::idea_category_stats(&current, &previous), CategorySource::Ideas)
    } else {
        (categories::chart_category_stats(&chart_current, &chart_previous), CategorySource::Chart)
    };

    let previous_problems = heatmap::problem_counts(&previous);
    let mut problem_heatmap = heatmap::build_problem_heatmap(&current, &previous_problems, cfg.heatmap_limit);
    let mut heatmap_source = HeatmapSource::Ideas;
    if problem_heatmap.is_empty() {
        if chart.is_empty() {
            heatmap_source = HeatmapSource::None;
        } else {
            problem_heatmap = heatmap::chart_problem_proxies(&chart_current, &chart_previous, cfg);
            heatmap_source = if problem_heatmap.is_empty() {
                HeatmapSource::None
            } else {
                HeatmapSource::ChartCategories
            };
        }
    }

    let mut clusters = clustering::build_clusters(&current, &previous, &category_stats, &problem_heatmap, cfg);

    for bucket in problem_heatmap.iter_mut() {
        if let Some(l) = labeler.label(&bucket.problem) {
            bucket.problem = l;
        }
    }
    for cluster in clusters.iter_mut() {
        if let Some(l) = labeler.label(&cluster.name) {
            cluster.name = l;
        }
    }

    let all_ideas: Vec<&Idea> = ideas.iter().collect();
    let signal_score = signal::signal_score_stats(&all_ideas);
    let validation = signal::validation_stats(&all_ideas);

    let mut sample: Vec<&Idea> = current.clone();
    sample.sort_by(|a, b| b.date.cmp(&a.date));
    let sample: Vec<Idea> = sample.into_iter().take(cfg.sample_size).cloned().collect();

    let report = DailyReport {
        date: date.format("%Y-%m-%d").to_string(),
        metadata: ReportMetadata {
            total_ideas: ideas.len(),
            current_week_ideas: current.len(),
            previous_week_ideas: previous.len(),
            chart_entries: chart.len(),
            generator_entries: inputs.generator.len(),
            generator_rejected: inputs.generator_rejected,
            duplicates_removed,
            daily_logs_found: inputs.daily_found,
            daily_logs_missing: inputs.daily_missing,
            category_source,
            problem_heatmap_source: heatmap_source,
        },
        categories: category_stats,
        clusters,
        validation,
        problem_heatmap,
        signal_score,
        ideas: sample,
    };
    info!(
        date = %report.date,
        categories = report.categories.len(),
        clusters = report.clusters.len(),
        problems = report.problem_heatmap.len(),
        "built daily report"
    );
    report
}

/// Write `<out_dir>/<date>.json`, replacing any earlier report for the day.
pub fn write_report(report: &DailyReport, out_dir: &Path) -> Result<PathBuf, ReportError> {
    let io_err = |path: &Path, source: std::io::Error| ReportError::Io { path: path.display().to_string(), source };
    std::fs::create_dir_all(out_dir).map_err(|e| io_err(out_dir, e))?;
    let path = out_dir.join(format!("{}.json", report.date));
    let body = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, body).map_err(|e| io_err(path.as_path(), e))?;
    Ok(path)
}
