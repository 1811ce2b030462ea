use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chart::{self, ChartEntry};
use crate::config::AnalysisConfig;
use crate::multiline::{self, GeneratorEntry};
use crate::parser::{self, Idea, LineFormat};
use crate::quality;
use crate::temporal::{lookback_dates, start_of_day};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where raw logs come from. Fetching (HTTP, blob storage, disk) lives
/// behind this seam; the analysis only ever sees text.
pub trait LogSource {
    /// Body of the named log, or `Ok(None)` when it does not exist.
    fn fetch(&self, name: &str) -> Result<Option<String>, SourceError>;
}

/// Logs laid out under a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
}

impl LogSource for DirSource {
    fn fetch(&self, name: &str) -> Result<Option<String>, SourceError> {
        match std::fs::read_to_string(self.root.join(name)) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Io { name: name.to_string(), source }),
        }
    }
}

/// In-memory logs keyed by name.
impl LogSource for BTreeMap<String, String> {
    fn fetch(&self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self.get(name).cloned())
    }
}

#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub overall: Vec<Idea>,
    pub daily: Vec<Idea>,
    pub chart: Vec<ChartEntry>,
    pub generator: Vec<GeneratorEntry>,
    pub generator_rejected: usize,
    pub daily_found: usize,
    pub daily_missing: usize,
}

enum Fetched {
    Found(String),
    Missing,
    Failed,
}

fn fetch_logged(source: &dyn LogSource, name: &str) -> Fetched {
    match source.fetch(name) {
        Ok(Some(body)) => Fetched::Found(body),
        Ok(None) => Fetched::Missing,
        Err(e) => {
            warn!(log = name, error = %e, "log unavailable, treating as empty");
            Fetched::Failed
        }
    }
}

/// Gather every input for the report on `date`. Sources are read one after
/// another; missing or unreadable logs contribute nothing and never abort.
pub fn collect_inputs(source: &dyn LogSource, date: NaiveDate, cfg: &AnalysisConfig) -> CollectedInputs {
    let mut inputs = CollectedInputs::default();
    let delay = Duration::from_millis(cfg.fetch_delay_ms);
    let pause = || {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    };

    match fetch_logged(source, &cfg.layout.overall) {
        Fetched::Found(body) => inputs.overall = parser::parse_idea_lines(&body),
        Fetched::Missing => warn!(log = %cfg.layout.overall, "overall log missing"),
        Fetched::Failed => {}
    }

    for day in lookback_dates(date, cfg.lookback_days) {
        pause();
        let name = cfg.layout.daily_name(day);
        match fetch_logged(source, &name) {
            Fetched::Found(body) => {
                let mut ideas = parser::parse_idea_lines(&body);
                // Only a JSON date field outranks the log date; dates in prose do not.
                for idea in ideas.iter_mut().filter(|i| !has_date_field(i)) {
                    idea.date = Some(start_of_day(day));
                }
                debug!(log = %name, ideas = ideas.len(), "daily log");
                inputs.daily.extend(ideas);
                inputs.daily_found += 1;
            }
            Fetched::Missing => {
                debug!(log = %name, "no daily log");
                inputs.daily_missing += 1;
            }
            Fetched::Failed => inputs.daily_missing += 1,
        }
    }

    for name in &cfg.layout.charts {
        pause();
        if let Fetched::Found(body) = fetch_logged(source, name) {
            inputs.chart.extend(chart::parse_chart_lines(&body));
        }
    }

    for name in &cfg.layout.generators {
        pause();
        if let Fetched::Found(body) = fetch_logged(source, name) {
            let (clean, rejected) = screen_generator_entries(multiline::parse_generator_log(&body));
            inputs.generator.extend(clean);
            inputs.generator_rejected += rejected;
        }
    }

    info!(
        overall = inputs.overall.len(),
        daily = inputs.daily.len(),
        days_found = inputs.daily_found,
        days_missing = inputs.daily_missing,
        chart = inputs.chart.len(),
        generator = inputs.generator.len(),
        "collected inputs"
    );
    inputs
}

/// Split generator entries into those passing the cleaning rules and a
/// count of rejected ones.
fn has_date_field(idea: &Idea) -> bool {
    idea.format == LineFormat::Json && idea.date.is_some()
}

pub fn screen_generator_entries(entries: Vec<GeneratorEntry>) -> (Vec<GeneratorEntry>, usize) {
    let mut rejected = 0;
    let clean = entries
        .into_iter()
        .filter(|e| match quality::check_entry(e) {
            Ok(()) => true,
            Err(reason) => {
                debug!(date = ?e.date, %reason, "dropping generator entry");
                rejected += 1;
                false
            }
        })
        .collect();
    (clean, rejected)
}
