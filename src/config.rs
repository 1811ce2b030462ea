use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a source finds its logs. `{date}` is replaced by `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    pub daily: String,
    pub overall: String,
    pub charts: Vec<String>,
    pub generators: Vec<String>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            daily: "daily/{date}.log".to_string(),
            overall: "overall.log".to_string(),
            charts: vec!["chart.log".to_string()],
            generators: vec!["idea-generator.log".to_string()],
        }
    }
}

impl SourceLayout {
    pub fn daily_name(&self, date: chrono::NaiveDate) -> String {
        self.daily.replace("{date}", &date.format("%Y-%m-%d").to_string())
    }
}

/// Every threshold the aggregations read. Passed explicitly; nothing global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_cluster_size: usize,
    pub max_clusters: usize,
    /// Fallback strategies run while fewer clusters than this exist.
    pub fallback_trigger: usize,
    pub category_fallback_min_count: usize,
    pub category_fallback_min_delta: f64,
    pub category_fallback_limit: usize,
    pub problem_fallback_min_count: usize,
    pub problem_fallback_limit: usize,
    pub heatmap_limit: usize,
    pub low_score_threshold: i64,
    pub min_problem_proxies: usize,
    pub backfill_min_count: usize,
    pub lookback_days: u32,
    pub window_days: i64,
    pub sample_size: usize,
    pub fetch_delay_ms: u64,
    pub layout: SourceLayout,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 3,
            max_clusters: 20,
            fallback_trigger: 3,
            category_fallback_min_count: 10,
            category_fallback_min_delta: 0.10,
            category_fallback_limit: 5,
            problem_fallback_min_count: 20,
            problem_fallback_limit: 3,
            heatmap_limit: 10,
            low_score_threshold: 60,
            min_problem_proxies: 5,
            backfill_min_count: 3,
            lookback_days: 30,
            window_days: 7,
            sample_size: 100,
            fetch_delay_ms: 0,
            layout: SourceLayout::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&body)
    }
}
