use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser;

/// One scored record from a chart log: `date|email|name|score|category`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub date: String,
    #[serde(rename = "dateObj")]
    pub date_obj: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub email: String,
    pub name: String,
    pub score: i64,
    pub category: String,
    #[serde(skip)]
    pub raw: String,
}

impl ChartEntry {
    /// Sub-categories of a "/"-separated category, trimmed, empty parts dropped.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category.split('/').map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Parse one chart line. Lines with fewer than five fields or a
/// non-integer score are skipped.
pub fn parse_chart_line(line: &str) -> Option<ChartEntry> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split('|').map(str::trim).collect();
    if parts.len() < 5 {
        return None;
    }
    let score = parts[3].parse::<f64>().ok().filter(|s| s.is_finite())?.round() as i64;
    Some(ChartEntry {
        date: parts[0].to_string(),
        date_obj: parser::parse_date(parts[0]),
        email: parts[1].to_string(),
        name: parts[2].to_string(),
        score,
        category: parts[4..].join("|"),
        raw: line.to_string(),
    })
}

pub fn parse_chart_lines(text: &str) -> Vec<ChartEntry> {
    text.lines().filter_map(parse_chart_line).collect()
}
