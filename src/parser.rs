use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::keywords;

pub const DEFAULT_CATEGORY: &str = "general";

/// Which parser in the chain produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineFormat {
    Json,
    PipeNamed,
    Pipe,
    Tab,
    Csv,
    Text,
    Generator,
}

#[derive(Debug, Clone, Serialize)]
pub struct Idea {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub problem: Option<String>,
    pub keywords: BTreeSet<String>,
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub format: LineFormat,
    #[serde(skip)]
    pub raw: String,
}

impl Idea {
    pub fn new(title: impl Into<String>, format: LineFormat, raw: &str) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: DEFAULT_CATEGORY.to_string(),
            problem: None,
            keywords: BTreeSet::new(),
            date: None,
            status: None,
            email: None,
            customer: None,
            format,
            raw: raw.to_string(),
        }
    }

    /// Title and description joined, the text keyword and signal rules look at.
    pub fn text(&self) -> String {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => format!("{} {}", self.title, d),
            _ => self.title.clone(),
        }
    }

    /// Recompute the derived keyword set from title and description.
    pub fn refresh_keywords(&mut self) {
        self.keywords = keywords::extract_keywords(&self.text());
    }
}

const TITLE_KEYS: &[&str] = &["title", "startup_idea", "idea", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "details", "summary"];
const CATEGORY_KEYS: &[&str] = &["category", "industry", "sector"];
const PROBLEM_KEYS: &[&str] = &["problem", "problem_to_solve", "pain_point"];
const DATE_KEYS: &[&str] = &["date", "created_at", "createdAt", "timestamp", "time"];
const STATUS_KEYS: &[&str] = &["status", "stage"];
const EMAIL_KEYS: &[&str] = &["email", "Email"];
const CUSTOMER_KEYS: &[&str] = &["target_customers", "customer", "customers"];

static RE_STARTUP_IDEA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)startup_idea:\s*([^|]*)").unwrap());
static RE_PROBLEM_TO_SOLVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)problem_to_solve:\s*([^|]*)").unwrap());
static RE_TARGET_CUSTOMERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)target_customers:\s*([^|]*)").unwrap());
static RE_EMAIL_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bemail:\s*([^|]*)").unwrap());
static RE_CATEGORY_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcategory:\s*([^|]*)").unwrap());

// A csv category cell: short, starts with a letter, no sentence punctuation.
static RE_CATEGORY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9 &/()+_-]{0,39}$").unwrap()
});

static RE_PROBLEM_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bproblem\s*:\s*([^|.!?\n]+)").unwrap()
});

static RE_PAIN_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(struggl\w*|hard to|difficult to|frustrat\w*|pain point|problem is|tired of)\b").unwrap()
});

static RE_DATE_IN_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?(?:Z|[+-]\d{2}:?\d{2})?)?\b").unwrap()
});

/// Parse one raw idea-log line. Formats are tried in a fixed order and the
/// first that accepts the line wins: JSON, named pipe fields, positional
/// pipe, tab, csv, plain text. Only blank lines yield `None`.
pub fn parse_idea_line(line: &str) -> Option<Idea> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut idea = try_parse_json(trimmed)
        .or_else(|| try_parse_pipe_named(trimmed))
        .or_else(|| try_parse_pipe_simple(trimmed))
        .or_else(|| try_parse_tab(trimmed))
        .or_else(|| try_parse_csv(trimmed))
        .unwrap_or_else(|| parse_plain_text(trimmed));
    if idea.format != LineFormat::Json && idea.date.is_none() {
        idea.date = detect_date_in_text(trimmed);
    }
    idea.refresh_keywords();
    Some(idea)
}

/// Parse every line of a log body, preserving line order.
pub fn parse_idea_lines(text: &str) -> Vec<Idea> {
    let lines: Vec<&str> = text.lines().collect();
    lines.par_iter().filter_map(|l| parse_idea_line(l)).collect()
}

pub fn try_parse_json(line: &str) -> Option<Idea> {
    if !line.starts_with('{') {
        return None;
    }
    let map = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => map,
        _ => return None,
    };
    let field = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .find_map(|k| map.get(*k).and_then(value_to_string))
            .filter(|s| !s.is_empty())
    };

    let description = field(DESCRIPTION_KEYS);
    let title = field(TITLE_KEYS)
        .or_else(|| description.clone())
        .unwrap_or_else(|| line.to_string());
    let mut idea = Idea::new(title, LineFormat::Json, line);
    idea.category = field(CATEGORY_KEYS).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    idea.problem = field(PROBLEM_KEYS);
    idea.date = field(DATE_KEYS).and_then(|d| parse_date(&d));
    idea.status = field(STATUS_KEYS);
    idea.email = field(EMAIL_KEYS);
    idea.customer = field(CUSTOMER_KEYS);
    idea.description = description;
    Some(idea)
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_string).collect();
            if parts.is_empty() { None } else { Some(parts.join(", ")) }
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn try_parse_pipe_named(line: &str) -> Option<Idea> {
    if !line.contains('|') {
        return None;
    }
    let startup_idea = capture(&RE_STARTUP_IDEA, line);
    let problem = capture(&RE_PROBLEM_TO_SOLVE, line);
    let title = startup_idea.or_else(|| problem.clone())?;
    let mut idea = Idea::new(title, LineFormat::PipeNamed, line);
    idea.problem = problem;
    idea.customer = capture(&RE_TARGET_CUSTOMERS, line);
    idea.email = capture(&RE_EMAIL_FIELD, line);
    if let Some(category) = capture(&RE_CATEGORY_FIELD, line) {
        idea.category = category;
    }
    Some(idea)
}

pub fn try_parse_pipe_simple(line: &str) -> Option<Idea> {
    if !line.contains('|') {
        return None;
    }
    parse_positional(line, '|', LineFormat::Pipe)
}

pub fn try_parse_tab(line: &str) -> Option<Idea> {
    if !line.contains('\t') {
        return None;
    }
    parse_positional(line, '\t', LineFormat::Tab)
}

fn parse_positional(line: &str, sep: char, format: LineFormat) -> Option<Idea> {
    let parts: Vec<&str> = line.split(sep).map(str::trim).collect();
    if parts.len() < 2 || parts[0].is_empty() {
        return None;
    }
    let sep_str = sep.to_string();
    let mut idea = Idea::new(parts[0], format, line);
    if !parts[1].is_empty() {
        idea.category = parts[1].to_string();
    }
    if parts.len() > 2 {
        let rest = parts[2..].join(&sep_str);
        let rest = rest.trim();
        if !rest.is_empty() {
            idea.description = Some(rest.to_string());
        }
    }
    idea.problem = idea
        .description
        .as_deref()
        .and_then(extract_problem_hint)
        .or_else(|| extract_problem_hint(&idea.title));
    Some(idea)
}

pub fn try_parse_csv(line: &str) -> Option<Idea> {
    if !line.contains(',') {
        return None;
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let record = reader.records().next()?.ok()?;
    let fields: Vec<&str> = record.iter().collect();
    if fields.len() < 2 || fields[0].is_empty() {
        return None;
    }
    let category = fields[1];
    if !category.is_empty()
        && (!RE_CATEGORY_TOKEN.is_match(category) || category.split_whitespace().count() > 4)
    {
        return None;
    }
    let mut idea = Idea::new(fields[0], LineFormat::Csv, line);
    if !category.is_empty() {
        idea.category = category.to_string();
    }
    if fields.len() > 2 {
        let rest = fields[2..].join(", ");
        let rest = rest.trim();
        if !rest.is_empty() {
            idea.description = Some(rest.to_string());
        }
    }
    idea.problem = idea
        .description
        .as_deref()
        .and_then(extract_problem_hint)
        .or_else(|| extract_problem_hint(&idea.title));
    Some(idea)
}

pub fn parse_plain_text(line: &str) -> Idea {
    let mut idea = Idea::new(line.trim(), LineFormat::Text, line);
    idea.problem = extract_problem_hint(line);
    idea
}

/// Pull a problem statement out of free text, only when the text labels one
/// (`problem: ...`) or contains a sentence describing a pain.
pub fn extract_problem_hint(text: &str) -> Option<String> {
    if let Some(labeled) = capture(&RE_PROBLEM_LABEL, text) {
        return Some(labeled);
    }
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .find(|sentence| RE_PAIN_PHRASE.is_match(sentence))
        .map(str::to_string)
}

/// Parse a standalone date/timestamp value (JSON field, chart column).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let datetime_fmts = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for f in datetime_fmts.iter() {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    let date_fmts = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for f in date_fmts.iter() {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return d.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
        }
    }
    parse_epoch(s)
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n = s.parse::<i64>().ok()?;
    match s.len() {
        10 => DateTime::<Utc>::from_timestamp(n, 0),
        13 => DateTime::<Utc>::from_timestamp_millis(n),
        _ => None,
    }
}

/// First ISO-like date embedded anywhere in a line.
pub fn detect_date_in_text(s: &str) -> Option<DateTime<Utc>> {
    RE_DATE_IN_TEXT.find_iter(s).find_map(|m| parse_date(m.as_str()))
}
