use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Which comparison window a dated record falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Current,
    Previous,
    Outside,
}

/// Current window `[as_of - len, ..)` and the equally long window before it.
/// Upper bound on a configured window length.
pub const MAX_WINDOW_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindows {
    pub as_of: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
    pub previous_start: DateTime<Utc>,
}

impl WeekWindows {
    pub fn new(as_of: DateTime<Utc>, window_days: i64) -> Self {
        let len = Duration::days(window_days.clamp(1, MAX_WINDOW_DAYS));
        Self {
            as_of,
            current_start: as_of - len,
            previous_start: as_of - len - len,
        }
    }

    /// Undated records count toward the current window.
    pub fn classify(&self, date: Option<DateTime<Utc>>) -> Period {
        match date {
            None => Period::Current,
            Some(t) if t >= self.current_start => Period::Current,
            Some(t) if t >= self.previous_start => Period::Previous,
            Some(_) => Period::Outside,
        }
    }

    /// Split records into (current, previous) by their date.
    pub fn split<'a, T, F>(&self, items: &'a [T], date_of: F) -> (Vec<&'a T>, Vec<&'a T>)
    where
        F: Fn(&T) -> Option<DateTime<Utc>>,
    {
        let mut current = Vec::new();
        let mut previous = Vec::new();
        for item in items {
            match self.classify(date_of(item)) {
                Period::Current => current.push(item),
                Period::Previous => previous.push(item),
                Period::Outside => {}
            }
        }
        (current, previous)
    }
}

/// Fractional week-over-week change. A new entry (previous 0) reports 1.0.
pub fn calculate_wow_change(current: usize, previous: usize) -> f64 {
    if previous == 0 {
        return if current > 0 { 1.0 } else { 0.0 };
    }
    (current as f64 - previous as f64) / previous as f64
}

/// Last instant of a calendar day, used as the report's reference "now".
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let ndt = date
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    Utc.from_utc_datetime(&ndt)
}

/// Midnight at the start of a calendar day.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// The `days` calendar dates ending at `date`, newest first.
pub fn lookback_dates(date: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days as i64)
        .filter_map(|i| date.checked_sub_signed(Duration::days(i)))
        .collect()
}
