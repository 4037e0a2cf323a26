//! Text formatting shared by the table views and the dashboard.
//!
//! Stored timestamps are UTC. Everything printed goes through the viewer's
//! offset first, so a task due at 23:30 UTC shows up on the right local day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Greeting for the hour of the day, `0..=23`.
///
/// ```rust
/// use ihsan::libs::formatter::greeting;
///
/// assert_eq!(greeting(9), "Good morning");
/// assert_eq!(greeting(12), "Good afternoon");
/// assert_eq!(greeting(18), "Good evening");
/// ```
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

pub fn format_date(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%b %-d, %Y").to_string()
}

pub fn format_date_time(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%b %-d, %Y %H:%M").to_string()
}

/// `5:30 AM` style clock time.
pub fn format_clock(time: &NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Event time range; all-day events only show the day.
pub fn format_span(start: &DateTime<Utc>, end: &DateTime<Utc>, all_day: bool, offset: &FixedOffset) -> String {
    if all_day {
        return format!("{} (all day)", format_date(start, offset));
    }

    let start = start.with_timezone(offset);
    let end = end.with_timezone(offset);
    if start.date_naive() == end.date_naive() {
        format!("{} {}-{}", start.format("%b %-d, %Y"), start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!("{} - {}", start.format("%b %-d, %Y %H:%M"), end.format("%b %-d, %Y %H:%M"))
    }
}

/// Reads `YYYY-MM-DD HH:MM` (or a bare date, meaning midnight) as local
/// time at `offset`.
pub fn parse_date_time(input: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let input = input.trim();
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| parse_date(input).and_then(|date| date.and_hms_opt(0, 0, 0)))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Cuts `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Ten-cell bar for a 1..=10 score.
pub fn score_bar(value: u8) -> String {
    let filled = usize::from(value.min(10));
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
