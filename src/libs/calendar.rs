//! Month grid and per-day event lookup.

use super::event::CalendarEvent;
use chrono::{Datelike, Duration, FixedOffset, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading and trailing days borrowed from the
    /// neighbouring months.
    pub in_month: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub first_day: NaiveDate,
    /// Sunday-first rows of seven days.
    pub weeks: Vec<Vec<CalendarDay>>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }

    pub fn title(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(input: &str) -> Option<NaiveDate> {
    let (year, month) = input.trim().split_once('-')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Events starting on `date`, earliest first.
pub fn events_on(events: &[CalendarEvent], date: NaiveDate, offset: &FixedOffset) -> Vec<CalendarEvent> {
    let mut day: Vec<CalendarEvent> = events.iter().filter(|e| e.start_date(offset) == date).cloned().collect();
    day.sort_by_key(|e| e.start);
    day
}

pub fn month_grid(month: NaiveDate, events: &[CalendarEvent], offset: &FixedOffset) -> Option<MonthGrid> {
    let first_day = month.with_day(1)?;
    let next_month = if first_day.month() == 12 {
        NaiveDate::from_ymd_opt(first_day.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first_day.year(), first_day.month() + 1, 1)?
    };
    let last_day = next_month.pred_opt()?;

    let lead = i64::from(first_day.weekday().num_days_from_sunday());
    let trail = 6 - i64::from(last_day.weekday().num_days_from_sunday());
    let grid_start = first_day - Duration::days(lead);
    let total = (last_day - first_day).num_days() + 1 + lead + trail;

    let days: Vec<CalendarDay> = (0..total)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            CalendarDay {
                date,
                in_month: date.month() == first_day.month(),
                events: events_on(events, date, offset),
            }
        })
        .collect();

    Some(MonthGrid {
        first_day,
        weeks: days.chunks(7).map(|week| week.to_vec()).collect(),
    })
}
