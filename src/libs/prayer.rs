//! Next-prayer lookup and countdown for the daily prayer schedule.
//!
//! Prayer times are wall-clock times in the viewer's own zone, so everything
//! here works on [`NaiveDateTime`].

use super::preferences::PrayerTime;
use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPrayer {
    pub prayer: PrayerTime,
    pub at: NaiveDateTime,
}

impl UpcomingPrayer {
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        self.at - now
    }
}

/// Finds the first prayer later than `now` today, or the first prayer of
/// tomorrow once today's list is exhausted.
///
/// The list is scanned in stored order, which is the order of the day.
pub fn next_prayer(prayers: &[PrayerTime], now: NaiveDateTime) -> Option<UpcomingPrayer> {
    let today = now.date();

    if let Some(prayer) = prayers.iter().find(|p| today.and_time(p.time) > now) {
        return Some(UpcomingPrayer {
            prayer: prayer.clone(),
            at: today.and_time(prayer.time),
        });
    }

    let tomorrow = today.succ_opt()?;
    prayers.first().map(|prayer| UpcomingPrayer {
        prayer: prayer.clone(),
        at: tomorrow.and_time(prayer.time),
    })
}

/// `"2h 5m 9s"`, dropping the hour part when it is zero.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}
