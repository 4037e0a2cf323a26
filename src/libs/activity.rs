//! Recent-activity feed for the dashboard.

use super::event::CalendarEvent;
use super::note::Note;
use super::record::RecordKind;
use super::task::Task;
use chrono::{DateTime, Duration, FixedOffset, Utc};

const PER_KIND: usize = 5;
const FEED_SIZE: usize = 10;
const LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityDetail {
    Task { completed: bool },
    Note,
    Event { end: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub title: String,
    /// Creation time for tasks and notes, start time for events.
    pub date: DateTime<Utc>,
    pub detail: ActivityDetail,
}

impl Activity {
    pub fn kind(&self) -> RecordKind {
        match self.detail {
            ActivityDetail::Task { .. } => RecordKind::Task,
            ActivityDetail::Note => RecordKind::Note,
            ActivityDetail::Event { .. } => RecordKind::Event,
        }
    }
}

/// Builds the feed: up to five tasks and five notes created in the last
/// week, plus the five earliest events that have not ended yet (or end
/// today), merged newest first and capped at ten.
pub fn recent_activity(
    tasks: &[Task],
    notes: &[Note],
    events: &[CalendarEvent],
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Vec<Activity> {
    let since = now - Duration::days(LOOKBACK_DAYS);
    let today = now.with_timezone(offset).date_naive();

    let mut recent_tasks: Vec<&Task> = tasks.iter().filter(|t| t.created_at > since).collect();
    recent_tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut recent_notes: Vec<&Note> = notes.iter().filter(|n| n.created_at > since).collect();
    recent_notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut upcoming: Vec<&CalendarEvent> =
        events.iter().filter(|e| e.end > now || e.end_date(offset) == today).collect();
    upcoming.sort_by_key(|e| e.start);

    let mut feed: Vec<Activity> = recent_tasks
        .into_iter()
        .take(PER_KIND)
        .map(|t| Activity {
            id: t.id.clone(),
            title: t.title.clone(),
            date: t.created_at,
            detail: ActivityDetail::Task { completed: t.completed },
        })
        .chain(recent_notes.into_iter().take(PER_KIND).map(|n| Activity {
            id: n.id.clone(),
            title: n.title.clone(),
            date: n.created_at,
            detail: ActivityDetail::Note,
        }))
        .chain(upcoming.into_iter().take(PER_KIND).map(|e| Activity {
            id: e.id.clone(),
            title: e.title.clone(),
            date: e.start,
            detail: ActivityDetail::Event { end: e.end },
        }))
        .collect();

    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(FEED_SIZE);
    feed
}
