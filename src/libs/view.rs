use super::activity::{Activity, ActivityDetail};
use super::calendar::MonthGrid;
use super::category::{find_category, Category};
use super::event::CalendarEvent;
use super::formatter::{format_clock, format_date, format_date_time, format_span, score_bar, truncate};
use super::note::Note;
use super::preferences::{LifeBalanceArea, PomodoroSettings, PrayerTime};
use super::store::SyncStatus;
use super::task::Task;
use anyhow::Result;
use chrono::FixedOffset;
use prettytable::{row, Table};

const TITLE_WIDTH: usize = 40;

pub struct View {}

impl View {
    fn category_name(categories: &[Category], id: Option<&str>) -> String {
        id.map(|id| find_category(categories, id).map_or_else(|| id.to_string(), |c| c.name.clone()))
            .unwrap_or_default()
    }

    fn sync_mark(status: Option<SyncStatus>) -> &'static str {
        match status {
            Some(SyncStatus::Pending) => "…",
            Some(SyncStatus::LocalOnly) => "local",
            _ => "",
        }
    }

    pub fn tasks(
        tasks: &[(Task, Option<SyncStatus>)],
        categories: &[Category],
        offset: &FixedOffset,
    ) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "", "TITLE", "PRIORITY", "DUE", "CATEGORY", "SYNC"]);
        for (task, status) in tasks {
            table.add_row(row![
                task.id,
                if task.completed { "✔" } else { " " },
                truncate(&task.title, TITLE_WIDTH),
                task.priority.map(|p| p.to_string()).unwrap_or_default(),
                task.due_date.map(|d| format_date(&d, offset)).unwrap_or_default(),
                Self::category_name(categories, task.category.as_deref()),
                Self::sync_mark(*status)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn notes(
        notes: &[(Note, Option<SyncStatus>)],
        categories: &[Category],
        offset: &FixedOffset,
    ) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "CONTENT", "UPDATED", "CATEGORY", "SYNC"]);
        for (note, status) in notes {
            table.add_row(row![
                note.id,
                truncate(&note.title, TITLE_WIDTH),
                truncate(&note.content.replace('\n', " "), TITLE_WIDTH),
                format_date_time(&note.updated_at, offset),
                Self::category_name(categories, note.category.as_deref()),
                Self::sync_mark(*status)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn events(
        events: &[(CalendarEvent, Option<SyncStatus>)],
        categories: &[Category],
        offset: &FixedOffset,
    ) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "WHEN", "LOCATION", "CATEGORY", "SYNC"]);
        for (event, status) in events {
            table.add_row(row![
                event.id,
                truncate(&event.title, TITLE_WIDTH),
                format_span(&event.start, &event.end, event.is_all_day(), offset),
                event.location.clone().unwrap_or_default(),
                Self::category_name(categories, event.category.as_deref()),
                Self::sync_mark(*status)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn categories(categories: &[Category]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "COLOR"]);
        for category in categories {
            table.add_row(row![category.id, category.name, category.color]);
        }
        table.printstd();

        Ok(())
    }

    pub fn calendar(grid: &MonthGrid) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        for week in &grid.weeks {
            let cells: Vec<String> = week
                .iter()
                .map(|day| match (day.in_month, day.events.len()) {
                    (false, _) => String::new(),
                    (true, 0) => day.date.format("%-d").to_string(),
                    (true, n) => format!("{} •{}", day.date.format("%-d"), n),
                })
                .collect();
            table.add_row(cells.into());
        }
        table.printstd();

        Ok(())
    }

    pub fn pomodoro(settings: &PomodoroSettings) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SETTING", "VALUE"]);
        table.add_row(row!["Work", format!("{} min", settings.work_duration)]);
        table.add_row(row!["Short break", format!("{} min", settings.short_break_duration)]);
        table.add_row(row!["Long break", format!("{} min", settings.long_break_duration)]);
        table.add_row(row!["Long break every", format!("{} sessions", settings.sessions_until_long_break)]);
        table.printstd();

        Ok(())
    }

    pub fn prayers(prayers: &[PrayerTime], next: Option<&str>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["", "PRAYER", "", "TIME"]);
        for prayer in prayers {
            table.add_row(row![
                if next == Some(prayer.name.as_str()) { "→" } else { "" },
                prayer.name,
                prayer.arabic_name.clone().unwrap_or_default(),
                format_clock(&prayer.time)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn balance(areas: &[LifeBalanceArea]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "AREA", "SCORE", "", "FOCUS"]);
        for area in areas {
            table.add_row(row![area.id, area.name, area.value, score_bar(area.value), area.description]);
        }
        table.printstd();

        Ok(())
    }

    pub fn activity(feed: &[Activity], offset: &FixedOffset) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["KIND", "TITLE", "DATE", ""]);
        for item in feed {
            let extra = match &item.detail {
                ActivityDetail::Task { completed: true } => "done".to_string(),
                ActivityDetail::Task { completed: false } => "open".to_string(),
                ActivityDetail::Note => String::new(),
                ActivityDetail::Event { end } => format!("until {}", format_date_time(end, offset)),
            };
            table.add_row(row![item.kind(), truncate(&item.title, TITLE_WIDTH), format_date(&item.date, offset), extra]);
        }
        table.printstd();

        Ok(())
    }
}
