use super::collection::SyncStatus;
use crate::libs::category::{default_categories, Category};
use crate::libs::event::CalendarEvent;
use crate::libs::note::Note;
use crate::libs::preferences::{default_life_balance_areas, default_prayer_times, LifeBalanceArea, PomodoroSettings, PrayerTime};
use crate::libs::task::Task;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the store keeps across sessions.
///
/// Missing fields deserialize to their defaults so snapshots written by an
/// older build still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub events: Vec<CalendarEvent>,
    pub categories: Vec<Category>,
    pub pomodoro_settings: PomodoroSettings,
    pub prayer_times: Vec<PrayerTime>,
    pub life_balance_areas: Vec<LifeBalanceArea>,
    pub sync: SyncLedger,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncLedger {
    pub tasks: HashMap<String, SyncStatus>,
    pub notes: HashMap<String, SyncStatus>,
    pub events: HashMap<String, SyncStatus>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        StoreSnapshot {
            tasks: Vec::new(),
            notes: Vec::new(),
            events: Vec::new(),
            categories: default_categories(),
            pomodoro_settings: PomodoroSettings::default(),
            prayer_times: default_prayer_times(),
            life_balance_areas: default_life_balance_areas(),
            sync: SyncLedger::default(),
        }
    }
}

/// Durable storage for store snapshots, addressed by slot name.
pub trait SnapshotSink: Send + Sync + 'static {
    /// `Ok(None)` when nothing has been saved under `slot` yet.
    fn load(&self, slot: &str) -> Result<Option<StoreSnapshot>>;

    fn save(&self, slot: &str, snapshot: &StoreSnapshot) -> Result<()>;
}
