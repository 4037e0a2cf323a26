//! Local-only user preferences: pomodoro durations, prayer times and the
//! life balance self-assessment. None of these are synchronized with the
//! server; they live in the store snapshot only.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_BALANCE_VALUE: u8 = 1;
pub const MAX_BALANCE_VALUE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    /// Minutes.
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub sessions_until_long_break: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        PomodoroSettings {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            sessions_until_long_break: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PomodoroPatch {
    pub work_duration: Option<u32>,
    pub short_break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub sessions_until_long_break: Option<u32>,
}

impl PomodoroSettings {
    pub fn apply(&mut self, patch: &PomodoroPatch) {
        if let Some(minutes) = patch.work_duration {
            self.work_duration = minutes;
        }
        if let Some(minutes) = patch.short_break_duration {
            self.short_break_duration = minutes;
        }
        if let Some(minutes) = patch.long_break_duration {
            self.long_break_duration = minutes;
        }
        if let Some(sessions) = patch.sessions_until_long_break {
            self.sessions_until_long_break = sessions;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTime {
    pub name: String,
    /// Local wall-clock time of day.
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabic_name: Option<String>,
}

pub fn default_prayer_times() -> Vec<PrayerTime> {
    [
        ("Fajr", "الفجر", 5, 30),
        ("Sunrise", "الشروق", 6, 45),
        ("Dhuhr", "الظهر", 12, 15),
        ("Asr", "العصر", 15, 30),
        ("Maghrib", "المغرب", 18, 0),
        ("Isha", "العشاء", 19, 30),
    ]
    .iter()
    .filter_map(|(name, arabic, hour, minute)| {
        Some(PrayerTime {
            name: name.to_string(),
            time: NaiveTime::from_hms_opt(*hour, *minute, 0)?,
            arabic_name: Some(arabic.to_string()),
        })
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeBalanceArea {
    pub id: String,
    pub name: String,
    /// Self-assessed score on a 1..=10 scale.
    pub value: u8,
    pub color: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifeBalancePatch {
    pub name: Option<String>,
    pub value: Option<u8>,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl LifeBalanceArea {
    pub fn apply(&mut self, patch: &LifeBalancePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(value) = patch.value {
            self.value = clamp_balance_value(value);
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

pub fn clamp_balance_value(value: u8) -> u8 {
    value.clamp(MIN_BALANCE_VALUE, MAX_BALANCE_VALUE)
}

pub fn default_life_balance_areas() -> Vec<LifeBalanceArea> {
    [
        ("Physical Health", 7, "#F97316", "Exercise, nutrition, sleep", "activity"),
        ("Mental Wellbeing", 6, "#D946EF", "Mindfulness, stress management", "brain-circuit"),
        ("Relationships", 8, "#8B5CF6", "Family, friends, community", "users"),
        ("Career", 7, "#0EA5E9", "Work, skills, achievements", "briefcase"),
        ("Personal Growth", 5, "#10b981", "Learning, creativity, hobbies", "sparkles"),
        ("Spiritual", 6, "#f59e0b", "Purpose, values, faith", "book-heart"),
    ]
    .iter()
    .map(|(name, value, color, description, icon)| LifeBalanceArea {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        value: *value,
        color: color.to_string(),
        description: description.to_string(),
        icon: Some(icon.to_string()),
    })
    .collect()
}
