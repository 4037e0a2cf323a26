//! Pomodoro cycle: work sessions separated by short breaks, with a long
//! break after every Nth completed session.

use super::messages::Message;
use super::preferences::PomodoroSettings;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn minutes(&self, settings: &PomodoroSettings) -> u32 {
        match self {
            Phase::Work => settings.work_duration,
            Phase::ShortBreak => settings.short_break_duration,
            Phase::LongBreak => settings.long_break_duration,
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Phase::Work)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Work => "Work session",
            Phase::ShortBreak => "Short break",
            Phase::LongBreak => "Long break",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroCycle {
    phase: Phase,
    completed_sessions: u32,
}

impl Default for PomodoroCycle {
    fn default() -> Self {
        PomodoroCycle {
            phase: Phase::Work,
            completed_sessions: 0,
        }
    }
}

impl PomodoroCycle {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn seconds(&self, settings: &PomodoroSettings) -> u64 {
        u64::from(self.phase.minutes(settings)) * 60
    }

    /// Ends the current phase and moves to the next one, returning the
    /// message announcing the transition.
    pub fn finish(&mut self, settings: &PomodoroSettings) -> Message {
        match self.phase {
            Phase::Work => {
                self.completed_sessions += 1;
                let every = settings.sessions_until_long_break.max(1);
                let long_break = self.completed_sessions % every == 0;
                self.phase = if long_break { Phase::LongBreak } else { Phase::ShortBreak };
                Message::WorkSessionCompleted { long_break }
            }
            Phase::ShortBreak | Phase::LongBreak => {
                self.phase = Phase::Work;
                Message::BreakFinished
            }
        }
    }
}

/// `MM:SS`, minutes may exceed two digits.
pub fn format_timer(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Share of the phase already elapsed, 0..=100.
pub fn progress(remaining: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let remaining = remaining.min(total);
    (total - remaining) as f64 / total as f64 * 100.0
}
