//! Text of the [`Message`] catalogue.
//!
//! Store notifications reuse the wording users already know from the web
//! dashboard ("Failed to save task to server. Changes saved locally.").

use super::types::Message;
use crate::libs::record::RecordKind;
use std::fmt::{Display, Formatter, Result};

fn capitalized(kind: &RecordKind) -> &'static str {
    match kind {
        RecordKind::Task => "Task",
        RecordKind::Note => "Note",
        RecordKind::Event => "Event",
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === SYNC MESSAGES ===
            Message::RecordSaved(kind) => format!("{} saved to server", capitalized(kind)),
            Message::RecordSaveFailed(kind) => format!("Failed to save {} to server. Changes saved locally.", kind),
            Message::RecordUpdated(kind) => format!("{} updated on server", capitalized(kind)),
            Message::RecordUpdateFailed(kind) => format!("Failed to update {} on server. Changes saved locally.", kind),
            Message::RecordDeleted(kind) => format!("{} deleted on server", capitalized(kind)),
            Message::RecordDeleteFailed(kind) => format!("Failed to delete {} on server. Restoring {} locally.", kind, kind),
            Message::TaskStatusUpdated => "Task status updated on server".to_string(),
            Message::TaskStatusUpdateFailed => "Failed to update task status on server. Changes saved locally.".to_string(),
            Message::RecordsFetched(kind, count) => format!("Loaded {} {}s from server", count, kind),
            Message::RecordsFetchFailed(kind) => format!("Failed to load {}s from server. Showing local data.", kind),
            Message::RecordNotFound(kind, id) => format!("{} '{}' not found", capitalized(kind), id),
            Message::SyncStarted => "Synchronizing with server...".to_string(),
            Message::SyncCompleted => "Synchronization completed".to_string(),
            Message::LocalOnlyRecords(count) => format!("{} record(s) exist only on this device", count),

            // === SNAPSHOT MESSAGES ===
            Message::SnapshotSaveFailed(error) => format!("Failed to save local data: {}", error),

            // === AUTH MESSAGES ===
            Message::LoginSuccess(email) => format!("Logged in as {}", email),
            Message::LoggedOut => "Logged out".to_string(),
            Message::RegisterSuccess(email) => format!("Registration successful! Logged in as {}", email),
            Message::WrongPassword(count) => format!("You entered the wrong password {} times!", count),
            Message::SessionExpired => "Session expired. Run 'ihsan login' to sign in again.".to_string(),
            Message::NotLoggedIn => "Not logged in. Run 'ihsan login' first.".to_string(),
            Message::ServerConfigNotFound => "Server is not configured. Run 'ihsan init' first.".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleServer => "Server settings".to_string(),
            Message::ConfigModuleStorage => "Local storage settings".to_string(),

            // === TASK MESSAGES ===
            Message::TasksHeader => "Tasks".to_string(),
            Message::NotesHeader => "Notes".to_string(),
            Message::EventsHeader => "Events".to_string(),
            Message::NoRecordsFound(kind) => format!("No {}s found", kind),
            Message::NothingToUpdate => "Nothing to update".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::EventEndsBeforeStart => "Event end must not be before its start".to_string(),

            // === CATEGORY MESSAGES ===
            Message::CategoriesHeader => "Categories".to_string(),
            Message::NoCategoriesFound => "No categories found".to_string(),
            Message::CategoryAdded(name) => format!("Category '{}' added", name),
            Message::CategoryUpdated(name) => format!("Category '{}' updated", name),
            Message::CategoryDeleted(name) => format!("Category '{}' deleted", name),
            Message::CategoryNotFound(id) => format!("Category '{}' not found", id),

            // === CALENDAR MESSAGES ===
            Message::CalendarHeader(month) => format!("📅 {}", month),
            Message::NoEventsOn(day) => format!("No events on {}", day),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD", value),
            Message::InvalidMonth(value) => format!("Invalid month '{}', expected YYYY-MM", value),

            // === POMODORO MESSAGES ===
            Message::PomodoroHeader => "🍅 Pomodoro".to_string(),
            Message::PomodoroSettingsUpdated => "Pomodoro settings updated".to_string(),
            Message::PomodoroPhaseStarted(phase, minutes) => format!("{} started ({} min)", phase, minutes),
            Message::WorkSessionCompleted { long_break } => format!(
                "Work session completed! Time for a {} break!",
                if *long_break { "long" } else { "short" }
            ),
            Message::BreakFinished => "Break finished! Ready to work?".to_string(),

            // === PRAYER MESSAGES ===
            Message::PrayerHeader => "🕌 Prayer times".to_string(),
            Message::NextPrayer(name, countdown) => format!("Next prayer: {} in {}", name, countdown),

            // === LIFE BALANCE MESSAGES ===
            Message::BalanceHeader => "⬡ Life balance".to_string(),
            Message::BalanceAreaUpdated(name, value) => format!("{} set to {}/10", name, value),
            Message::BalanceAreaNotFound(name) => format!("Life balance area '{}' not found", name),
            Message::BalanceChartWritten(path) => format!("Life balance chart written to {}", path),

            // === DASHBOARD MESSAGES ===
            Message::Greeting(greeting, name) => format!("{}, {}!", greeting, name),
            Message::Welcome => "Welcome to ihsan 2.0, your personal productivity and spiritual companion.".to_string(),
            Message::RecentActivityHeader => "Recent activity".to_string(),
            Message::NoRecentActivity => "No recent activity".to_string(),
            Message::Overview {
                open_tasks,
                notes,
                upcoming_events,
            } => format!(
                "{} open task(s), {} note(s), {} upcoming event(s)",
                open_tasks, notes, upcoming_events
            ),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptServerApiUrl => "Enter the ihsan API URL".to_string(),
            Message::PromptServerEmail => "Enter your email".to_string(),
            Message::PromptServerTimeout => "Enter request timeout (seconds)".to_string(),
            Message::PromptStorageSlot => "Enter local storage slot name".to_string(),
            Message::PromptPassword => "Enter your ihsan password".to_string(),
            Message::PromptConfirmPassword => "Repeat the password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::PromptFirstName => "Enter your first name".to_string(),
            Message::PromptLastName => "Enter your last name".to_string(),
            Message::PromptContent => "Content".to_string(),
            Message::PromptConfirmDelete(kind) => format!("Are you sure you want to delete this {}?", kind),
            Message::PromptConfirmDeleteCategory(name) => format!("Delete category '{}'? Records keep their reference.", name),
        };

        write!(f, "{}", text)
    }
}
