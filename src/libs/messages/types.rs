use crate::libs::record::RecordKind;

/// Every piece of user-facing text ihsan prints.
///
/// Variants are grouped by feature; the text itself lives in `display.rs`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === SYNC MESSAGES ===
    RecordSaved(RecordKind),
    RecordSaveFailed(RecordKind),
    RecordUpdated(RecordKind),
    RecordUpdateFailed(RecordKind),
    RecordDeleted(RecordKind),
    RecordDeleteFailed(RecordKind),
    TaskStatusUpdated,
    TaskStatusUpdateFailed,
    RecordsFetched(RecordKind, usize),
    RecordsFetchFailed(RecordKind),
    RecordNotFound(RecordKind, String),
    SyncStarted,
    SyncCompleted,
    LocalOnlyRecords(usize),

    // === SNAPSHOT MESSAGES ===
    SnapshotSaveFailed(String),

    // === AUTH MESSAGES ===
    LoginSuccess(String),
    LoggedOut,
    RegisterSuccess(String),
    WrongPassword(i32),
    SessionExpired,
    NotLoggedIn,
    ServerConfigNotFound,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleServer,
    ConfigModuleStorage,

    // === TASK MESSAGES ===
    TasksHeader,
    NotesHeader,
    EventsHeader,
    NoRecordsFound(RecordKind),
    NothingToUpdate,
    OperationCancelled,
    EventEndsBeforeStart,

    // === CATEGORY MESSAGES ===
    CategoriesHeader,
    NoCategoriesFound,
    CategoryAdded(String),
    CategoryUpdated(String),
    CategoryDeleted(String),
    CategoryNotFound(String),

    // === CALENDAR MESSAGES ===
    CalendarHeader(String),
    NoEventsOn(String),
    InvalidDate(String),
    InvalidMonth(String),

    // === POMODORO MESSAGES ===
    PomodoroHeader,
    PomodoroSettingsUpdated,
    PomodoroPhaseStarted(String, u32),
    WorkSessionCompleted { long_break: bool },
    BreakFinished,

    // === PRAYER MESSAGES ===
    PrayerHeader,
    NextPrayer(String, String),

    // === LIFE BALANCE MESSAGES ===
    BalanceHeader,
    BalanceAreaUpdated(String, u8),
    BalanceAreaNotFound(String),
    BalanceChartWritten(String),

    // === DASHBOARD MESSAGES ===
    Greeting(String, String),
    Welcome,
    RecentActivityHeader,
    NoRecentActivity,
    Overview { open_tasks: usize, notes: usize, upcoming_events: usize },

    // === PROMPTS ===
    PromptSelectModules,
    PromptServerApiUrl,
    PromptServerEmail,
    PromptServerTimeout,
    PromptStorageSlot,
    PromptPassword,
    PromptConfirmPassword,
    PasswordMismatch,
    PromptFirstName,
    PromptLastName,
    PromptContent,
    PromptConfirmDelete(RecordKind),
    PromptConfirmDeleteCategory(String),
}
