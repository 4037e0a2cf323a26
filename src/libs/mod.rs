//! Domain types, the sync store and the supporting infrastructure.
//!
//! - records: [`task`], [`note`], [`event`] and the shared [`record`] trait
//! - local-only data: [`category`], [`preferences`]
//! - [`store`]: optimistic sync state and its snapshot persistence
//! - derived views: [`activity`], [`calendar`], [`hexagon`], [`pomodoro`], [`prayer`]
//! - console output: [`messages`], [`formatter`], [`view`]

pub mod activity;
pub mod calendar;
pub mod category;
pub mod config;
pub mod context;
pub mod data_storage;
pub mod event;
pub mod formatter;
pub mod hexagon;
pub mod messages;
pub mod note;
pub mod pomodoro;
pub mod prayer;
pub mod preferences;
pub mod record;
pub mod secret;
pub mod store;
pub mod task;
pub mod view;
