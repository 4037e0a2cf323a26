//! # ihsan
//!
//! Personal productivity and spiritual companion: tasks, notes and calendar
//! events kept in sync with the ihsan server, plus local categories,
//! pomodoro settings, prayer times and a life balance chart.
//!
//! All state goes through [`libs::store::Store`], which applies changes
//! locally first and reconciles them with the server in the background.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ihsan::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
