pub mod balance;
pub mod calendar;
pub mod category;
pub mod dashboard;
pub mod event;
pub mod init;
pub mod login;
pub mod logout;
pub mod note;
pub mod pomodoro;
pub mod prayer;
pub mod register;
pub mod sync;
pub mod task;

use crate::libs::formatter::parse_date_time;
use crate::libs::messages::Message;
use crate::libs::record::RecordKind;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Sign in to the ihsan server")]
    Login(login::LoginArgs),
    #[command(about = "Create an account on the ihsan server")]
    Register,
    #[command(about = "Forget the cached session")]
    Logout,
    #[command(about = "Load tasks, notes and events from the server")]
    Sync,
    #[command(about = "Greeting, overview and recent activity")]
    Dashboard,
    #[command(about = "Manage tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage notes")]
    Note(note::NoteArgs),
    #[command(about = "Manage calendar events")]
    Event(event::EventArgs),
    #[command(about = "Manage categories")]
    Category(category::CategoryArgs),
    #[command(about = "Show a month of events")]
    Calendar(calendar::CalendarArgs),
    #[command(about = "Pomodoro timer and settings")]
    Pomodoro(pomodoro::PomodoroArgs),
    #[command(about = "Today's prayer times")]
    Prayer,
    #[command(about = "Life balance areas")]
    Balance(balance::BalanceArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Login(args) => login::cmd(args).await,
            Commands::Register => register::cmd().await,
            Commands::Logout => logout::cmd(),
            Commands::Sync => sync::cmd().await,
            Commands::Dashboard => dashboard::cmd().await,
            Commands::Task(args) => task::cmd(args).await,
            Commands::Note(args) => note::cmd(args).await,
            Commands::Event(args) => event::cmd(args).await,
            Commands::Category(args) => category::cmd(args),
            Commands::Calendar(args) => calendar::cmd(args).await,
            Commands::Pomodoro(args) => pomodoro::cmd(args).await,
            Commands::Prayer => prayer::cmd(),
            Commands::Balance(args) => balance::cmd(args),
        }
    }
}

fn parse_when(input: &str, offset: &FixedOffset) -> Result<DateTime<Utc>> {
    match parse_date_time(input, offset) {
        Some(at) => Ok(at),
        None => msg_bail_anyhow!(Message::InvalidDate(input.to_string())),
    }
}

fn confirm_delete(kind: RecordKind, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptConfirmDelete(kind).to_string())
        .default(false)
        .interact()?)
}
