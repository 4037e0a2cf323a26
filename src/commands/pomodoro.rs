use crate::{
    libs::{
        context::AppContext,
        messages::Message,
        pomodoro::{format_timer, progress, Phase, PomodoroCycle},
        preferences::PomodoroPatch,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Debug, Args)]
pub struct PomodoroArgs {
    #[command(subcommand)]
    command: Option<PomodoroCommand>,
}

#[derive(Debug, Subcommand)]
enum PomodoroCommand {
    Show,
    Set {
        /// Minutes
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        work: Option<u32>,
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        short_break: Option<u32>,
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        long_break: Option<u32>,
        /// Work sessions before a long break
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        sessions: Option<u32>,
    },
    /// Run the timer in the terminal; Ctrl-C stops it
    Run {
        /// Work sessions to run, defaults to one full cycle
        #[arg(short = 'n', long)]
        sessions: Option<u32>,
    },
}

pub async fn cmd(args: PomodoroArgs) -> Result<()> {
    let ctx = AppContext::open()?;
    match args.command {
        Some(PomodoroCommand::Show) | None => {
            msg_print!(Message::PomodoroHeader, true);
            View::pomodoro(&ctx.store.pomodoro_settings())?;
        }
        Some(PomodoroCommand::Set {
            work,
            short_break,
            long_break,
            sessions,
        }) => {
            let patch = PomodoroPatch {
                work_duration: work,
                short_break_duration: short_break,
                long_break_duration: long_break,
                sessions_until_long_break: sessions,
            };
            if patch == PomodoroPatch::default() {
                msg_info!(Message::NothingToUpdate);
                return Ok(());
            }
            let settings = ctx.store.update_pomodoro_settings(patch);
            msg_success!(Message::PomodoroSettingsUpdated);
            View::pomodoro(&settings)?;
        }
        Some(PomodoroCommand::Run { sessions }) => {
            let settings = ctx.store.pomodoro_settings();
            let target = sessions.unwrap_or(settings.sessions_until_long_break).max(1);
            let mut cycle = PomodoroCycle::default();

            loop {
                let phase = cycle.phase();
                msg_print!(Message::PomodoroPhaseStarted(phase.to_string(), phase.minutes(&settings)));
                if !countdown(phase, cycle.seconds(&settings)).await? {
                    msg_info!(Message::OperationCancelled);
                    break;
                }
                let finished = cycle.finish(&settings);
                msg_success!(finished);
                if !phase.is_break() && cycle.completed_sessions() >= target {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Ticks down one phase on a single terminal line. `Ok(false)` when the
/// user interrupted it.
async fn countdown(phase: Phase, seconds: u64) -> Result<bool> {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut remaining = seconds;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                print!("\r{} {} {:>3.0}% ", phase, format_timer(remaining), progress(remaining, seconds));
                io::stdout().flush()?;
                if remaining == 0 {
                    println!();
                    return Ok(true);
                }
                remaining -= 1;
            }
            _ = &mut interrupt => {
                println!();
                return Ok(false);
            }
        }
    }
}
