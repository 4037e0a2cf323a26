use crate::{
    libs::{
        calendar::{events_on, month_grid, parse_month},
        context::AppContext,
        event::CalendarEvent,
        formatter::parse_date,
        messages::Message,
        store::SyncStatus,
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// YYYY-MM, defaults to the current month
    #[arg(short, long)]
    month: Option<String>,
    /// Also list the events of YYYY-MM-DD
    #[arg(short, long)]
    day: Option<String>,
    /// Show only what is stored locally
    #[arg(long)]
    offline: bool,
}

pub async fn cmd(args: CalendarArgs) -> Result<()> {
    let mut ctx = AppContext::open()?;
    let offset = ctx.offset();

    let month = match args.month {
        Some(input) => match parse_month(&input) {
            Some(month) => month,
            None => msg_bail_anyhow!(Message::InvalidMonth(input)),
        },
        None => Local::now().date_naive(),
    };
    let day: Option<NaiveDate> = match args.day {
        Some(input) => match parse_date(&input) {
            Some(day) => Some(day),
            None => msg_bail_anyhow!(Message::InvalidDate(input)),
        },
        None => None,
    };

    if !args.offline {
        let pending = ctx.store.fetch_events_in_month(month);
        ctx.settle(pending).await;
    }

    let events = ctx.store.events();
    let Some(grid) = month_grid(month, &events, &offset) else {
        msg_bail_anyhow!(Message::InvalidMonth(month.format("%Y-%m").to_string()));
    };

    msg_print!(Message::CalendarHeader(grid.title()), true);
    View::calendar(&grid)?;

    let selected: Vec<CalendarEvent> = match day {
        Some(day) => events_on(&events, day, &offset),
        None => grid.days().filter(|d| d.in_month).flat_map(|d| d.events.clone()).collect(),
    };
    if selected.is_empty() {
        if let Some(day) = day {
            msg_info!(Message::NoEventsOn(day.format("%Y-%m-%d").to_string()));
        }
        return Ok(());
    }

    let rows: Vec<(CalendarEvent, Option<SyncStatus>)> = selected
        .into_iter()
        .map(|event| {
            let status = ctx.store.sync_status::<CalendarEvent>(&event.id);
            (event, status)
        })
        .collect();
    View::events(&rows, &ctx.store.categories(), &offset)?;
    Ok(())
}
