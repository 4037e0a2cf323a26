use super::{confirm_delete, parse_when};
use crate::{
    libs::{
        calendar::parse_month,
        context::AppContext,
        event::{CalendarEvent, EventPatch, NewEvent},
        messages::Message,
        record::Record,
        view::View,
    },
    msg_bail_anyhow, msg_error, msg_info, msg_print,
};
use anyhow::Result;
use chrono::Datelike;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct EventArgs {
    #[command(subcommand)]
    command: Option<EventCommand>,
}

#[derive(Debug, Subcommand)]
enum EventCommand {
    Add {
        title: String,
        /// YYYY-MM-DD [HH:MM], local time
        #[arg(short, long)]
        start: String,
        /// Defaults to the start
        #[arg(short, long)]
        end: Option<String>,
        #[arg(long)]
        all_day: bool,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    List {
        /// YYYY-MM; loads that month from the server
        #[arg(short, long)]
        month: Option<String>,
        #[arg(short, long)]
        refresh: bool,
    },
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(long)]
        all_day: Option<bool>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Rm {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: EventArgs) -> Result<()> {
    let mut ctx = AppContext::open()?;
    let offset = ctx.offset();
    match args.command {
        Some(EventCommand::Add {
            title,
            start,
            end,
            all_day,
            description,
            location,
            category,
            color,
        }) => {
            let start = parse_when(&start, &offset)?;
            let end = match end {
                Some(end) => parse_when(&end, &offset)?,
                None => start,
            };
            if end < start {
                msg_bail_anyhow!(Message::EventEndsBeforeStart);
            }
            let draft = NewEvent {
                title,
                description,
                start,
                end,
                all_day: all_day.then_some(true),
                location,
                category,
                color,
            };
            ctx.warn_if_offline();
            let pending = ctx.store.add_event(draft)?;
            ctx.settle(pending).await;
            Ok(())
        }
        Some(EventCommand::List { month, refresh }) => {
            let month = match month {
                Some(input) => match parse_month(&input) {
                    Some(month) => Some(month),
                    None => msg_bail_anyhow!(Message::InvalidMonth(input)),
                },
                None => None,
            };

            match month {
                Some(month) => {
                    let pending = ctx.store.fetch_events_in_month(month);
                    ctx.settle(pending).await;
                }
                None if refresh => {
                    let pending = ctx.store.fetch_events();
                    ctx.settle(pending).await;
                }
                None => {}
            }

            let mut events = ctx.store.with_status::<CalendarEvent>();
            if let Some(month) = month {
                events.retain(|(event, _)| {
                    let day = event.start_date(&offset);
                    day.year() == month.year() && day.month() == month.month()
                });
            }
            events.sort_by_key(|(event, _)| event.start);

            if events.is_empty() {
                msg_info!(Message::NoRecordsFound(CalendarEvent::KIND));
                return Ok(());
            }

            msg_print!(Message::EventsHeader, true);
            View::events(&events, &ctx.store.categories(), &offset)?;
            Ok(())
        }
        Some(EventCommand::Edit {
            id,
            title,
            start,
            end,
            all_day,
            description,
            location,
            category,
            color,
        }) => {
            let patch = EventPatch {
                title,
                description,
                start: start.map(|start| parse_when(&start, &offset)).transpose()?,
                end: end.map(|end| parse_when(&end, &offset)).transpose()?,
                all_day,
                location,
                category,
                color,
            };
            if patch == EventPatch::default() {
                msg_info!(Message::NothingToUpdate);
                return Ok(());
            }
            if let Some(current) = ctx.store.event(&id) {
                if patch.end.unwrap_or(current.end) < patch.start.unwrap_or(current.start) {
                    msg_bail_anyhow!(Message::EventEndsBeforeStart);
                }
            }
            match ctx.store.update_event(&id, patch) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(CalendarEvent::KIND, id)),
            }
            Ok(())
        }
        Some(EventCommand::Rm { id, yes }) => {
            if ctx.store.event(&id).is_none() {
                msg_error!(Message::RecordNotFound(CalendarEvent::KIND, id));
                return Ok(());
            }
            if !confirm_delete(CalendarEvent::KIND, yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            match ctx.store.delete_event(&id) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(CalendarEvent::KIND, id)),
            }
            Ok(())
        }
        None => {
            let mut events = ctx.store.with_status::<CalendarEvent>();
            events.sort_by_key(|(event, _)| event.start);
            if events.is_empty() {
                msg_info!(Message::NoRecordsFound(CalendarEvent::KIND));
                return Ok(());
            }
            msg_print!(Message::EventsHeader, true);
            View::events(&events, &ctx.store.categories(), &offset)?;
            Ok(())
        }
    }
}
