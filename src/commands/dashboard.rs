use crate::{
    libs::{
        activity::recent_activity,
        context::AppContext,
        formatter::greeting,
        messages::Message,
        prayer::{format_countdown, next_prayer},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::{Local, Timelike, Utc};

pub async fn cmd() -> Result<()> {
    let mut ctx = AppContext::open()?;
    let offset = ctx.offset();
    let now = Utc::now();
    let local_now = Local::now();

    let name = ctx.first_name().unwrap_or_else(|| "there".to_string());
    msg_print!(Message::Greeting(greeting(local_now.hour()).to_string(), name));
    msg_print!(Message::Welcome);

    if ctx.is_authenticated() {
        let calls = vec![ctx.store.fetch_tasks(), ctx.store.fetch_notes(), ctx.store.fetch_events()];
        ctx.settle_all(calls).await;
    } else {
        ctx.warn_if_offline();
    }

    let tasks = ctx.store.tasks();
    let notes = ctx.store.notes();
    let events = ctx.store.events();

    msg_print!(
        Message::Overview {
            open_tasks: tasks.iter().filter(|task| !task.completed).count(),
            notes: notes.len(),
            upcoming_events: events.iter().filter(|event| event.end > now).count(),
        },
        true
    );

    if let Some(next) = next_prayer(&ctx.store.prayer_times(), local_now.naive_local()) {
        msg_info!(Message::NextPrayer(
            next.prayer.name.clone(),
            format_countdown(next.remaining(local_now.naive_local()))
        ));
    }

    let feed = recent_activity(&tasks, &notes, &events, now, &offset);
    msg_print!(Message::RecentActivityHeader, true);
    if feed.is_empty() {
        msg_info!(Message::NoRecentActivity);
    } else {
        View::activity(&feed, &offset)?;
    }
    Ok(())
}
