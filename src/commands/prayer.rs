use crate::{
    libs::{
        context::AppContext,
        messages::Message,
        prayer::{format_countdown, next_prayer},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Local;

pub fn cmd() -> Result<()> {
    let ctx = AppContext::open()?;
    let prayers = ctx.store.prayer_times();
    let now = Local::now().naive_local();
    let next = next_prayer(&prayers, now);

    msg_print!(Message::PrayerHeader, true);
    View::prayers(&prayers, next.as_ref().map(|next| next.prayer.name.as_str()))?;

    if let Some(next) = next {
        msg_info!(Message::NextPrayer(next.prayer.name.clone(), format_countdown(next.remaining(now))));
    }
    Ok(())
}
