//! Full refresh of tasks, notes and events from the server.

use crate::{
    libs::{context::AppContext, messages::Message, store::Outcome},
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;

/// Executes the sync command.
///
/// Issues the three list calls concurrently and waits for all of them. A
/// failed list leaves that collection as it was and is reported as a warning.
/// Records still only on this device are counted at the end.
///
/// # Returns
///
/// Returns `Ok(())` even when some lists failed, or an error when there is
/// no session.
pub async fn cmd() -> Result<()> {
    let mut ctx = AppContext::open()?;
    ctx.require_session()?;

    msg_info!(Message::SyncStarted);
    let calls = vec![ctx.store.fetch_tasks(), ctx.store.fetch_notes(), ctx.store.fetch_events()];
    let outcomes = ctx.settle_all(calls).await;

    if outcomes.iter().all(|outcome| *outcome == Outcome::Confirmed) {
        msg_success!(Message::SyncCompleted);
    }

    let local_only = ctx.store.local_only_count();
    if local_only > 0 {
        msg_warning!(Message::LocalOnlyRecords(local_only));
    }
    Ok(())
}
