//! Logout command.

use crate::{
    api::TOKEN_FILE,
    libs::{messages::Message, secret::Secret},
    msg_success,
};
use anyhow::Result;

/// Removes the cached session token. Running it without a session is fine.
pub fn cmd() -> Result<()> {
    Secret::new(TOKEN_FILE, &Message::PromptPassword.to_string()).remove()?;

    msg_success!(Message::LoggedOut);
    Ok(())
}
