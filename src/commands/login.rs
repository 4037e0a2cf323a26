//! Login command.
//!
//! Establishes a session with the ihsan server and caches the token in
//! encrypted storage for later commands.

use crate::{
    api::{Auth, Session},
    libs::{config::Config, messages::Message},
    msg_bail_anyhow, msg_success,
};
use anyhow::Result;
use clap::Args;

/// Command-line arguments for the login command.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Ask for the password even when a session is cached
    #[arg(short, long)]
    force: bool,
}

/// Executes the login command.
///
/// Reuses a cached token unless `--force` is given. On a fresh login the
/// user's first name is stored in the config for the dashboard greeting.
///
/// # Arguments
///
/// * `login_args` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` once a token is available, or an error when no server is
/// configured or every login attempt failed.
pub async fn cmd(login_args: LoginArgs) -> Result<()> {
    let mut config = Config::read()?;
    let Some(server) = config.server() else {
        msg_bail_anyhow!(Message::ServerConfigNotFound);
    };

    let mut auth = Auth::new(&server)?;
    if login_args.force {
        auth.forget()?;
    }
    auth.token().await?;

    if let Some(session) = auth.last_session() {
        if let Some(stored) = config.server.as_mut() {
            stored.first_name = session.user.first_name.clone();
            config.save()?;
        }
    }

    msg_success!(Message::LoginSuccess(server.email));
    Ok(())
}
