//! Configuration setup command.
//!
//! Walks the user through the server and storage settings, or drops the
//! locally stored data of the configured slot with `--delete`.

use crate::{
    db::Snapshots,
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

/// Command-line arguments for the initialization command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Drop the locally stored data of the configured slot instead
    ///
    /// Removes the slot's snapshot from the database. The configuration file
    /// and the cached session are left as they are, so the next command
    /// starts from the default categories and preferences.
    #[arg(short, long)]
    delete: bool,
}

/// Executes the initialization command.
///
/// # Arguments
///
/// * `init_args` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` once the configuration is saved or the slot is dropped,
/// or an error if a prompt, the config file or the database fails.
pub fn cmd(init_args: InitArgs) -> Result<()> {
    // Deletion mode exits before the wizard
    if init_args.delete {
        let config = Config::read()?;
        Snapshots::new()?.delete(&config.slot())?;
        return Ok(());
    }

    // Wizard result is only persisted once every prompt succeeded
    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
