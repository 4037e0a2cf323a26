//! Account registration command.

use crate::{
    api::{client::Registration, Auth},
    libs::{config::Config, messages::Message},
    msg_bail_anyhow, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};

/// Executes the registration command.
///
/// Prompts for name and password, using the configured email, and signs the
/// new account in.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error when no server is configured,
/// the prompts fail or the server rejects the registration.
pub async fn cmd() -> Result<()> {
    let mut config = Config::read()?;
    let Some(server) = config.server() else {
        msg_bail_anyhow!(Message::ServerConfigNotFound);
    };

    let theme = ColorfulTheme::default();
    let registration = Registration {
        first_name: Input::with_theme(&theme)
            .with_prompt(Message::PromptFirstName.to_string())
            .interact_text()?,
        last_name: Input::with_theme(&theme)
            .with_prompt(Message::PromptLastName.to_string())
            .interact_text()?,
        email: server.email.clone(),
        password: Password::with_theme(&theme)
            .with_prompt(Message::PromptPassword.to_string())
            .with_confirmation(Message::PromptConfirmPassword.to_string(), Message::PasswordMismatch.to_string())
            .interact()?,
    };

    let session = Auth::new(&server)?.register(&registration).await?;

    if let Some(stored) = config.server.as_mut() {
        stored.first_name = session.user.first_name.or(Some(registration.first_name));
        config.save()?;
    }

    msg_success!(Message::RegisterSuccess(session.user.email));
    Ok(())
}
