use super::client::{ApiClient, AuthSession, LoginCredentials, Registration};
use super::{Session, TOKEN_FILE};
use crate::libs::config::ServerConfig;
use crate::libs::messages::Message;
use crate::libs::secret::Secret;
use anyhow::Result;
use parking_lot::Mutex;

/// Login flow against the ihsan server for the configured account.
pub struct Auth {
    client: ApiClient,
    email: String,
    secret: Secret,
    retries: i32,
    last_session: Mutex<Option<AuthSession>>,
}

impl Auth {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config, None)?,
            email: config.email.clone(),
            secret: Secret::new(TOKEN_FILE, &Message::PromptPassword.to_string()),
            retries: 0,
            last_session: Mutex::new(None),
        })
    }

    /// The session returned by the most recent successful login, if one
    /// happened during this run (a cached token does not produce one).
    pub fn last_session(&self) -> Option<AuthSession> {
        self.last_session.lock().clone()
    }

    /// Creates the account and caches the token the server hands back.
    pub async fn register(&self, registration: &Registration) -> Result<AuthSession> {
        let session = self.client.register(registration).await?;
        self.secret.write(&session.access_token)?;
        Ok(session)
    }
}

impl Session for Auth {
    async fn login(&self, password: &str) -> Result<String> {
        let credentials = LoginCredentials {
            email: self.email.clone(),
            password: password.to_string(),
        };
        let session = self.client.login(&credentials).await?;
        let token = session.access_token.clone();
        *self.last_session.lock() = Some(session);
        Ok(token)
    }

    fn secret(&self) -> &Secret {
        &self.secret
    }

    fn retry(&self) -> i32 {
        self.retries
    }

    fn inc_retry(&mut self) {
        self.retries += 1;
    }
}
