//! Per-invocation wiring for the CLI: configuration, the cached session
//! token, the HTTP client and the persisted store.

use super::config::Config;
use super::messages::Message;
use super::secret::Secret;
use super::store::{Notice, Outcome, Pending, Store};
use crate::api::{ApiClient, TOKEN_FILE};
use crate::db::Snapshots;
use crate::{msg_bail_anyhow, msg_warning};
use anyhow::Result;
use chrono::{FixedOffset, Local};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

pub struct AppContext {
    pub config: Config,
    pub store: Store<ApiClient>,
    notices: broadcast::Receiver<Notice>,
    secret: Secret,
    had_token: bool,
}

impl AppContext {
    /// Opens the store for the configured slot. Without a cached token the
    /// store still works; remote calls simply fail and records stay local.
    pub fn open() -> Result<Self> {
        let config = Config::read()?;
        let server = config.server().unwrap_or_default();
        let secret = Secret::new(TOKEN_FILE, &Message::PromptPassword.to_string());
        let token = if secret.exists() { secret.read().ok() } else { None };
        let had_token = token.is_some();

        let client = ApiClient::new(&server, token)?;
        let store = Store::open(client, Snapshots::new()?, &config.slot());
        let notices = store.subscribe();
        debug!(slot = %config.slot(), authenticated = had_token, "store opened");

        Ok(AppContext {
            config,
            store,
            notices,
            secret,
            had_token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.had_token
    }

    pub fn require_session(&self) -> Result<()> {
        if !self.had_token {
            msg_bail_anyhow!(Message::NotLoggedIn);
        }
        Ok(())
    }

    /// Warns once up front when record changes can only be kept locally.
    pub fn warn_if_offline(&self) {
        if !self.had_token {
            msg_warning!(Message::NotLoggedIn);
        }
    }

    /// Waits for a remote call, then prints whatever it announced.
    pub async fn settle(&mut self, pending: Pending) -> Outcome {
        let outcome = pending.settled().await;
        self.flush();
        outcome
    }

    pub async fn settle_all(&mut self, pending: Vec<Pending>) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(pending.len());
        for call in pending {
            outcomes.push(call.settled().await);
        }
        self.flush();
        outcomes
    }

    /// Prints queued notices. A token the server rejected has been wiped by
    /// the client, which is reported as an expired session.
    pub fn flush(&mut self) {
        loop {
            match self.notices.try_recv() {
                Ok(notice) => notice.print(),
                Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "notice receiver lagged"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if self.had_token && !self.secret.exists() {
            self.had_token = false;
            msg_warning!(Message::SessionExpired);
        }
    }

    /// Offset of the local time zone, used for every date shown or parsed.
    pub fn offset(&self) -> FixedOffset {
        *Local::now().offset()
    }

    pub fn first_name(&self) -> Option<String> {
        self.config.server.as_ref().and_then(|server| server.first_name.clone())
    }
}
