//! The remote side of synchronization.
//!
//! The store only ever talks to the server through [`Remote`], one CRUD
//! collection per record kind. [`ApiClient`] is the HTTP implementation;
//! tests substitute an in-memory one.
//!
//! Authentication lives next to it: [`Session`] is the cached-token /
//! prompt-and-retry login flow and [`Auth`] its implementation against
//! `POST /auth/login`.

use crate::libs::event::CalendarEvent;
use crate::libs::messages::Message;
use crate::libs::note::Note;
use crate::libs::record::{Record, RecordKind};
use crate::libs::secret::Secret;
use crate::libs::task::Task;
use crate::msg_error_anyhow;
use chrono::NaiveDate;
use std::future::Future;
use thiserror::Error;

pub mod auth;
pub mod client;

pub use auth::Auth;
pub use client::ApiClient;

pub const MAX_RETRY_COUNT: i32 = 3;
pub const TOKEN_FILE: &str = ".ihsan_token";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: RecordKind, id: String },
    #[error("session expired or invalid")]
    Unauthorized,
    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Server-side CRUD collection for one record kind.
///
/// Implementations are shared between concurrently spawned calls, so the
/// returned futures must be `Send`.
pub trait Remote<T: Record>: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = ApiResult<Vec<T>>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = ApiResult<T>> + Send;

    /// Creates a record from the caller's fields; the server assigns the id.
    fn create(&self, draft: &T::Draft) -> impl Future<Output = ApiResult<T>> + Send;

    fn update(&self, id: &str, patch: &T::Patch) -> impl Future<Output = ApiResult<T>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

pub trait EventRemote: Remote<CalendarEvent> {
    /// Events starting in the month containing `date`.
    fn list_month(&self, date: NaiveDate) -> impl Future<Output = ApiResult<Vec<CalendarEvent>>> + Send;
}

/// Everything the store needs from the server.
pub trait Backend: Remote<Task> + Remote<Note> + EventRemote {}

impl<B> Backend for B where B: Remote<Task> + Remote<Note> + EventRemote {}

/// Token-based login with an encrypted on-disk cache.
///
/// `token` returns the cached token when there is one. Otherwise it prompts
/// for the password and calls `login`, re-prompting up to
/// [`MAX_RETRY_COUNT`] times before giving up.
#[allow(async_fn_in_trait)]
pub trait Session {
    async fn login(&self, password: &str) -> anyhow::Result<String>;

    fn secret(&self) -> &Secret;

    fn retry(&self) -> i32;

    fn inc_retry(&mut self);

    async fn token(&mut self) -> anyhow::Result<String> {
        if self.secret().exists() {
            if let Ok(token) = self.secret().read() {
                return Ok(token);
            }
        }

        loop {
            let password = self.secret().prompt()?;
            match self.login(&password).await {
                Ok(token) => {
                    if let Err(e) = self.secret().write(&token) {
                        tracing::warn!(error = %e, "could not cache session token");
                    }
                    return Ok(token);
                }
                Err(e) => {
                    tracing::debug!(error = %e, attempt = self.retry(), "login attempt failed");
                    if self.retry() < MAX_RETRY_COUNT - 1 {
                        self.inc_retry();
                        continue;
                    }
                    break Err(msg_error_anyhow!(Message::WrongPassword(MAX_RETRY_COUNT)));
                }
            }
        }
    }

    fn forget(&self) -> anyhow::Result<()> {
        self.secret().remove()
    }
}
