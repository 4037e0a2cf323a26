//! Common shape of the records the store synchronizes with the server.
//!
//! Tasks, notes and calendar events all follow the same contract: they are
//! created from a draft (the fields the user typed), carry a string id that
//! starts out as a locally generated UUID, and are modified through a partial
//! patch. The [`Record`] trait captures that contract so the store and the
//! API client can treat the three kinds uniformly.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use thiserror::Error;

/// Kinds of server-synchronized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Task,
    Note,
    Event,
}

impl RecordKind {
    /// Collection path on the REST API, relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            RecordKind::Task => "tasks",
            RecordKind::Note => "notes",
            RecordKind::Event => "events",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RecordKind::Task => "task",
            RecordKind::Note => "note",
            RecordKind::Event => "event",
        };
        write!(f, "{}", name)
    }
}

/// A required field was left empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {field} must not be empty")]
pub struct EmptyField {
    pub kind: RecordKind,
    pub field: &'static str,
}

pub trait Record: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Fields supplied by the caller when creating a record.
    type Draft: Clone + Debug + Serialize + Send + Sync + 'static;
    /// Partial update; `None` fields are left untouched.
    type Patch: Clone + Debug + Default + Serialize + Send + Sync + 'static;

    const KIND: RecordKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Rejects drafts with an empty required field.
    fn validate(draft: &Self::Draft) -> Result<(), EmptyField>;

    /// Builds the optimistic local record for `draft`.
    fn from_draft(id: String, draft: &Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merges `patch` into the record.
    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>);
}

/// Treats whitespace-only strings as empty.
pub(crate) fn require(kind: RecordKind, field: &'static str, value: &str) -> Result<(), EmptyField> {
    if value.trim().is_empty() {
        return Err(EmptyField { kind, field });
    }
    Ok(())
}
