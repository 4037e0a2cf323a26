#![allow(dead_code)]

//! In-memory stand-in for the ihsan server.
//!
//! Records are kept as JSON, so creates and patches go through the same
//! serde shapes the HTTP client sends. Calls can be made to fail per kind and
//! operation, or held back until the test releases them.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use ihsan::api::{ApiError, ApiResult, EventRemote, Remote};
use ihsan::libs::event::CalendarEvent;
use ihsan::libs::record::{Record, RecordKind};
use ihsan::libs::store::{Notice, Store};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Get,
    Create,
    Update,
    Delete,
}

struct Gate {
    kind: RecordKind,
    op: Op,
    needle: String,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct ServerState {
    records: HashMap<RecordKind, Vec<Value>>,
    next_id: u64,
    failing: HashSet<(RecordKind, Op)>,
    gates: Vec<Gate>,
    calls: Vec<(RecordKind, Op)>,
}

#[derive(Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<ServerState>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a record on the server as if another client had created it.
    pub fn seed<T: Record>(&self, record: &T) {
        let value = serde_json::to_value(record).unwrap();
        self.state.lock().records.entry(T::KIND).or_default().push(value);
    }

    pub fn fail(&self, kind: RecordKind, op: Op) {
        self.state.lock().failing.insert((kind, op));
    }

    pub fn recover(&self, kind: RecordKind, op: Op) {
        self.state.lock().failing.remove(&(kind, op));
    }

    /// Holds the next matching call until the returned sender fires (or is
    /// dropped). `needle` is matched against the serialized request; an
    /// empty needle matches any call.
    pub fn gate(&self, kind: RecordKind, op: Op, needle: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().gates.push(Gate {
            kind,
            op,
            needle: needle.to_string(),
            release: rx,
        });
        tx
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.state.lock().records.get(&kind).map_or(0, Vec::len)
    }

    pub fn calls(&self, kind: RecordKind, op: Op) -> usize {
        self.state.lock().calls.iter().filter(|call| **call == (kind, op)).count()
    }

    pub fn record<T: Record>(&self, id: &str) -> Option<T> {
        let state = self.state.lock();
        let value = state.records.get(&T::KIND)?.iter().find(|value| value["id"] == id)?.clone();
        serde_json::from_value(value).ok()
    }

    async fn pass(&self, kind: RecordKind, op: Op, body: &str) -> ApiResult<()> {
        let gate = {
            let mut state = self.state.lock();
            state.calls.push((kind, op));
            let pos = state
                .gates
                .iter()
                .position(|gate| gate.kind == kind && gate.op == op && body.contains(&gate.needle));
            pos.map(|pos| state.gates.remove(pos).release)
        };
        if let Some(release) = gate {
            let _ = release.await;
        }

        let failing = self.state.lock().failing.contains(&(kind, op));
        if failing {
            return Err(ApiError::Server {
                status: 503,
                message: format!("{} {:?} unavailable", kind, op),
            });
        }
        Ok(())
    }

    fn next_id(&self) -> String {
        let mut state = self.state.lock();
        state.next_id += 1;
        format!("srv-{}", state.next_id)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

fn encode<S: serde::Serialize>(value: &S) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

fn not_found(kind: RecordKind, id: &str) -> ApiError {
    ApiError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl<T: Record> Remote<T> for MockRemote {
    async fn list(&self) -> ApiResult<Vec<T>> {
        self.pass(T::KIND, Op::List, T::KIND.path()).await?;
        let values = self.state.lock().records.get(&T::KIND).cloned().unwrap_or_default();
        values.into_iter().map(decode).collect()
    }

    async fn get(&self, id: &str) -> ApiResult<T> {
        self.pass(T::KIND, Op::Get, id).await?;
        let state = self.state.lock();
        let value = state
            .records
            .get(&T::KIND)
            .and_then(|values| values.iter().find(|value| value["id"] == id))
            .cloned()
            .ok_or_else(|| not_found(T::KIND, id))?;
        decode(value)
    }

    async fn create(&self, draft: &T::Draft) -> ApiResult<T> {
        let mut value = encode(draft)?;
        self.pass(T::KIND, Op::Create, &value.to_string()).await?;

        if let Value::Object(fields) = &mut value {
            fields.insert("id".to_string(), Value::String(self.next_id()));
        }
        let record: T = decode(value)?;
        // Store the decoded form so server-side defaults stay fixed.
        let stored = encode(&record)?;
        self.state.lock().records.entry(T::KIND).or_default().push(stored);
        Ok(record)
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> ApiResult<T> {
        let patch = encode(patch)?;
        self.pass(T::KIND, Op::Update, &format!("{} {}", id, patch)).await?;

        let mut state = self.state.lock();
        let value = state
            .records
            .get_mut(&T::KIND)
            .and_then(|values| values.iter_mut().find(|value| value["id"] == id))
            .ok_or_else(|| not_found(T::KIND, id))?;
        if let (Value::Object(target), Value::Object(fields)) = (&mut *value, patch) {
            target.extend(fields);
            if T::KIND == RecordKind::Note {
                target.insert("updatedAt".to_string(), encode(&Utc::now())?);
            }
        }
        decode(value.clone())
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.pass(T::KIND, Op::Delete, id).await?;

        let mut state = self.state.lock();
        let values = state.records.entry(T::KIND).or_default();
        let pos = values.iter().position(|value| value["id"] == id).ok_or_else(|| not_found(T::KIND, id))?;
        values.remove(pos);
        Ok(())
    }
}

impl EventRemote for MockRemote {
    async fn list_month(&self, date: NaiveDate) -> ApiResult<Vec<CalendarEvent>> {
        let month = date.format("%Y-%m").to_string();
        self.pass(RecordKind::Event, Op::List, &month).await?;

        let values = self.state.lock().records.get(&RecordKind::Event).cloned().unwrap_or_default();
        let events: Vec<CalendarEvent> = values.into_iter().map(decode).collect::<ApiResult<_>>()?;
        Ok(events
            .into_iter()
            .filter(|event| event.start.year() == date.year() && event.start.month() == date.month())
            .collect())
    }
}

pub fn store() -> (MockRemote, Store<MockRemote>) {
    let remote = MockRemote::new();
    let store = Store::new(remote.clone());
    (remote, store)
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// Every notice published so far, in order.
pub fn drain(notices: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut seen = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        seen.push(notice);
    }
    seen
}
