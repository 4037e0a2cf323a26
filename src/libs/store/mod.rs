//! Optimistic sync store.
//!
//! [`Store`] is the single source of truth for tasks, notes, calendar events,
//! categories and local preferences. Mutations take effect locally and
//! synchronously, so a read right after a call already sees them; the
//! matching server call is then spawned on the Tokio runtime and reconciled
//! when it settles:
//!
//! | operation | remote success | remote failure |
//! |-----------|----------------|----------------|
//! | add       | record replaced by the server's (server id) | record kept, flagged local-only |
//! | update    | record replaced by the server's | local merge kept, flagged local-only |
//! | delete    | nothing to do | record restored at the end of the list |
//! | fetch     | collection replaced | collection untouched |
//!
//! Each settled call is announced once on the [`Notice`] channel. Remote
//! failures never surface as errors from the mutation methods.
//!
//! Mutations spawn tasks and must therefore run inside a Tokio runtime.

use crate::api::{ApiError, ApiResult, Backend, Remote};
use crate::libs::category::{find_category, Category, CategoryPatch, NewCategory};
use crate::libs::event::{CalendarEvent, EventPatch, NewEvent};
use crate::libs::messages::Message;
use crate::libs::note::{NewNote, Note, NotePatch};
use crate::libs::preferences::{LifeBalanceArea, LifeBalancePatch, PomodoroPatch, PomodoroSettings, PrayerTime};
use crate::libs::record::{EmptyField, Record};
use crate::libs::task::{NewTask, Task, TaskPatch};
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

mod collection;
mod notice;
mod snapshot;

pub use collection::{Collection, SyncStatus};
pub use notice::{Notice, NoticeLevel};
pub use snapshot::{SnapshotSink, StoreSnapshot, SyncLedger};

const NOTICE_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    EmptyField(#[from] EmptyField),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How a remote call ended, as seen by the local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the call and local state was reconciled with it.
    Confirmed,
    /// The call failed; local state was kept and now differs from the server.
    LocalOnly,
    /// A delete failed and the record was put back.
    Restored,
    /// A newer call for the same record was issued first; this result was dropped.
    Superseded,
    /// The spawned call panicked or was cancelled.
    Abandoned,
}

/// Handle to a spawned remote call.
///
/// Dropping it detaches the call; it still runs to completion.
#[derive(Debug)]
pub struct Pending {
    id: String,
    handle: JoinHandle<Outcome>,
}

impl Pending {
    fn spawn<F>(id: String, future: F) -> Self
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        Pending {
            id,
            handle: tokio::spawn(future),
        }
    }

    /// Id of the record the call is for; the temporary id for creates.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn settled(self) -> Outcome {
        self.handle.await.unwrap_or(Outcome::Abandoned)
    }
}

/// In-memory state behind the store lock.
pub struct StoreState {
    tasks: Collection<Task>,
    notes: Collection<Note>,
    events: Collection<CalendarEvent>,
    categories: Vec<Category>,
    pomodoro_settings: PomodoroSettings,
    prayer_times: Vec<PrayerTime>,
    life_balance_areas: Vec<LifeBalanceArea>,
    next_seq: u64,
    revision: u64,
}

impl StoreState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        StoreState {
            tasks: Collection::restore(snapshot.tasks, snapshot.sync.tasks),
            notes: Collection::restore(snapshot.notes, snapshot.sync.notes),
            events: Collection::restore(snapshot.events, snapshot.sync.events),
            categories: snapshot.categories,
            pomodoro_settings: snapshot.pomodoro_settings,
            prayer_times: snapshot.prayer_times,
            life_balance_areas: snapshot.life_balance_areas,
            next_seq: 1,
            revision: 0,
        }
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.tasks.items().to_vec(),
            notes: self.notes.items().to_vec(),
            events: self.events.items().to_vec(),
            categories: self.categories.clone(),
            pomodoro_settings: self.pomodoro_settings,
            prayer_times: self.prayer_times.clone(),
            life_balance_areas: self.life_balance_areas.clone(),
            sync: SyncLedger {
                tasks: self.tasks.statuses().clone(),
                notes: self.notes.statuses().clone(),
                events: self.events.statuses().clone(),
            },
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Record kinds the store keeps a [`Collection`] for.
pub trait Stored: Record {
    fn collection(state: &StoreState) -> &Collection<Self>;

    fn collection_mut(state: &mut StoreState) -> &mut Collection<Self>;
}

impl Stored for Task {
    fn collection(state: &StoreState) -> &Collection<Self> {
        &state.tasks
    }

    fn collection_mut(state: &mut StoreState) -> &mut Collection<Self> {
        &mut state.tasks
    }
}

impl Stored for Note {
    fn collection(state: &StoreState) -> &Collection<Self> {
        &state.notes
    }

    fn collection_mut(state: &mut StoreState) -> &mut Collection<Self> {
        &mut state.notes
    }
}

impl Stored for CalendarEvent {
    fn collection(state: &StoreState) -> &Collection<Self> {
        &state.events
    }

    fn collection_mut(state: &mut StoreState) -> &mut Collection<Self> {
        &mut state.events
    }
}

struct Persistence {
    sink: Box<dyn SnapshotSink>,
    slot: String,
    saved_revision: Mutex<u64>,
}

struct Inner<B> {
    backend: B,
    state: Mutex<StoreState>,
    notices: broadcast::Sender<Notice>,
    revision: watch::Sender<u64>,
    persistence: Option<Persistence>,
}

impl<B> Inner<B> {
    fn notify(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }

    fn persist(&self, revision: u64, snapshot: StoreSnapshot) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let mut saved = persistence.saved_revision.lock();
        if revision <= *saved {
            return;
        }
        match persistence.sink.save(&persistence.slot, &snapshot) {
            Ok(()) => *saved = revision,
            Err(e) => {
                warn!(slot = %persistence.slot, error = %e, "failed to persist store snapshot");
                self.notify(Notice::warning(Message::SnapshotSaveFailed(e.to_string())));
            }
        }
    }
}

/// Cheap-to-clone handle to the shared store.
pub struct Store<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for Store<B> {
    fn clone(&self) -> Self {
        Store {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend> Store<B> {
    /// In-memory store starting from defaults, without persistence.
    pub fn new(backend: B) -> Self {
        Self::build(backend, StoreSnapshot::default(), None)
    }

    /// Opens a store persisted in `slot` of `sink`. A snapshot that cannot
    /// be read is logged and replaced by defaults.
    pub fn open(backend: B, sink: impl SnapshotSink, slot: &str) -> Self {
        let snapshot = match sink.load(slot) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => StoreSnapshot::default(),
            Err(e) => {
                warn!(slot, error = %e, "failed to load store snapshot, starting fresh");
                StoreSnapshot::default()
            }
        };
        let persistence = Persistence {
            sink: Box::new(sink),
            slot: slot.to_string(),
            saved_revision: Mutex::new(0),
        };
        Self::build(backend, snapshot, Some(persistence))
    }

    fn build(backend: B, snapshot: StoreSnapshot, persistence: Option<Persistence>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let (revision, _) = watch::channel(0);
        Store {
            inner: Arc::new(Inner {
                backend,
                state: Mutex::new(StoreState::from_snapshot(snapshot)),
                notices,
                revision,
                persistence,
            }),
        }
    }

    /// Notifications for every settled remote call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Revision counter bumped on every state change.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Runs `f` under the state lock, then publishes the new revision and
    /// persists the result. The lock is released before any I/O.
    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let (result, revision, snapshot) = {
            let mut state = self.inner.state.lock();
            let result = f(&mut *state);
            state.revision += 1;
            let snapshot = self.inner.persistence.as_ref().map(|_| state.snapshot());
            (result, state.revision, snapshot)
        };
        self.inner.revision.send_replace(revision);
        if let Some(snapshot) = snapshot {
            self.inner.persist(revision, snapshot);
        }
        result
    }

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&*self.inner.state.lock())
    }

    // === GENERIC FLOWS ===

    fn add<T>(&self, draft: T::Draft) -> Result<Pending, StoreError>
    where
        T: Stored,
        B: Remote<T>,
    {
        T::validate(&draft)?;
        let temp_id = Uuid::new_v4().to_string();
        let record = T::from_draft(temp_id.clone(), &draft, Utc::now());
        let seq = self.mutate(|state| {
            let seq = state.next_seq();
            let collection = T::collection_mut(state);
            collection.push(record);
            collection.begin(&temp_id, seq);
            seq
        });
        debug!(kind = %T::KIND, id = %temp_id, seq, "create issued");

        let store = self.clone();
        let id = temp_id.clone();
        Ok(Pending::spawn(temp_id, async move {
            let result = <B as Remote<T>>::create(&store.inner.backend, &draft).await;
            let server_id = result.as_ref().ok().map(|record| record.id().to_string());
            let outcome = store.settle_create::<T>(&id, seq, result);
            if let (Outcome::Superseded, Some(server_id)) = (outcome, server_id) {
                // Deleted locally while the create was in flight.
                if let Err(e) = <B as Remote<T>>::delete(&store.inner.backend, &server_id).await {
                    warn!(kind = %T::KIND, id = %server_id, error = %e, "orphaned server record not deleted");
                }
            }
            outcome
        }))
    }

    fn settle_create<T: Stored>(&self, temp_id: &str, seq: u64, result: ApiResult<T>) -> Outcome {
        match result {
            Ok(server) => {
                let server_id = server.id().to_string();
                let outcome = self.mutate(|state| T::collection_mut(state).confirm_create(temp_id, seq, server));
                debug!(kind = %T::KIND, id = %temp_id, server_id = %server_id, seq, ?outcome, "create settled");
                if outcome == Outcome::Confirmed {
                    self.inner.notify(Notice::success(Message::RecordSaved(T::KIND)));
                }
                outcome
            }
            Err(e) => {
                warn!(kind = %T::KIND, id = %temp_id, seq, error = %e, "create failed, keeping local record");
                let outcome = self.mutate(|state| T::collection_mut(state).fail_create(temp_id, seq));
                if outcome == Outcome::LocalOnly {
                    self.inner.notify(Notice::warning(Message::RecordSaveFailed(T::KIND)));
                }
                outcome
            }
        }
    }

    fn update<T>(&self, id: &str, patch: T::Patch, confirmed: Message, failed: Message) -> Option<Pending>
    where
        T: Stored,
        B: Remote<T>,
    {
        let now = Utc::now();
        let seq = self.mutate(|state| {
            if !T::collection_mut(state).modify(id, |record| record.apply(&patch, now)) {
                return None;
            }
            let seq = state.next_seq();
            T::collection_mut(state).begin(id, seq);
            Some(seq)
        })?;
        debug!(kind = %T::KIND, id, seq, "update issued");

        let store = self.clone();
        let id = id.to_string();
        let call_id = id.clone();
        Some(Pending::spawn(id, async move {
            let result = <B as Remote<T>>::update(&store.inner.backend, &call_id, &patch).await;
            match result {
                Ok(server) => {
                    let outcome = store.mutate(|state| T::collection_mut(state).confirm_update(&call_id, seq, server));
                    debug!(kind = %T::KIND, id = %call_id, seq, ?outcome, "update settled");
                    if outcome == Outcome::Confirmed {
                        store.inner.notify(Notice::success(confirmed));
                    }
                    outcome
                }
                Err(e) => {
                    warn!(kind = %T::KIND, id = %call_id, seq, error = %e, "update failed, keeping local changes");
                    let outcome = store.mutate(|state| T::collection_mut(state).fail_update(&call_id, seq));
                    if outcome == Outcome::LocalOnly {
                        store.inner.notify(Notice::warning(failed));
                    }
                    outcome
                }
            }
        }))
    }

    fn remove<T>(&self, id: &str) -> Option<Pending>
    where
        T: Stored,
        B: Remote<T>,
    {
        let (captured, seq) = self.mutate(|state| {
            let captured = T::collection_mut(state).take(id)?;
            let seq = state.next_seq();
            T::collection_mut(state).begin(id, seq);
            Some((captured, seq))
        })?;
        debug!(kind = %T::KIND, id, seq, "delete issued");

        let store = self.clone();
        let id = id.to_string();
        let call_id = id.clone();
        Some(Pending::spawn(id, async move {
            let result = <B as Remote<T>>::delete(&store.inner.backend, &call_id).await;
            match result {
                // Already gone on the server, which is what was asked for.
                Ok(()) | Err(ApiError::NotFound { .. }) => {
                    let outcome = store.mutate(|state| T::collection_mut(state).confirm_delete(&call_id, seq));
                    store.inner.notify(Notice::success(Message::RecordDeleted(T::KIND)));
                    outcome
                }
                Err(e) => {
                    warn!(kind = %T::KIND, id = %call_id, seq, error = %e, "delete failed, restoring record");
                    let outcome = store.mutate(|state| T::collection_mut(state).fail_delete(&call_id, seq, captured));
                    if outcome != Outcome::Superseded {
                        store.inner.notify(Notice::warning(Message::RecordDeleteFailed(T::KIND)));
                    }
                    outcome
                }
            }
        }))
    }

    fn fetch_all<T>(&self) -> Pending
    where
        T: Stored,
        B: Remote<T>,
    {
        let seq = self.mutate(|state| {
            let seq = state.next_seq();
            T::collection_mut(state).start_loading();
            seq
        });
        debug!(kind = %T::KIND, seq, "list issued");

        let store = self.clone();
        Pending::spawn(T::KIND.path().to_string(), async move {
            let result = <B as Remote<T>>::list(&store.inner.backend).await;
            store.settle_list::<T>(seq, result)
        })
    }

    fn settle_list<T: Stored>(&self, seq: u64, result: ApiResult<Vec<T>>) -> Outcome {
        match result {
            Ok(items) => {
                let count = items.len();
                let outcome = self.mutate(|state| {
                    let collection = T::collection_mut(state);
                    collection.finish_loading();
                    collection.replace_all(seq, items)
                });
                debug!(kind = %T::KIND, seq, count, ?outcome, "list settled");
                if outcome == Outcome::Confirmed {
                    self.inner.notify(Notice::info(Message::RecordsFetched(T::KIND, count)));
                }
                outcome
            }
            Err(e) => {
                warn!(kind = %T::KIND, seq, error = %e, "list failed, keeping local collection");
                self.mutate(|state| T::collection_mut(state).finish_loading());
                self.inner.notify(Notice::warning(Message::RecordsFetchFailed(T::KIND)));
                Outcome::LocalOnly
            }
        }
    }

    async fn fetch_one<T>(&self, id: &str) -> Result<T, StoreError>
    where
        T: Stored,
        B: Remote<T>,
    {
        let record = <B as Remote<T>>::get(&self.inner.backend, id).await?;
        self.mutate(|state| T::collection_mut(state).upsert(record.clone()));
        Ok(record)
    }

    pub fn sync_status<T: Stored>(&self, id: &str) -> Option<SyncStatus> {
        self.read(|state| T::collection(state).status(id))
    }

    /// Every record of a kind next to its sync status, in stored order.
    pub fn with_status<T: Stored>(&self) -> Vec<(T, Option<SyncStatus>)> {
        self.read(|state| {
            let collection = T::collection(state);
            collection
                .items()
                .iter()
                .map(|record| (record.clone(), collection.status(record.id())))
                .collect()
        })
    }

    /// Records across all kinds whose last remote call failed.
    pub fn local_only_count(&self) -> usize {
        self.read(|state| state.tasks.local_only() + state.notes.local_only() + state.events.local_only())
    }

    // === TASKS ===

    pub fn tasks(&self) -> Vec<Task> {
        self.read(|state| state.tasks.items().to_vec())
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.read(|state| state.tasks.get(id).cloned())
    }

    pub fn tasks_loading(&self) -> bool {
        self.read(|state| state.tasks.is_loading())
    }

    pub fn add_task(&self, task: NewTask) -> Result<Pending, StoreError> {
        self.add::<Task>(task)
    }

    /// `None` when no task has this id.
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Option<Pending> {
        self.update::<Task>(id, patch, Message::RecordUpdated(Task::KIND), Message::RecordUpdateFailed(Task::KIND))
    }

    /// Flips the completion flag. `None` when no task has this id.
    pub fn complete_task(&self, id: &str) -> Option<Pending> {
        let completed = self.task(id)?.completed;
        let patch = TaskPatch {
            completed: Some(!completed),
            ..Default::default()
        };
        self.update::<Task>(id, patch, Message::TaskStatusUpdated, Message::TaskStatusUpdateFailed)
    }

    /// `None` when no task has this id; nothing is sent then.
    pub fn delete_task(&self, id: &str) -> Option<Pending> {
        self.remove::<Task>(id)
    }

    pub fn fetch_tasks(&self) -> Pending {
        self.fetch_all::<Task>()
    }

    pub async fn fetch_task(&self, id: &str) -> Result<Task, StoreError> {
        self.fetch_one::<Task>(id).await
    }

    // === NOTES ===

    pub fn notes(&self) -> Vec<Note> {
        self.read(|state| state.notes.items().to_vec())
    }

    pub fn note(&self, id: &str) -> Option<Note> {
        self.read(|state| state.notes.get(id).cloned())
    }

    pub fn notes_loading(&self) -> bool {
        self.read(|state| state.notes.is_loading())
    }

    pub fn add_note(&self, note: NewNote) -> Result<Pending, StoreError> {
        self.add::<Note>(note)
    }

    pub fn update_note(&self, id: &str, patch: NotePatch) -> Option<Pending> {
        self.update::<Note>(id, patch, Message::RecordUpdated(Note::KIND), Message::RecordUpdateFailed(Note::KIND))
    }

    /// `None` when no note has this id; nothing is sent then.
    pub fn delete_note(&self, id: &str) -> Option<Pending> {
        self.remove::<Note>(id)
    }

    pub fn fetch_notes(&self) -> Pending {
        self.fetch_all::<Note>()
    }

    pub async fn fetch_note(&self, id: &str) -> Result<Note, StoreError> {
        self.fetch_one::<Note>(id).await
    }

    // === EVENTS ===

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.read(|state| state.events.items().to_vec())
    }

    pub fn event(&self, id: &str) -> Option<CalendarEvent> {
        self.read(|state| state.events.get(id).cloned())
    }

    pub fn events_loading(&self) -> bool {
        self.read(|state| state.events.is_loading())
    }

    pub fn add_event(&self, event: NewEvent) -> Result<Pending, StoreError> {
        self.add::<CalendarEvent>(event)
    }

    pub fn update_event(&self, id: &str, patch: EventPatch) -> Option<Pending> {
        self.update::<CalendarEvent>(
            id,
            patch,
            Message::RecordUpdated(CalendarEvent::KIND),
            Message::RecordUpdateFailed(CalendarEvent::KIND),
        )
    }

    /// `None` when no event has this id; nothing is sent then.
    pub fn delete_event(&self, id: &str) -> Option<Pending> {
        self.remove::<CalendarEvent>(id)
    }

    pub fn fetch_events(&self) -> Pending {
        self.fetch_all::<CalendarEvent>()
    }

    pub async fn fetch_event(&self, id: &str) -> Result<CalendarEvent, StoreError> {
        self.fetch_one::<CalendarEvent>(id).await
    }

    /// Loads the events of the month containing `date` and merges them into
    /// the local collection. Events outside the month are left alone.
    pub fn fetch_events_in_month(&self, date: NaiveDate) -> Pending {
        self.mutate(|state| state.events.start_loading());
        debug!(month = %date.format("%Y-%m"), "month list issued");

        let store = self.clone();
        Pending::spawn(format!("events/{}", date.format("%Y-%m")), async move {
            let result = store.inner.backend.list_month(date).await;
            match result {
                Ok(events) => {
                    let count = events.len();
                    store.mutate(|state| {
                        state.events.finish_loading();
                        for event in events {
                            state.events.upsert(event);
                        }
                    });
                    store.inner.notify(Notice::info(Message::RecordsFetched(CalendarEvent::KIND, count)));
                    Outcome::Confirmed
                }
                Err(e) => {
                    warn!(month = %date.format("%Y-%m"), error = %e, "month list failed");
                    store.mutate(|state| state.events.finish_loading());
                    store.inner.notify(Notice::warning(Message::RecordsFetchFailed(CalendarEvent::KIND)));
                    Outcome::LocalOnly
                }
            }
        })
    }

    // === CATEGORIES ===

    pub fn categories(&self) -> Vec<Category> {
        self.read(|state| state.categories.clone())
    }

    /// Resolves a category reference; `None` for unknown or deleted ids.
    pub fn category(&self, id: &str) -> Option<Category> {
        self.read(|state| find_category(&state.categories, id).cloned())
    }

    pub fn add_category(&self, category: NewCategory) -> Category {
        let category = Category::new(&category);
        let added = category.clone();
        self.mutate(|state| state.categories.push(category));
        added
    }

    pub fn update_category(&self, id: &str, patch: CategoryPatch) -> Option<Category> {
        self.mutate(|state| {
            let category = state.categories.iter_mut().find(|category| category.id == id)?;
            category.apply(&patch);
            Some(category.clone())
        })
    }

    /// References from tasks, notes and events are left dangling.
    pub fn delete_category(&self, id: &str) -> Option<Category> {
        self.mutate(|state| {
            let pos = state.categories.iter().position(|category| category.id == id)?;
            Some(state.categories.remove(pos))
        })
    }

    // === PREFERENCES ===

    pub fn pomodoro_settings(&self) -> PomodoroSettings {
        self.read(|state| state.pomodoro_settings)
    }

    pub fn update_pomodoro_settings(&self, patch: PomodoroPatch) -> PomodoroSettings {
        self.mutate(|state| {
            state.pomodoro_settings.apply(&patch);
            state.pomodoro_settings
        })
    }

    pub fn prayer_times(&self) -> Vec<PrayerTime> {
        self.read(|state| state.prayer_times.clone())
    }

    pub fn life_balance_areas(&self) -> Vec<LifeBalanceArea> {
        self.read(|state| state.life_balance_areas.clone())
    }

    pub fn update_life_balance_area(&self, id: &str, patch: LifeBalancePatch) -> Option<LifeBalanceArea> {
        self.mutate(|state| {
            let area = state.life_balance_areas.iter_mut().find(|area| area.id == id)?;
            area.apply(&patch);
            Some(area.clone())
        })
    }
}
