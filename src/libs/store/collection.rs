//! One kind's records plus the bookkeeping that reconciles them with the
//! server.
//!
//! Every remote call issued for a record id takes a sequence number from the
//! store. Only the newest call per id may write its result back; anything
//! older is reported as superseded and dropped. A create that is confirmed
//! after the record was edited locally only adopts the server id.

use super::Outcome;
use crate::libs::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a record stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    /// A remote call for this record is in flight.
    Pending,
    Confirmed,
    /// The last remote call failed; local fields differ from the server.
    LocalOnly,
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    loading: u32,
    latest: HashMap<String, u64>,
    status: HashMap<String, SyncStatus>,
    renamed: HashMap<String, String>,
    listed_seq: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            items: Vec::new(),
            loading: 0,
            latest: HashMap::new(),
            status: HashMap::new(),
            renamed: HashMap::new(),
            listed_seq: 0,
        }
    }
}

impl<T: Record> Collection<T> {
    /// Rebuilds a collection from persisted state. Calls that were in flight
    /// died with the previous process, so their records come back local-only.
    pub fn restore(items: Vec<T>, status: HashMap<String, SyncStatus>) -> Self {
        let status = status
            .into_iter()
            .filter(|(id, _)| items.iter().any(|item| item.id() == id))
            .map(|(id, status)| match status {
                SyncStatus::Pending => (id, SyncStatus::LocalOnly),
                other => (id, other),
            })
            .collect();
        Collection {
            items,
            status,
            ..Default::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        let id = self.resolve(id);
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub fn status(&self, id: &str) -> Option<SyncStatus> {
        self.status.get(self.resolve(id)).copied()
    }

    pub fn statuses(&self) -> &HashMap<String, SyncStatus> {
        &self.status
    }

    pub fn local_only(&self) -> usize {
        self.status.values().filter(|s| **s == SyncStatus::LocalOnly).count()
    }

    /// Follows temporary ids to the server id they were confirmed as.
    fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.renamed.get(id).map(String::as_str).unwrap_or(id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn is_latest(&self, id: &str, seq: u64) -> bool {
        self.latest.get(id) == Some(&seq)
    }

    fn forget(&mut self, id: &str) {
        self.latest.remove(id);
        self.status.remove(id);
    }

    /// Records that a remote call with sequence `seq` was issued for `id`.
    pub fn begin(&mut self, id: &str, seq: u64) {
        let id = self.resolve(id).to_string();
        self.latest.insert(id.clone(), seq);
        self.status.insert(id, SyncStatus::Pending);
    }

    pub fn push(&mut self, record: T) {
        self.items.push(record);
    }

    /// Applies `f` to the record, returning `false` when it is unknown.
    pub fn modify(&mut self, id: &str, f: impl FnOnce(&mut T)) -> bool {
        let id = self.resolve(id).to_string();
        match self.position(&id) {
            Some(pos) => {
                f(&mut self.items[pos]);
                true
            }
            None => false,
        }
    }

    /// Removes the record, returning it with its sync status so a failed
    /// remote delete can put it back.
    pub fn take(&mut self, id: &str) -> Option<(T, Option<SyncStatus>)> {
        let id = self.resolve(id).to_string();
        let pos = self.position(&id)?;
        let record = self.items.remove(pos);
        Some((record, self.status.get(&id).copied()))
    }

    /// Inserts or replaces a record fetched from the server.
    pub fn upsert(&mut self, record: T) {
        let id = record.id().to_string();
        match self.position(&id) {
            Some(pos) => self.items[pos] = record,
            None => self.items.push(record),
        }
        if !self.latest.contains_key(&id) {
            self.status.insert(id, SyncStatus::Confirmed);
        }
    }

    pub fn confirm_create(&mut self, temp_id: &str, seq: u64, server: T) -> Outcome {
        let latest = self.is_latest(temp_id, seq);
        let server_id = server.id().to_string();

        match self.position(temp_id) {
            Some(pos) if latest => self.items[pos] = server,
            Some(pos) => self.items[pos].set_id(server_id.clone()),
            // Wiped by a list refresh that ran before the server created it.
            None if latest => {
                if self.position(&server_id).is_none() {
                    self.items.push(server);
                }
            }
            // Deleted locally while the create was in flight.
            None => return Outcome::Superseded,
        }

        let newer = self.latest.remove(temp_id);
        let prior = self.status.remove(temp_id);
        self.renamed.insert(temp_id.to_string(), server_id.clone());
        if latest {
            self.status.insert(server_id, SyncStatus::Confirmed);
        } else if let Some(newer) = newer {
            self.latest.insert(server_id.clone(), newer);
            self.status.insert(server_id, SyncStatus::Pending);
        } else if let Some(prior) = prior {
            // A later call already settled, so its verdict stands.
            self.status.insert(server_id, prior);
        }
        Outcome::Confirmed
    }

    pub fn fail_create(&mut self, temp_id: &str, seq: u64) -> Outcome {
        if self.position(temp_id).is_none() {
            return Outcome::Superseded;
        }
        if self.is_latest(temp_id, seq) {
            self.latest.remove(temp_id);
        }
        self.status.insert(temp_id.to_string(), SyncStatus::LocalOnly);
        Outcome::LocalOnly
    }

    pub fn confirm_update(&mut self, id: &str, seq: u64, mut server: T) -> Outcome {
        let id = self.resolve(id).to_string();
        if !self.is_latest(&id, seq) {
            return Outcome::Superseded;
        }
        self.latest.remove(&id);
        match self.position(&id) {
            Some(pos) => {
                server.set_id(id.clone());
                self.items[pos] = server;
                self.status.insert(id, SyncStatus::Confirmed);
                Outcome::Confirmed
            }
            None => {
                self.status.remove(&id);
                Outcome::Superseded
            }
        }
    }

    /// The local merge is kept; the record is flagged as diverged.
    pub fn fail_update(&mut self, id: &str, seq: u64) -> Outcome {
        let id = self.resolve(id).to_string();
        if !self.is_latest(&id, seq) {
            return Outcome::Superseded;
        }
        self.latest.remove(&id);
        self.status.insert(id, SyncStatus::LocalOnly);
        Outcome::LocalOnly
    }

    pub fn confirm_delete(&mut self, id: &str, seq: u64) -> Outcome {
        let id = self.resolve(id).to_string();
        if self.is_latest(&id, seq) {
            self.forget(&id);
        }
        Outcome::Confirmed
    }

    /// Puts the captured record back at the end of the collection unless a
    /// record with the same id has reappeared in the meantime.
    pub fn fail_delete(&mut self, id: &str, seq: u64, captured: (T, Option<SyncStatus>)) -> Outcome {
        let id = self.resolve(id).to_string();
        if self.is_latest(&id, seq) {
            self.latest.remove(&id);
        }
        let (record, status) = captured;
        if self.position(record.id()).is_some() {
            return Outcome::Superseded;
        }
        let restored_id = record.id().to_string();
        self.items.push(record);
        match status {
            Some(SyncStatus::Pending) | None => self.status.insert(restored_id, SyncStatus::Confirmed),
            Some(status) => self.status.insert(restored_id, status),
        };
        Outcome::Restored
    }

    pub fn start_loading(&mut self) {
        self.loading += 1;
    }

    pub fn finish_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    /// Replaces every record with the server's list unless a newer list
    /// has already been applied.
    pub fn replace_all(&mut self, seq: u64, items: Vec<T>) -> Outcome {
        if seq < self.listed_seq {
            return Outcome::Superseded;
        }
        self.listed_seq = seq;
        let latest = &self.latest;
        self.status.retain(|id, _| latest.contains_key(id));
        for item in &items {
            self.status.entry(item.id().to_string()).or_insert(SyncStatus::Confirmed);
        }
        self.items = items;
        Outcome::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::{NewTask, Task, TaskPatch};
    use chrono::Utc;

    fn task(id: &str, title: &str) -> Task {
        Task::from_draft(id.to_string(), &NewTask::new(title), Utc::now())
    }

    #[test]
    fn test_confirm_create_replaces_record() {
        let mut c = Collection::default();
        c.push(task("tmp", "Buy milk"));
        c.begin("tmp", 1);

        assert_eq!(c.confirm_create("tmp", 1, task("srv-1", "Buy milk")), Outcome::Confirmed);
        assert_eq!(c.items().len(), 1);
        assert_eq!(c.items()[0].id, "srv-1");
        assert_eq!(c.status("srv-1"), Some(SyncStatus::Confirmed));
        assert_eq!(c.status("tmp"), Some(SyncStatus::Confirmed));
    }

    #[test]
    fn test_create_confirmed_after_edit_keeps_edit() {
        let mut c = Collection::default();
        c.push(task("tmp", "Buy milk"));
        c.begin("tmp", 1);
        c.modify("tmp", |t| {
            t.apply(
                &TaskPatch {
                    title: Some("Buy oat milk".to_string()),
                    ..Default::default()
                },
                Utc::now(),
            )
        });
        c.begin("tmp", 2);

        assert_eq!(c.confirm_create("tmp", 1, task("srv-1", "Buy milk")), Outcome::Confirmed);
        assert_eq!(c.items()[0].id, "srv-1");
        assert_eq!(c.items()[0].title, "Buy oat milk");
        assert_eq!(c.status("srv-1"), Some(SyncStatus::Pending));

        // The edit was sent under the temporary id and is resolved through it.
        assert_eq!(c.fail_update("tmp", 2), Outcome::LocalOnly);
        assert_eq!(c.status("srv-1"), Some(SyncStatus::LocalOnly));
    }

    #[test]
    fn test_stale_update_is_superseded() {
        let mut c = Collection::default();
        c.push(task("t1", "a"));
        c.begin("t1", 1);
        c.begin("t1", 2);

        assert_eq!(c.confirm_update("t1", 2, task("t1", "second")), Outcome::Confirmed);
        assert_eq!(c.confirm_update("t1", 1, task("t1", "first")), Outcome::Superseded);
        assert_eq!(c.items()[0].title, "second");
    }

    #[test]
    fn test_fail_delete_restores_at_end() {
        let mut c = Collection::default();
        c.push(task("a", "a"));
        c.push(task("b", "b"));
        let captured = c.take("a").unwrap();
        c.begin("a", 1);

        assert_eq!(c.fail_delete("a", 1, captured), Outcome::Restored);
        let ids: Vec<&str> = c.items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_restore_downgrades_pending() {
        let mut status = HashMap::new();
        status.insert("a".to_string(), SyncStatus::Pending);
        status.insert("gone".to_string(), SyncStatus::Confirmed);
        let c = Collection::restore(vec![task("a", "a")], status);

        assert_eq!(c.status("a"), Some(SyncStatus::LocalOnly));
        assert_eq!(c.status("gone"), None);
        assert_eq!(c.local_only(), 1);
    }

    #[test]
    fn test_older_list_does_not_overwrite_newer() {
        let mut c: Collection<Task> = Collection::default();
        assert_eq!(c.replace_all(5, vec![task("new", "new")]), Outcome::Confirmed);
        assert_eq!(c.replace_all(3, vec![task("old", "old")]), Outcome::Superseded);
        assert_eq!(c.items()[0].id, "new");
    }
}
