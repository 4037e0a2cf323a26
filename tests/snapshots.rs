mod common;

#[cfg(test)]
mod tests {
    use super::common::{MockRemote, Op};
    use ihsan::db::Snapshots;
    use ihsan::libs::preferences::PomodoroPatch;
    use ihsan::libs::record::RecordKind;
    use ihsan::libs::store::{SnapshotSink, Store, SyncStatus};
    use ihsan::libs::task::{NewTask, Task};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    const SLOT: &str = "life-dashboard-storage";

    struct SnapshotTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
        remote: MockRemote,
    }

    impl AsyncTestContext for SnapshotTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            let db_path = temp_dir.path().join("ihsan.db");

            SnapshotTestContext {
                _temp_dir: temp_dir,
                db_path,
                remote: MockRemote::new(),
            }
        }
    }

    impl SnapshotTestContext {
        fn open(&self, slot: &str) -> Store<MockRemote> {
            Store::open(self.remote.clone(), Snapshots::open(&self.db_path).unwrap(), slot)
        }
    }

    #[test_context(SnapshotTestContext)]
    #[tokio::test]
    async fn test_state_survives_restart(ctx: &mut SnapshotTestContext) {
        {
            let store = ctx.open(SLOT);
            store.add_task(NewTask::new("Buy dates")).unwrap().settled().await;
            store.update_pomodoro_settings(PomodoroPatch {
                work_duration: Some(45),
                ..Default::default()
            });
        }

        let store = ctx.open(SLOT);
        let tasks = store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "srv-1");
        assert_eq!(tasks[0].title, "Buy dates");
        assert_eq!(store.sync_status::<Task>("srv-1"), Some(SyncStatus::Confirmed));
        assert_eq!(store.pomodoro_settings().work_duration, 45);
    }

    #[test_context(SnapshotTestContext)]
    #[tokio::test]
    async fn test_in_flight_create_reloads_as_local_only(ctx: &mut SnapshotTestContext) {
        let _held = ctx.remote.gate(RecordKind::Task, Op::Create, "Unsent");
        let temp_id = {
            let store = ctx.open(SLOT);
            let pending = store.add_task(NewTask::new("Unsent")).unwrap();
            assert_eq!(store.sync_status::<Task>(pending.id()), Some(SyncStatus::Pending));
            pending.id().to_string()
        };

        let store = ctx.open(SLOT);
        assert_eq!(store.tasks()[0].id, temp_id);
        assert_eq!(store.sync_status::<Task>(&temp_id), Some(SyncStatus::LocalOnly));
        assert_eq!(store.local_only_count(), 1);
    }

    #[test_context(SnapshotTestContext)]
    #[tokio::test]
    async fn test_slots_are_separate(ctx: &mut SnapshotTestContext) {
        ctx.open("first").add_task(NewTask::new("Only here")).unwrap().settled().await;

        assert_eq!(ctx.open("first").tasks().len(), 1);
        assert!(ctx.open("second").tasks().is_empty());
    }

    #[test_context(SnapshotTestContext)]
    #[tokio::test]
    async fn test_unreadable_snapshot_falls_back_to_defaults(ctx: &mut SnapshotTestContext) {
        Snapshots::open(&ctx.db_path).unwrap();
        let conn = rusqlite::Connection::open(&ctx.db_path).unwrap();
        conn.execute("INSERT INTO snapshots (slot, payload) VALUES (?1, ?2)", ["broken", "{not json"])
            .unwrap();

        let store = ctx.open("broken");
        assert!(store.tasks().is_empty());
        assert_eq!(store.categories().len(), 5);
    }

    #[test_context(SnapshotTestContext)]
    #[tokio::test]
    async fn test_delete_slot(ctx: &mut SnapshotTestContext) {
        let snapshots = Snapshots::open(&ctx.db_path).unwrap();
        snapshots.save(SLOT, &Default::default()).unwrap();
        assert!(snapshots.load(SLOT).unwrap().is_some());

        snapshots.delete(SLOT).unwrap();
        assert!(snapshots.load(SLOT).unwrap().is_none());
    }
}
