mod common;

#[cfg(test)]
mod tests {
    use super::common::{drain, store, MockRemote, Op};
    use chrono::Utc;
    use ihsan::api::ApiError;
    use ihsan::libs::messages::Message;
    use ihsan::libs::record::{Record, RecordKind};
    use ihsan::libs::store::{Notice, Outcome, Store, StoreError, SyncStatus};
    use ihsan::libs::task::{NewTask, Priority, Task, TaskPatch};
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::broadcast;

    struct StoreTestContext {
        remote: MockRemote,
        store: Store<MockRemote>,
        notices: broadcast::Receiver<Notice>,
    }

    impl AsyncTestContext for StoreTestContext {
        async fn setup() -> Self {
            let (remote, store) = store();
            let notices = store.subscribe();
            StoreTestContext { remote, store, notices }
        }
    }

    impl StoreTestContext {
        /// Seeds the server with a task and loads it into the store.
        async fn loaded(&mut self, id: &str, title: &str) -> Task {
            let task = Task::from_draft(id.to_string(), &NewTask::new(title), Utc::now());
            self.remote.seed(&task);
            assert_eq!(self.store.fetch_tasks().settled().await, Outcome::Confirmed);
            drain(&mut self.notices);
            task
        }
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_add_task_visible_before_server_answers(ctx: &mut StoreTestContext) {
        let pending = ctx.store.add_task(NewTask::new("Buy milk")).unwrap();
        let temp_id = pending.id().to_string();

        let tasks = ctx.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, temp_id);
        assert_eq!(tasks[0].title, "Buy milk");
        assert!(!tasks[0].completed);
        assert_eq!(ctx.store.sync_status::<Task>(&temp_id), Some(SyncStatus::Pending));

        assert_eq!(pending.settled().await, Outcome::Confirmed);

        let tasks = ctx.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "srv-1");
        assert_eq!(ctx.store.sync_status::<Task>("srv-1"), Some(SyncStatus::Confirmed));
        // The temporary id keeps resolving after the swap.
        assert_eq!(ctx.store.task(&temp_id).map(|task| task.id), Some("srv-1".to_string()));
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::success(Message::RecordSaved(RecordKind::Task))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_failed_create_keeps_local_record(ctx: &mut StoreTestContext) {
        ctx.remote.fail(RecordKind::Task, Op::Create);

        let pending = ctx.store.add_task(NewTask::new("Call mom")).unwrap();
        let temp_id = pending.id().to_string();
        assert_eq!(pending.settled().await, Outcome::LocalOnly);

        let tasks = ctx.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, temp_id);
        assert_eq!(ctx.store.sync_status::<Task>(&temp_id), Some(SyncStatus::LocalOnly));
        assert_eq!(ctx.store.local_only_count(), 1);
        assert_eq!(ctx.remote.count(RecordKind::Task), 0);
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::warning(Message::RecordSaveFailed(RecordKind::Task))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_blank_title_is_rejected_without_notice(ctx: &mut StoreTestContext) {
        let result = ctx.store.add_task(NewTask::new("   "));

        assert!(matches!(result, Err(StoreError::EmptyField(_))));
        assert!(ctx.store.tasks().is_empty());
        assert_eq!(ctx.remote.calls(RecordKind::Task, Op::Create), 0);
        assert!(drain(&mut ctx.notices).is_empty());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_update_confirmed_by_server(ctx: &mut StoreTestContext) {
        ctx.loaded("t1", "Read a book").await;

        let patch = TaskPatch {
            priority: Some(Priority::High),
            ..Default::default()
        };
        let pending = ctx.store.update_task("t1", patch).unwrap();
        assert_eq!(ctx.store.task("t1").unwrap().priority, Some(Priority::High));
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        assert_eq!(ctx.store.sync_status::<Task>("t1"), Some(SyncStatus::Confirmed));
        assert_eq!(ctx.remote.record::<Task>("t1").unwrap().priority, Some(Priority::High));
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::success(Message::RecordUpdated(RecordKind::Task))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_failed_update_keeps_local_merge(ctx: &mut StoreTestContext) {
        ctx.loaded("t1", "Read a book").await;
        ctx.remote.fail(RecordKind::Task, Op::Update);

        let patch = TaskPatch {
            title: Some("Read two books".to_string()),
            ..Default::default()
        };
        let pending = ctx.store.update_task("t1", patch).unwrap();
        assert_eq!(pending.settled().await, Outcome::LocalOnly);

        assert_eq!(ctx.store.task("t1").unwrap().title, "Read two books");
        assert_eq!(ctx.store.sync_status::<Task>("t1"), Some(SyncStatus::LocalOnly));
        assert_eq!(ctx.remote.record::<Task>("t1").unwrap().title, "Read a book");
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::warning(Message::RecordUpdateFailed(RecordKind::Task))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_complete_task_toggles(ctx: &mut StoreTestContext) {
        ctx.loaded("t1", "Pray Fajr").await;

        let pending = ctx.store.complete_task("t1").unwrap();
        assert!(ctx.store.task("t1").unwrap().completed);
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        let pending = ctx.store.complete_task("t1").unwrap();
        assert!(!ctx.store.task("t1").unwrap().completed);
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        assert_eq!(
            drain(&mut ctx.notices),
            vec![
                Notice::success(Message::TaskStatusUpdated),
                Notice::success(Message::TaskStatusUpdated)
            ]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_unknown_id_is_not_updated(ctx: &mut StoreTestContext) {
        assert!(ctx.store.update_task("missing", TaskPatch::default()).is_none());
        assert!(ctx.store.complete_task("missing").is_none());
        assert_eq!(ctx.remote.calls(RecordKind::Task, Op::Update), 0);
        assert!(drain(&mut ctx.notices).is_empty());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_fetch_replaces_collection(ctx: &mut StoreTestContext) {
        ctx.remote.fail(RecordKind::Task, Op::Create);
        ctx.store.add_task(NewTask::new("Draft")).unwrap().settled().await;
        drain(&mut ctx.notices);

        for (id, title) in [("a", "First"), ("b", "Second")] {
            ctx.remote.seed(&Task::from_draft(id.to_string(), &NewTask::new(title), Utc::now()));
        }
        assert_eq!(ctx.store.fetch_tasks().settled().await, Outcome::Confirmed);

        let ids: Vec<String> = ctx.store.tasks().into_iter().map(|task| task.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(ctx.store.local_only_count(), 0);
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::info(Message::RecordsFetched(RecordKind::Task, 2))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_failed_fetch_keeps_collection(ctx: &mut StoreTestContext) {
        ctx.loaded("t1", "Keep me").await;
        ctx.remote.fail(RecordKind::Task, Op::List);

        assert_eq!(ctx.store.fetch_tasks().settled().await, Outcome::LocalOnly);

        assert_eq!(ctx.store.tasks().len(), 1);
        assert!(!ctx.store.tasks_loading());
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::warning(Message::RecordsFetchFailed(RecordKind::Task))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_loading_flag_while_fetching(ctx: &mut StoreTestContext) {
        let release = ctx.remote.gate(RecordKind::Task, Op::List, "");

        let pending = ctx.store.fetch_tasks();
        assert!(ctx.store.tasks_loading());

        release.send(()).unwrap();
        assert_eq!(pending.settled().await, Outcome::Confirmed);
        assert!(!ctx.store.tasks_loading());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_delete_confirmed(ctx: &mut StoreTestContext) {
        ctx.loaded("t1", "Done already").await;

        let pending = ctx.store.delete_task("t1").unwrap();
        assert!(ctx.store.task("t1").is_none());
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        assert_eq!(ctx.remote.count(RecordKind::Task), 0);
        assert_eq!(ctx.store.sync_status::<Task>("t1"), None);
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::success(Message::RecordDeleted(RecordKind::Task))]
        );
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_delete_of_record_unknown_to_server(ctx: &mut StoreTestContext) {
        ctx.remote.fail(RecordKind::Task, Op::Create);
        let pending = ctx.store.add_task(NewTask::new("Never synced")).unwrap();
        let temp_id = pending.id().to_string();
        pending.settled().await;

        assert_eq!(ctx.store.delete_task(&temp_id).unwrap().settled().await, Outcome::Confirmed);
        assert!(ctx.store.tasks().is_empty());
        assert_eq!(ctx.store.local_only_count(), 0);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_delete_of_unknown_id_does_nothing(ctx: &mut StoreTestContext) {
        ctx.loaded("t1", "Stays").await;

        assert!(ctx.store.delete_task("never-existed").is_none());

        assert_eq!(ctx.store.tasks().len(), 1);
        assert_eq!(ctx.remote.calls(RecordKind::Task, Op::Delete), 0);
        assert!(drain(&mut ctx.notices).is_empty());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_second_delete_while_first_in_flight(ctx: &mut StoreTestContext) {
        let original = ctx.loaded("t1", "Pay rent").await;
        ctx.remote.fail(RecordKind::Task, Op::Delete);

        let first = ctx.store.delete_task("t1").unwrap();
        assert!(ctx.store.delete_task("t1").is_none());
        assert_eq!(first.settled().await, Outcome::Restored);

        assert_eq!(ctx.store.tasks(), vec![original]);
        assert_eq!(ctx.store.sync_status::<Task>("t1"), Some(SyncStatus::Confirmed));
        assert_eq!(ctx.remote.calls(RecordKind::Task, Op::Delete), 1);
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::warning(Message::RecordDeleteFailed(RecordKind::Task))]
        );

        // Once restored, the record can be deleted again.
        ctx.remote.recover(RecordKind::Task, Op::Delete);
        assert_eq!(ctx.store.delete_task("t1").unwrap().settled().await, Outcome::Confirmed);
        assert!(ctx.store.tasks().is_empty());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_repeated_fetch_is_idempotent(ctx: &mut StoreTestContext) {
        for (id, title) in [("a", "Fajr walk"), ("b", "Read"), ("c", "Call mum")] {
            ctx.remote.seed(&Task::from_draft(id.to_string(), &NewTask::new(title), Utc::now()));
        }

        assert!(!ctx.store.tasks_loading());
        assert_eq!(ctx.store.fetch_tasks().settled().await, Outcome::Confirmed);
        assert!(!ctx.store.tasks_loading());
        let first = ctx.store.tasks();

        assert_eq!(ctx.store.fetch_tasks().settled().await, Outcome::Confirmed);
        assert!(!ctx.store.tasks_loading());

        assert_eq!(first.len(), 3);
        assert_eq!(ctx.store.tasks(), first);
        assert_eq!(ctx.store.local_only_count(), 0);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_fetch_single_task(ctx: &mut StoreTestContext) {
        let task = Task::from_draft("t9".to_string(), &NewTask::new("Remote only"), Utc::now());
        ctx.remote.seed(&task);

        let fetched = ctx.store.fetch_task("t9").await.unwrap();
        assert_eq!(fetched.title, "Remote only");
        assert_eq!(ctx.store.task("t9"), Some(fetched));
        assert_eq!(ctx.store.sync_status::<Task>("t9"), Some(SyncStatus::Confirmed));

        let missing = ctx.store.fetch_task("nope").await;
        assert!(matches!(missing, Err(StoreError::Api(ApiError::NotFound { .. }))));
    }
}
