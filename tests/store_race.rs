mod common;

#[cfg(test)]
mod tests {
    use super::common::{drain, store, MockRemote, Op};
    use chrono::Utc;
    use ihsan::libs::messages::Message;
    use ihsan::libs::record::{Record, RecordKind};
    use ihsan::libs::store::{Notice, Outcome, Store, SyncStatus};
    use ihsan::libs::task::{NewTask, Task, TaskPatch};
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::broadcast;

    struct RaceTestContext {
        remote: MockRemote,
        store: Store<MockRemote>,
        notices: broadcast::Receiver<Notice>,
    }

    impl AsyncTestContext for RaceTestContext {
        async fn setup() -> Self {
            let (remote, store) = store();
            let notices = store.subscribe();
            RaceTestContext { remote, store, notices }
        }
    }

    fn retitle(title: &str) -> TaskPatch {
        TaskPatch {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test_context(RaceTestContext)]
    #[tokio::test]
    async fn test_stale_update_is_dropped(ctx: &mut RaceTestContext) {
        ctx.remote.seed(&Task::from_draft("t1".to_string(), &NewTask::new("Plan"), Utc::now()));
        ctx.store.fetch_tasks().settled().await;
        drain(&mut ctx.notices);

        let release = ctx.remote.gate(RecordKind::Task, Op::Update, "first");
        let first = ctx.store.update_task("t1", retitle("first")).unwrap();
        let second = ctx.store.update_task("t1", retitle("second")).unwrap();

        assert_eq!(second.settled().await, Outcome::Confirmed);
        release.send(()).unwrap();
        assert_eq!(first.settled().await, Outcome::Superseded);

        assert_eq!(ctx.store.task("t1").unwrap().title, "second");
        assert_eq!(ctx.store.sync_status::<Task>("t1"), Some(SyncStatus::Confirmed));
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::success(Message::RecordUpdated(RecordKind::Task))]
        );
    }

    #[test_context(RaceTestContext)]
    #[tokio::test]
    async fn test_create_confirmed_after_failed_edit_keeps_edit(ctx: &mut RaceTestContext) {
        let release = ctx.remote.gate(RecordKind::Task, Op::Create, "Buy milk");
        let create = ctx.store.add_task(NewTask::new("Buy milk")).unwrap();
        let temp_id = create.id().to_string();

        // The server has not heard of the temporary id yet.
        let edit = ctx.store.update_task(&temp_id, retitle("Buy oat milk")).unwrap();
        assert_eq!(edit.settled().await, Outcome::LocalOnly);

        release.send(()).unwrap();
        assert_eq!(create.settled().await, Outcome::Confirmed);

        let tasks = ctx.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "srv-1");
        assert_eq!(tasks[0].title, "Buy oat milk");
        assert_eq!(ctx.store.sync_status::<Task>("srv-1"), Some(SyncStatus::LocalOnly));
    }

    #[test_context(RaceTestContext)]
    #[tokio::test]
    async fn test_create_confirmed_during_edit_stays_pending(ctx: &mut RaceTestContext) {
        let release_create = ctx.remote.gate(RecordKind::Task, Op::Create, "Buy milk");
        let release_edit = ctx.remote.gate(RecordKind::Task, Op::Update, "oat");
        let create = ctx.store.add_task(NewTask::new("Buy milk")).unwrap();
        let temp_id = create.id().to_string();
        let edit = ctx.store.update_task(&temp_id, retitle("Buy oat milk")).unwrap();

        release_create.send(()).unwrap();
        assert_eq!(create.settled().await, Outcome::Confirmed);
        assert_eq!(ctx.store.task("srv-1").unwrap().title, "Buy oat milk");
        assert_eq!(ctx.store.sync_status::<Task>("srv-1"), Some(SyncStatus::Pending));

        release_edit.send(()).unwrap();
        assert_eq!(edit.settled().await, Outcome::LocalOnly);
        assert_eq!(ctx.store.sync_status::<Task>("srv-1"), Some(SyncStatus::LocalOnly));
    }

    #[test_context(RaceTestContext)]
    #[tokio::test]
    async fn test_delete_during_create_wins(ctx: &mut RaceTestContext) {
        let release = ctx.remote.gate(RecordKind::Task, Op::Create, "Temporary");
        let create = ctx.store.add_task(NewTask::new("Temporary")).unwrap();
        let temp_id = create.id().to_string();

        assert_eq!(ctx.store.delete_task(&temp_id).unwrap().settled().await, Outcome::Confirmed);
        release.send(()).unwrap();
        assert_eq!(create.settled().await, Outcome::Superseded);

        assert!(ctx.store.tasks().is_empty());
        assert_eq!(ctx.remote.count(RecordKind::Task), 0);
    }

    #[test_context(RaceTestContext)]
    #[tokio::test]
    async fn test_create_survives_refresh(ctx: &mut RaceTestContext) {
        let release = ctx.remote.gate(RecordKind::Task, Op::Create, "Late");
        let create = ctx.store.add_task(NewTask::new("Late")).unwrap();

        assert_eq!(ctx.store.fetch_tasks().settled().await, Outcome::Confirmed);
        assert!(ctx.store.tasks().is_empty());

        release.send(()).unwrap();
        assert_eq!(create.settled().await, Outcome::Confirmed);

        let tasks = ctx.store.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "srv-1");
    }

    #[test_context(RaceTestContext)]
    #[tokio::test]
    async fn test_older_list_does_not_overwrite_newer(ctx: &mut RaceTestContext) {
        let release = ctx.remote.gate(RecordKind::Task, Op::List, "");
        let older = ctx.store.fetch_tasks();
        let newer = ctx.store.fetch_tasks();

        assert_eq!(newer.settled().await, Outcome::Confirmed);
        ctx.remote.seed(&Task::from_draft("late".to_string(), &NewTask::new("Late"), Utc::now()));
        release.send(()).unwrap();
        assert_eq!(older.settled().await, Outcome::Superseded);

        assert!(ctx.store.tasks().is_empty());
        assert!(!ctx.store.tasks_loading());
    }
}
