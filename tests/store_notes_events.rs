mod common;

#[cfg(test)]
mod tests {
    use super::common::{at, drain, store, MockRemote, Op};
    use chrono::{Duration, NaiveDate, Utc};
    use ihsan::libs::event::{CalendarEvent, EventPatch, NewEvent};
    use ihsan::libs::messages::Message;
    use ihsan::libs::note::{NewNote, Note, NotePatch};
    use ihsan::libs::record::{Record, RecordKind};
    use ihsan::libs::store::{Notice, Outcome, Store, StoreError, SyncStatus};
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::broadcast;

    struct RecordsTestContext {
        remote: MockRemote,
        store: Store<MockRemote>,
        notices: broadcast::Receiver<Notice>,
    }

    impl AsyncTestContext for RecordsTestContext {
        async fn setup() -> Self {
            let (remote, store) = store();
            let notices = store.subscribe();
            RecordsTestContext { remote, store, notices }
        }
    }

    fn note(id: &str, title: &str) -> Note {
        Note::from_draft(id.to_string(), &NewNote::new(title, "body"), Utc::now() - Duration::hours(1))
    }

    fn event(id: &str, title: &str, start: chrono::DateTime<Utc>) -> CalendarEvent {
        CalendarEvent::from_draft(id.to_string(), &NewEvent::new(title, start, start + Duration::hours(1)), Utc::now())
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_note_without_content_is_rejected(ctx: &mut RecordsTestContext) {
        let result = ctx.store.add_note(NewNote::new("Ideas", "  "));

        assert!(matches!(result, Err(StoreError::EmptyField(_))));
        assert!(ctx.store.notes().is_empty());
        assert!(drain(&mut ctx.notices).is_empty());
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_add_note_confirmed(ctx: &mut RecordsTestContext) {
        let mut draft = NewNote::new("Ideas", "Build a shelf");
        draft.tags = Some(vec!["home".to_string()]);

        let pending = ctx.store.add_note(draft).unwrap();
        assert_eq!(ctx.store.notes()[0].content, "Build a shelf");
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        let notes = ctx.store.notes();
        assert_eq!(notes[0].id, "srv-1");
        assert_eq!(notes[0].tags, Some(vec!["home".to_string()]));
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::success(Message::RecordSaved(RecordKind::Note))]
        );
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_note_edit_stamps_updated_at(ctx: &mut RecordsTestContext) {
        ctx.remote.seed(&note("n1", "Journal"));
        ctx.store.fetch_notes().settled().await;

        let patch = NotePatch {
            content: Some("Grateful today".to_string()),
            ..Default::default()
        };
        let pending = ctx.store.update_note("n1", patch).unwrap();

        let edited = ctx.store.note("n1").unwrap();
        assert_eq!(edited.content, "Grateful today");
        assert!(edited.updated_at > edited.created_at);
        assert_eq!(pending.settled().await, Outcome::Confirmed);
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_failed_delete_restores_note_at_end(ctx: &mut RecordsTestContext) {
        ctx.remote.seed(&note("n1", "First"));
        ctx.remote.seed(&note("n2", "Second"));
        ctx.store.fetch_notes().settled().await;
        drain(&mut ctx.notices);
        ctx.remote.fail(RecordKind::Note, Op::Delete);
        let original = ctx.store.note("n1").unwrap();

        let pending = ctx.store.delete_note("n1").unwrap();
        assert!(ctx.store.note("n1").is_none());
        assert_eq!(pending.settled().await, Outcome::Restored);

        let restored = ctx.store.note("n1");
        assert_eq!(restored.as_ref().map(|note| note.title.as_str()), Some("First"));
        assert_eq!(restored, Some(original));

        let ids: Vec<String> = ctx.store.notes().into_iter().map(|note| note.id).collect();
        assert_eq!(ids, vec!["n2", "n1"]);
        assert_eq!(ctx.store.sync_status::<Note>("n1"), Some(SyncStatus::Confirmed));
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::warning(Message::RecordDeleteFailed(RecordKind::Note))]
        );
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_add_event_confirmed(ctx: &mut RecordsTestContext) {
        let start = at(2026, 3, 20, 9, 0);
        let mut draft = NewEvent::new("Team meeting", start, start + Duration::hours(1));
        draft.location = Some("Room 4".to_string());

        let pending = ctx.store.add_event(draft).unwrap();
        assert_eq!(ctx.store.events().len(), 1);
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        let stored = ctx.store.event("srv-1").unwrap();
        assert_eq!(stored.location.as_deref(), Some("Room 4"));
        assert_eq!(stored.start, start);
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_update_event_moves_it(ctx: &mut RecordsTestContext) {
        ctx.remote.seed(&event("e1", "Dentist", at(2026, 3, 2, 14, 0)));
        ctx.store.fetch_events().settled().await;

        let patch = EventPatch {
            start: Some(at(2026, 3, 3, 14, 0)),
            end: Some(at(2026, 3, 3, 15, 0)),
            ..Default::default()
        };
        let pending = ctx.store.update_event("e1", patch).unwrap();
        assert_eq!(pending.settled().await, Outcome::Confirmed);

        let moved = ctx.store.event("e1").unwrap();
        assert_eq!(moved.start, at(2026, 3, 3, 14, 0));
        assert_eq!(moved.end, at(2026, 3, 3, 15, 0));
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_month_fetch_merges_into_collection(ctx: &mut RecordsTestContext) {
        ctx.remote.seed(&event("mar", "Iftar", at(2026, 3, 10, 18, 0)));
        ctx.remote.seed(&event("apr", "Eid", at(2026, 4, 2, 8, 0)));
        let march = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();

        let pending = ctx.store.fetch_events_in_month(march);
        assert!(ctx.store.events_loading());
        assert_eq!(pending.settled().await, Outcome::Confirmed);
        assert!(!ctx.store.events_loading());

        let ids: Vec<String> = ctx.store.events().into_iter().map(|event| event.id).collect();
        assert_eq!(ids, vec!["mar"]);

        ctx.store.fetch_events_in_month(april).settled().await;
        let ids: Vec<String> = ctx.store.events().into_iter().map(|event| event.id).collect();
        assert_eq!(ids, vec!["mar", "apr"]);
        assert_eq!(
            drain(&mut ctx.notices),
            vec![
                Notice::info(Message::RecordsFetched(RecordKind::Event, 1)),
                Notice::info(Message::RecordsFetched(RecordKind::Event, 1))
            ]
        );
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_failed_month_fetch_keeps_events(ctx: &mut RecordsTestContext) {
        ctx.remote.seed(&event("e1", "Halaqa", at(2026, 5, 1, 19, 0)));
        ctx.store.fetch_events().settled().await;
        drain(&mut ctx.notices);
        ctx.remote.fail(RecordKind::Event, Op::List);

        let may = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert_eq!(ctx.store.fetch_events_in_month(may).settled().await, Outcome::LocalOnly);

        assert_eq!(ctx.store.events().len(), 1);
        assert!(!ctx.store.events_loading());
        assert_eq!(
            drain(&mut ctx.notices),
            vec![Notice::warning(Message::RecordsFetchFailed(RecordKind::Event))]
        );
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_notes_loading_while_fetching(ctx: &mut RecordsTestContext) {
        let release = ctx.remote.gate(RecordKind::Note, Op::List, "");

        let pending = ctx.store.fetch_notes();
        assert!(ctx.store.notes_loading());
        drop(release);

        assert_eq!(pending.settled().await, Outcome::Confirmed);
        assert!(!ctx.store.notes_loading());
    }

    #[test_context(RecordsTestContext)]
    #[tokio::test]
    async fn test_fetch_single_event_upserts(ctx: &mut RecordsTestContext) {
        ctx.remote.seed(&event("e7", "Jumu'ah", at(2026, 3, 6, 12, 30)));

        let fetched = ctx.store.fetch_event("e7").await.unwrap();
        assert_eq!(fetched.title, "Jumu'ah");
        assert_eq!(ctx.store.events(), vec![fetched]);
        assert!(ctx.store.fetch_event("missing").await.is_err());
    }
}
