//! The application controller. [App] is the sole owner of the in-memory record
//! collection and of the editing selection; every mutation flows through it and
//! is followed by a full-collection save.

pub mod editor;
pub mod sort;

use anyhow::Result;
use tracing::{debug, error};

use crate::{
    app::{editor::RecordDraft, sort::SortMode},
    export::{ExportOutcome, ExportTarget},
    storage::{entities::RecordEntity, record_store::RecordStore},
    utils::clock::Clock,
};

pub struct App<S: RecordStore> {
    store: S,
    records: Vec<RecordEntity>,
    editing: Option<i64>,
    clock: Box<dyn Clock>,
}

impl<S: RecordStore> App<S> {
    /// Loads the persisted collection once and takes ownership of it. A first
    /// run or an unreadable file both start from an empty collection.
    pub async fn load(store: S, clock: Box<dyn Clock>) -> Self {
        let records = store.load().await;
        debug!("Loaded {} records", records.len());
        Self {
            store,
            records,
            editing: None,
            clock,
        }
    }

    pub fn records(&self) -> &[RecordEntity] {
        &self.records
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// The create-or-update decision point. With an editing selection active the
    /// selected record is replaced in place and the selection cleared; without
    /// one a new record is appended under a freshly minted id. Either way the
    /// whole collection is persisted afterwards. Returns the affected id.
    pub async fn submit(&mut self, draft: RecordDraft) -> i64 {
        let id = match self.editing.take() {
            Some(editing_id) => {
                // The selected record may have been deleted in the meantime. The
                // submit then changes nothing but the selection is still spent.
                if let Some(record) = self.records.iter_mut().find(|r| r.id == editing_id) {
                    record.replace_metrics(draft.autocuidado, draft.gratidao, draft.interacoes);
                }
                editing_id
            }
            None => {
                // Creation time doubles as the id. Two creations inside the same
                // millisecond collide, which the on-disk format accepts.
                let id = self.clock.time().timestamp_millis();
                self.records.push(RecordEntity {
                    id,
                    autocuidado: draft.autocuidado,
                    gratidao: draft.gratidao,
                    interacoes: draft.interacoes,
                    agua: None,
                });
                id
            }
        };
        self.persist().await;
        id
    }

    /// Removes the record with the given id. An absent id leaves the collection
    /// unchanged but the snapshot is rewritten regardless.
    pub async fn delete(&mut self, id: i64) {
        self.records.retain(|r| r.id != id);
        self.persist().await;
    }

    /// Selects a record for editing and yields it for prefilling the form. Does
    /// not mutate data. Selecting an unknown id leaves the state untouched.
    pub fn start_edit(&mut self, id: i64) -> Option<&RecordEntity> {
        let record = self.records.iter().find(|r| r.id == id)?;
        self.editing = Some(id);
        Some(record)
    }

    /// Clears the editing selection without mutating data.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// A sorted copy of the collection for display.
    pub fn sorted_view(&self, mode: SortMode) -> Vec<RecordEntity> {
        sort::sorted_for_display(&self.records, mode)
    }

    /// Serializes the collection and hands it to the delivery target. An empty
    /// collection never engages the target.
    pub async fn export<T>(&self, target: &T) -> Result<ExportOutcome>
    where
        T: ExportTarget + ?Sized,
    {
        if self.records.is_empty() {
            return Ok(ExportOutcome::NothingToExport);
        }
        let payload = serde_json::to_string_pretty(&self.records)?;
        target.deliver(&payload).await
    }

    /// Persistence is fire-and-forget for the rest of the application: failures
    /// land in the log, never in front of the user.
    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.records).await {
            error!("Failed to persist {} records: {e:?}", self.records.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use anyhow::Result;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        app::{editor::RecordForm, sort::SortMode, App},
        export::{download::DownloadExport, ExportOutcome},
        storage::{
            entities::RecordEntity,
            record_store::{JsonRecordStore, RecordStore},
        },
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    struct TestClock {
        start: DateTime<Utc>,
        ticks: AtomicI64,
    }

    impl TestClock {
        fn new() -> Self {
            Self {
                start: Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for TestClock {
        fn time(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + Duration::milliseconds(tick)
        }
    }

    fn seed_records() -> Vec<RecordEntity> {
        vec![
            RecordEntity {
                id: 100,
                autocuidado: 1.0,
                gratidao: 1,
                interacoes: 1,
                agua: Some(2.0),
            },
            RecordEntity {
                id: 200,
                autocuidado: 2.0,
                gratidao: 2,
                interacoes: 2,
                agua: None,
            },
        ]
    }

    async fn seeded_app(dir: &std::path::Path) -> Result<App<JsonRecordStore>> {
        let store = JsonRecordStore::new(dir.to_owned())?;
        store.save(&seed_records()).await?;
        Ok(App::load(JsonRecordStore::new(dir.to_owned())?, Box::new(TestClock::new())).await)
    }

    #[tokio::test]
    async fn test_submit_without_selection_appends_and_persists() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let mut app = seeded_app(dir.path()).await?;

        let draft = RecordForm::new().submit("7,5", "3", "2")?;
        let id = app.submit(draft).await;

        assert_eq!(app.records().len(), 3);
        let created = app.records().last().unwrap();
        assert_eq!(created.id, id);
        assert_eq!(created.autocuidado, 7.5);
        assert_eq!(created.gratidao, 3);
        assert_eq!(created.interacoes, 2);
        assert_eq!(created.agua, None);

        let reloaded = JsonRecordStore::new(dir.path().to_owned())?.load().await;
        assert_eq!(reloaded, app.records());
        Ok(())
    }

    #[tokio::test]
    async fn test_submitted_ids_are_unique() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonRecordStore::new(dir.path().to_owned())?;
        let mut app = App::load(store, Box::new(TestClock::new())).await;

        let first = app.submit(RecordForm::new().submit("1", "1", "1")?).await;
        let second = app.submit(RecordForm::new().submit("2", "2", "2")?).await;

        assert_ne!(first, second);
        assert!(second > first);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_replaces_fields_in_place() -> Result<()> {
        let dir = tempdir()?;
        let mut app = seeded_app(dir.path()).await?;

        let selected = app.start_edit(100).cloned().unwrap();
        let draft = RecordForm::editing(selected).submit("9", "9", "9")?;
        let id = app.submit(draft).await;

        assert_eq!(id, 100);
        assert_eq!(app.editing(), None);

        let edited = app.records().iter().find(|r| r.id == 100).unwrap();
        assert_eq!(edited.autocuidado, 9.0);
        assert_eq!(edited.gratidao, 9);
        assert_eq!(edited.interacoes, 9);
        // The water value is outside the form and survives the replacement.
        assert_eq!(edited.agua, Some(2.0));

        let untouched = app.records().iter().find(|r| r.id == 200).unwrap();
        assert_eq!(untouched, &seed_records()[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_after_selected_record_was_deleted() -> Result<()> {
        let dir = tempdir()?;
        let mut app = seeded_app(dir.path()).await?;

        app.start_edit(100);
        app.delete(100).await;
        let draft = RecordForm::new().submit("5", "5", "5")?;
        app.submit(draft).await;

        // Nothing was replaced and nothing new appeared, but the selection is spent.
        assert_eq!(app.records().len(), 1);
        assert_eq!(app.editing(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_a_noop_but_still_persists() -> Result<()> {
        let dir = tempdir()?;
        let mut app = seeded_app(dir.path()).await?;

        std::fs::remove_file(dir.path().join("dados.json"))?;
        app.delete(999).await;

        assert_eq!(app.records(), seed_records());
        let reloaded = JsonRecordStore::new(dir.path().to_owned())?.load().await;
        assert_eq!(reloaded, seed_records());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_clears_the_selection_without_mutation() -> Result<()> {
        let dir = tempdir()?;
        let mut app = seeded_app(dir.path()).await?;

        app.start_edit(200);
        assert_eq!(app.editing(), Some(200));
        app.cancel_edit();

        assert_eq!(app.editing(), None);
        assert_eq!(app.records(), seed_records());
        Ok(())
    }

    #[tokio::test]
    async fn test_selecting_unknown_id_keeps_idle_state() -> Result<()> {
        let dir = tempdir()?;
        let mut app = seeded_app(dir.path()).await?;

        assert!(app.start_edit(999).is_none());
        assert_eq!(app.editing(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_sorted_view_leaves_collection_order_alone() -> Result<()> {
        let dir = tempdir()?;
        let app = seeded_app(dir.path()).await?;

        let view = app.sorted_view(SortMode::Recent);
        assert_eq!(view[0].id, 200);
        assert_eq!(app.records()[0].id, 100);
        Ok(())
    }

    #[tokio::test]
    async fn test_export_of_empty_collection_never_writes() -> Result<()> {
        let dir = tempdir()?;
        let out = tempdir()?;
        let store = JsonRecordStore::new(dir.path().to_owned())?;
        let app = App::load(store, Box::new(TestClock::new())).await;

        let target = DownloadExport::new(out.path().to_owned());
        assert_eq!(app.export(&target).await?, ExportOutcome::NothingToExport);
        assert!(!out.path().join("dados.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_export_delivers_indented_snapshot() -> Result<()> {
        let dir = tempdir()?;
        let out = tempdir()?;
        let app = seeded_app(dir.path()).await?;

        let target = DownloadExport::new(out.path().to_owned());
        let outcome = app.export(&target).await?;

        let expected_path = out.path().join("dados.json");
        assert_eq!(outcome, ExportOutcome::Delivered(expected_path.clone()));

        let raw = std::fs::read_to_string(expected_path)?;
        assert_eq!(raw, serde_json::to_string_pretty(&seed_records())?);
        Ok(())
    }
}
