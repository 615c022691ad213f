//! The admin view controller.
//!
//! Owns the record store, the search term and the create/edit form, and
//! drives the transport in response to user actions. Every successful
//! mutation is followed by a full refresh; nothing is patched locally.
//!
//! Transport failures never propagate out of the controller. Fetch and save
//! failures are logged and otherwise silent, and a failed delete is treated
//! like a successful one. Only validation problems reach the user, through
//! [`Alerts`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::draft::{FormDraft, FormError};
use crate::error::TransportError;
use crate::filter::filter_by_name;
use crate::model::{RecordId, ScorePayload, ScoreRecord, ScoreSchema};
use crate::traits::{Alerts, ConfirmGate, NoopAlerts, RecordTransport};
use crate::validation::{validate_draft, ValidationError};

/// What a submit will do once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// The open form: its mode and the draft behind it.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: FormDraft,
}

/// A validated save, ready to be sent.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub mode: FormMode,
    pub payload: ScorePayload,
}

impl SaveRequest {
    /// POST for a new record, PUT for an existing one.
    pub async fn send(&self, transport: &dyn RecordTransport) -> anyhow::Result<()> {
        match &self.mode {
            FormMode::Create => transport.create(&self.payload).await,
            FormMode::Edit(id) => transport.update(id, &self.payload).await,
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend accepted the save and the form closed.
    Saved,
    /// The request failed; the form stays open with its draft.
    Failed,
    /// The draft did not validate; nothing was sent.
    Rejected(ValidationError),
    /// Another save is still in flight; nothing was sent.
    Busy,
    /// No form is open.
    NotOpen,
}

/// Result of a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent.
    Dismissed,
    /// The delete was sent and the store refreshed, whatever the backend said.
    Issued,
}

/// State container for the single admin view.
pub struct AdminController {
    transport: Arc<dyn RecordTransport>,
    alerts: Arc<dyn Alerts>,
    schema: ScoreSchema,
    records: Vec<ScoreRecord>,
    last_refreshed: Option<DateTime<Utc>>,
    search: String,
    form: Option<FormState>,
    saving: bool,
}

impl AdminController {
    pub fn new(transport: Arc<dyn RecordTransport>, schema: ScoreSchema) -> Self {
        Self {
            transport,
            alerts: Arc::new(NoopAlerts),
            schema,
            records: Vec::new(),
            last_refreshed: None,
            search: String::new(),
            form: None,
            saving: false,
        }
    }

    /// Route validation warnings to `alerts`.
    pub fn with_alerts(mut self, alerts: Arc<dyn Alerts>) -> Self {
        self.alerts = alerts;
        self
    }

    // -- store ---------------------------------------------------------------

    /// Initial load of the view.
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Replace the store with the backend's collection.
    ///
    /// On failure the store keeps its previous contents. Returns whether the
    /// fetch succeeded.
    pub async fn refresh(&mut self) -> bool {
        match self.transport.list().await {
            Ok(records) => {
                debug!(count = records.len(), "fetched records");
                self.records = records;
                self.last_refreshed = Some(Utc::now());
                true
            }
            Err(e) => {
                error!("failed to fetch records: {e:#}");
                false
            }
        }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn find(&self, id: &RecordId) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.id.as_ref() == Some(id))
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn schema(&self) -> &ScoreSchema {
        &self.schema
    }

    // -- search --------------------------------------------------------------

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Records matching the current search term.
    pub fn visible(&self) -> Vec<&ScoreRecord> {
        filter_by_name(&self.records, &self.search)
    }

    // -- form ----------------------------------------------------------------

    /// Open an empty form for a new record.
    pub fn open_for_create(&mut self) {
        self.form = Some(FormState {
            mode: FormMode::Create,
            draft: FormDraft::empty(&self.schema),
        });
    }

    /// Open the form pre-filled from `record`.
    pub fn open_for_edit(&mut self, record: &ScoreRecord) -> Result<(), FormError> {
        let id = record
            .id
            .clone()
            .ok_or_else(|| FormError::MissingId(record.name.clone()))?;
        self.form = Some(FormState {
            mode: FormMode::Edit(id),
            draft: FormDraft::from_record(record, &self.schema),
        });
        Ok(())
    }

    /// Open the form for the stored record with this id.
    pub fn open_for_edit_by_id(&mut self, id: &RecordId) -> Result<(), FormError> {
        let record = self
            .find(id)
            .cloned()
            .ok_or_else(|| FormError::NotFound(id.to_string()))?;
        self.open_for_edit(&record)
    }

    /// Set a raw draft field; validation waits until submit.
    pub fn update_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        let form = self.form.as_mut().ok_or(FormError::Closed)?;
        form.draft.set(field, value)
    }

    /// Close the form and throw the draft away.
    pub fn cancel(&mut self) {
        self.form = None;
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    /// `true` while a save is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    // -- submit --------------------------------------------------------------

    /// Validate the draft and mark a save as in flight.
    ///
    /// `Err` carries the reason no request was started. A rejected draft also
    /// raises an alert. Pair every `Ok` with [`Self::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<SaveRequest, SubmitOutcome> {
        if self.saving {
            debug!("submit ignored, a save is already in flight");
            return Err(SubmitOutcome::Busy);
        }
        let form = self.form.as_ref().ok_or(SubmitOutcome::NotOpen)?;

        match validate_draft(&form.draft, &self.schema) {
            Ok(payload) => {
                self.saving = true;
                Ok(SaveRequest {
                    mode: form.mode.clone(),
                    payload,
                })
            }
            Err(e) => {
                debug!("draft rejected: {e}");
                self.alerts.alert(&e.user_message());
                Err(SubmitOutcome::Rejected(e))
            }
        }
    }

    /// Apply the transport result of a save started by [`Self::begin_submit`].
    ///
    /// Does not refresh; the caller does that after `Saved`.
    pub fn finish_submit(&mut self, result: anyhow::Result<()>) -> SubmitOutcome {
        self.saving = false;
        match result {
            Ok(()) => {
                info!("record saved");
                self.form = None;
                SubmitOutcome::Saved
            }
            Err(e) => {
                let rejected = e
                    .downcast_ref::<TransportError>()
                    .is_some_and(TransportError::is_client_error);
                if rejected {
                    error!("backend rejected the record: {e:#}");
                } else {
                    error!("failed to save record: {e:#}");
                }
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, send, and refresh on success.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        let transport = Arc::clone(&self.transport);
        let result = request.send(transport.as_ref()).await;

        let outcome = self.finish_submit(result);
        if outcome == SubmitOutcome::Saved {
            self.refresh().await;
        }
        outcome
    }

    // -- delete --------------------------------------------------------------

    /// Ask `gate`, then delete and refresh.
    ///
    /// The refresh happens whether or not the backend accepted the delete.
    pub async fn delete(&mut self, id: &RecordId, gate: &mut dyn ConfirmGate) -> DeleteOutcome {
        let prompt = match self.find(id) {
            Some(record) => format!("Really delete {}?", record.name),
            None => format!("Really delete record {id}?"),
        };
        if !gate.confirm(&prompt) {
            return DeleteOutcome::Dismissed;
        }

        match self.transport.delete(id).await {
            Ok(()) => info!(%id, "record deleted"),
            Err(e) => warn!(%id, "delete request failed: {e:#}"),
        }
        self.refresh().await;
        DeleteOutcome::Issued
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::model::Skill;
    use crate::traits::AutoConfirm;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Create(ScorePayload),
        Update(RecordId, ScorePayload),
        Delete(RecordId),
    }

    #[derive(Default)]
    struct Fake {
        records: Mutex<Vec<ScoreRecord>>,
        calls: Mutex<Vec<Call>>,
        fail_list: bool,
        fail_save: bool,
        fail_delete: bool,
    }

    impl Fake {
        fn with_records(records: Vec<ScoreRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn down() -> TransportError {
            TransportError::Network("connection refused".into())
        }
    }

    #[async_trait]
    impl RecordTransport for Fake {
        async fn list(&self) -> anyhow::Result<Vec<ScoreRecord>> {
            self.calls.lock().unwrap().push(Call::List);
            if self.fail_list {
                return Err(Self::down().into());
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, payload: &ScorePayload) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(Call::Create(payload.clone()));
            if self.fail_save {
                return Err(Self::down().into());
            }
            let mut records = self.records.lock().unwrap();
            let id = records.len() as i64 + 1;
            records.push(payload.to_record().with_id(id));
            Ok(())
        }

        async fn update(&self, id: &RecordId, payload: &ScorePayload) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(id.clone(), payload.clone()));
            if self.fail_save {
                return Err(Self::down().into());
            }
            Ok(())
        }

        async fn delete(&self, id: &RecordId) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(Call::Delete(id.clone()));
            if self.fail_delete {
                return Err(TransportError::Status {
                    status: 500,
                    message: "boom".into(),
                }
                .into());
            }
            self.records
                .lock()
                .unwrap()
                .retain(|r| r.id.as_ref() != Some(id));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingAlerts(Mutex<Vec<String>>);

    impl Alerts for RecordingAlerts {
        fn alert(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn student(id: i64, name: &str, listening: f64, reading: f64) -> ScoreRecord {
        ScoreRecord::named(name)
            .with_id(id)
            .with_score(Skill::Listening, listening)
            .with_score(Skill::Reading, reading)
    }

    fn controller(fake: &Arc<Fake>) -> AdminController {
        AdminController::new(fake.clone(), ScoreSchema::receptive())
    }

    fn fill(c: &mut AdminController, name: &str, listening: &str, reading: &str) {
        c.update_field("name", name).unwrap();
        c.update_field("listening", listening).unwrap();
        c.update_field("reading", reading).unwrap();
    }

    #[tokio::test]
    async fn mount_loads_records_in_server_order() {
        let fake = Arc::new(Fake::with_records(vec![
            student(2, "Zafar", 50.0, 40.0),
            student(1, "Anvar", 60.0, 55.0),
        ]));
        let mut c = controller(&fake);
        c.mount().await;

        let names: Vec<_> = c.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zafar", "Anvar"]);
        assert!(c.last_refreshed().is_some());
        assert_eq!(fake.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_records() {
        let fake = Arc::new(Fake::with_records(vec![student(1, "A", 60.0, 55.0)]));
        let mut c = controller(&fake);
        c.mount().await;

        let broken = Arc::new(Fake {
            fail_list: true,
            ..Default::default()
        });
        c.transport = broken;
        assert!(!c.refresh().await);
        assert_eq!(c.records().len(), 1);
    }

    #[tokio::test]
    async fn search_filters_visible_records() {
        let fake = Arc::new(Fake::with_records(vec![
            student(1, "Alice", 60.0, 55.0),
            student(2, "bob", 50.0, 40.0),
        ]));
        let mut c = controller(&fake);
        c.mount().await;

        c.set_search("AL");
        let visible: Vec<_> = c.visible().iter().map(|r| r.name.clone()).collect();
        assert_eq!(visible, vec!["Alice"]);
        assert_eq!(c.records().len(), 2);

        c.set_search("");
        assert_eq!(c.visible().len(), 2);
    }

    #[tokio::test]
    async fn create_posts_then_refreshes_and_closes() {
        let fake = Arc::new(Fake::default());
        let mut c = controller(&fake);
        c.mount().await;

        c.open_for_create();
        fill(&mut c, "Nodira", "61", "58");
        assert_eq!(c.submit().await, SubmitOutcome::Saved);

        assert!(!c.is_open());
        assert!(!c.is_saving());
        assert_eq!(c.records().len(), 1);
        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[1], Call::Create(p) if p.name == "Nodira"));
        assert_eq!(calls[2], Call::List);

        // The next form starts from an empty draft.
        c.open_for_create();
        assert!(c.form().unwrap().draft.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_is_rejected_without_network() {
        let fake = Arc::new(Fake::default());
        let alerts = Arc::new(RecordingAlerts::default());
        let mut c = controller(&fake).with_alerts(alerts.clone());

        c.open_for_create();
        fill(&mut c, "A", "76", "10");
        let outcome = c.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(c.is_open());
        assert!(!c.is_saving());
        assert!(fake.calls().is_empty());
        assert_eq!(alerts.0.lock().unwrap().len(), 1);
        assert!(alerts.0.lock().unwrap()[0].contains("between 0 and 75"));
    }

    #[tokio::test]
    async fn every_score_in_range_is_accepted() {
        for (listening, reading) in [("0", "75"), ("75", "0"), ("37.5", "12")] {
            let fake = Arc::new(Fake::default());
            let mut c = controller(&fake);
            c.open_for_create();
            fill(&mut c, "A", listening, reading);
            assert_eq!(c.submit().await, SubmitOutcome::Saved, "{listening}/{reading}");
        }
        for (listening, reading) in [("-1", "10"), ("10", "75.01"), ("NaN", "1")] {
            let fake = Arc::new(Fake::default());
            let mut c = controller(&fake);
            c.open_for_create();
            fill(&mut c, "A", listening, reading);
            assert!(matches!(c.submit().await, SubmitOutcome::Rejected(_)));
            assert!(fake.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn edit_puts_to_target_id() {
        let fake = Arc::new(Fake::with_records(vec![student(7, "A", 60.0, 55.0)]));
        let mut c = controller(&fake);
        c.mount().await;

        c.open_for_edit_by_id(&RecordId::Int(7)).unwrap();
        assert_eq!(c.form().unwrap().mode, FormMode::Edit(RecordId::Int(7)));
        assert_eq!(c.form().unwrap().draft.field(Skill::Listening), Some("60"));

        c.update_field("listening", "70").unwrap();
        assert_eq!(c.submit().await, SubmitOutcome::Saved);

        let calls = fake.calls();
        assert!(matches!(
            &calls[1],
            Call::Update(RecordId::Int(7), p) if p.scores[&Skill::Listening] == 70.0
        ));
        assert_eq!(calls[2], Call::List);
        assert!(c.form().is_none());
    }

    #[tokio::test]
    async fn failed_save_keeps_form_open() {
        let fake = Arc::new(Fake {
            fail_save: true,
            ..Default::default()
        });
        let mut c = controller(&fake);
        c.open_for_create();
        fill(&mut c, "Kamola", "50", "50");

        assert_eq!(c.submit().await, SubmitOutcome::Failed);
        assert!(c.is_open());
        assert!(!c.is_saving());
        assert_eq!(c.form().unwrap().draft.name, "Kamola");
        // No refresh after a failed save.
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_a_no_op() {
        let fake = Arc::new(Fake::default());
        let mut c = controller(&fake);
        c.open_for_create();
        fill(&mut c, "A", "10", "10");

        let request = c.begin_submit().unwrap();
        assert!(c.is_saving());
        assert_eq!(c.begin_submit().unwrap_err(), SubmitOutcome::Busy);
        assert_eq!(c.submit().await, SubmitOutcome::Busy);
        assert!(fake.calls().is_empty());

        let result = request.send(fake.as_ref()).await;
        assert_eq!(c.finish_submit(result), SubmitOutcome::Saved);
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn edit_then_cancel_touches_nothing() {
        let fake = Arc::new(Fake::with_records(vec![student(1, "A", 60.0, 55.0)]));
        let mut c = controller(&fake);
        c.mount().await;
        let before = c.records().to_vec();

        let record = c.records()[0].clone();
        c.open_for_edit(&record).unwrap();
        c.update_field("name", "Changed").unwrap();
        c.cancel();

        assert!(!c.is_open());
        assert_eq!(c.records(), before.as_slice());
        assert_eq!(fake.calls(), vec![Call::List]);
    }

    #[test]
    fn form_operations_need_an_open_form() {
        let fake = Arc::new(Fake::default());
        let mut c = controller(&fake);
        assert_eq!(c.update_field("name", "x"), Err(FormError::Closed));
        assert_eq!(c.begin_submit().unwrap_err(), SubmitOutcome::NotOpen);
        assert_eq!(
            c.open_for_edit(&ScoreRecord::named("no id")),
            Err(FormError::MissingId("no id".into()))
        );
        assert_eq!(
            c.open_for_edit_by_id(&RecordId::Int(9)),
            Err(FormError::NotFound("9".into()))
        );
    }

    #[tokio::test]
    async fn dismissed_delete_sends_nothing() {
        let fake = Arc::new(Fake::with_records(vec![student(1, "A", 60.0, 55.0)]));
        let mut c = controller(&fake);
        c.mount().await;

        let outcome = c.delete(&RecordId::Int(1), &mut AutoConfirm(false)).await;
        assert_eq!(outcome, DeleteOutcome::Dismissed);
        assert_eq!(fake.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn delete_refreshes_even_when_backend_fails() {
        let fake = Arc::new(Fake {
            records: Mutex::new(vec![student(1, "A", 60.0, 55.0)]),
            fail_delete: true,
            ..Default::default()
        });
        let mut c = controller(&fake);
        c.mount().await;

        let outcome = c.delete(&RecordId::Int(1), &mut AutoConfirm(true)).await;
        assert_eq!(outcome, DeleteOutcome::Issued);
        assert_eq!(
            fake.calls(),
            vec![Call::List, Call::Delete(RecordId::Int(1)), Call::List]
        );
        assert_eq!(c.records().len(), 1);
    }

    #[tokio::test]
    async fn delete_prompt_names_the_student() {
        struct Asked(Option<String>);
        impl ConfirmGate for Asked {
            fn confirm(&mut self, prompt: &str) -> bool {
                self.0 = Some(prompt.to_string());
                true
            }
        }

        let fake = Arc::new(Fake::with_records(vec![student(3, "Jasur", 60.0, 55.0)]));
        let mut c = controller(&fake);
        c.mount().await;

        let mut gate = Asked(None);
        c.delete(&RecordId::Int(3), &mut gate).await;
        assert_eq!(gate.0.as_deref(), Some("Really delete Jasur?"));
        assert!(c.records().is_empty());
    }
}
