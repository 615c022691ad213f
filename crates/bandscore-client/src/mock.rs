//! In-memory transport for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use bandscore_core::model::{RecordId, ScorePayload, ScoreRecord};
use bandscore_core::traits::RecordTransport;
use bandscore_core::TransportError;

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List,
    Create(ScorePayload),
    Update(RecordId, ScorePayload),
    Delete(RecordId),
}

/// A fake backend that keeps records in memory and logs every call.
///
/// Creates assign sequential integer ids. Each operation class can be
/// switched to fail with a 500.
pub struct MockTransport {
    records: Mutex<Vec<ScoreRecord>>,
    calls: Mutex<Vec<MockCall>>,
    next_id: Mutex<i64>,
    fail_list: AtomicBool,
    fail_save: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockTransport {
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| match r.id {
                Some(RecordId::Int(n)) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(next_id),
            fail_list: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::Relaxed);
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Current backend contents.
    pub fn records(&self) -> Vec<ScoreRecord> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn server_error(flag: &AtomicBool) -> Result<(), TransportError> {
        if flag.load(Ordering::Relaxed) {
            Err(TransportError::Status {
                status: 500,
                message: "mock failure".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl RecordTransport for MockTransport {
    async fn list(&self) -> anyhow::Result<Vec<ScoreRecord>> {
        self.record(MockCall::List);
        Self::server_error(&self.fail_list)?;
        Ok(self.records())
    }

    async fn create(&self, payload: &ScorePayload) -> anyhow::Result<()> {
        self.record(MockCall::Create(payload.clone()));
        Self::server_error(&self.fail_save)?;

        let mut next_id = self.next_id.lock().unwrap();
        let record = payload.to_record().with_id(*next_id);
        *next_id += 1;
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn update(&self, id: &RecordId, payload: &ScorePayload) -> anyhow::Result<()> {
        self.record(MockCall::Update(id.clone(), payload.clone()));
        Self::server_error(&self.fail_save)?;

        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| TransportError::Status {
                status: 404,
                message: format!("no record {id}"),
            })?;
        *slot = payload.to_record().with_id(id.clone());
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> anyhow::Result<()> {
        self.record(MockCall::Delete(id.clone()));
        Self::server_error(&self.fail_delete)?;
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.id.as_ref() != Some(id));
        Ok(())
    }
}
