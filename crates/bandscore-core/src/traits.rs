//! Seams between the admin controller and the outside world.
//!
//! The transport is implemented by `bandscore-client`; the confirmation gate
//! and the alert sink are implemented by whatever surface hosts the view.

use async_trait::async_trait;

use crate::model::{RecordId, ScorePayload, ScoreRecord};

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// CRUD access to the score-records resource.
///
/// Errors are expected to wrap [`crate::TransportError`] so callers can
/// downcast them.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// `GET {base}/`
    async fn list(&self) -> anyhow::Result<Vec<ScoreRecord>>;

    /// `POST {base}/`
    async fn create(&self, payload: &ScorePayload) -> anyhow::Result<()>;

    /// `PUT {base}/{id}`
    async fn update(&self, id: &RecordId, payload: &ScorePayload) -> anyhow::Result<()>;

    /// `DELETE {base}/{id}`
    async fn delete(&self, id: &RecordId) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// User interaction
// ---------------------------------------------------------------------------

/// Blocking yes/no question asked before destructive actions.
pub trait ConfirmGate {
    /// Returns `true` to proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Answers every confirmation the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl ConfirmGate for AutoConfirm {
    fn confirm(&mut self, _: &str) -> bool {
        self.0
    }
}

/// Sink for user-facing warnings.
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

/// Drops every alert.
pub struct NoopAlerts;

impl Alerts for NoopAlerts {
    fn alert(&self, _: &str) {}
}
