//! bandscore-core — score records, validation, and admin view state.
//!
//! This crate defines the data model, the transport seam, and the
//! [`controller::AdminController`] that owns the record store, the form
//! draft and the search filter.

pub mod controller;
pub mod draft;
pub mod error;
pub mod filter;
pub mod model;
pub mod traits;
pub mod validation;

pub use controller::{AdminController, DeleteOutcome, FormMode, SubmitOutcome};
pub use error::TransportError;
pub use model::{RecordId, ScorePayload, ScoreRecord, ScoreSchema, Skill};
