//! bandscore-client — REST transport and configuration.
//!
//! Implements [`RecordTransport`](bandscore_core::traits::RecordTransport)
//! over HTTP, plus a recording mock for tests, and loads `bandscore.toml`.

pub mod config;
pub mod http;
pub mod mock;

pub use bandscore_core::TransportError;
pub use config::{load_config, load_config_from, AdminConfig, Layout};
pub use http::HttpTransport;
