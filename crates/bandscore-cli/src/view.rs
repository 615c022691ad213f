//! Wiring between the CLI surface and the admin controller.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use bandscore_client::{load_config_from, AdminConfig};
use bandscore_core::traits::{Alerts, ConfirmGate, RecordTransport};
use bandscore_core::AdminController;

/// Prints validation warnings to stderr.
pub struct StderrAlerts;

impl Alerts for StderrAlerts {
    fn alert(&self, message: &str) {
        eprintln!("Warning: {message}");
    }
}

/// Holds warnings until the shell prints them with its own output.
#[derive(Default)]
pub struct QueuedAlerts(Mutex<Vec<String>>);

impl QueuedAlerts {
    pub fn drain(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Alerts for QueuedAlerts {
    fn alert(&self, message: &str) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message.to_string());
        }
    }
}

/// Asks a yes/no question on `output` and reads the answer from `input`.
///
/// Anything but `y`/`yes` (including end of input) is a no.
pub struct LinePrompt<'a, R, W> {
    pub input: &'a mut R,
    pub output: &'a mut W,
}

impl<R: BufRead, W: Write> ConfirmGate for LinePrompt<'_, R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// Load config, applying a `--base-url` override.
pub fn load(config_path: Option<&Path>, base_url: Option<String>) -> Result<AdminConfig> {
    let mut config = load_config_from(config_path)?;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    Ok(config)
}

/// Build the controller over `transport` and run the initial load.
pub async fn mount(
    config: &AdminConfig,
    transport: Arc<dyn RecordTransport>,
    alerts: Arc<dyn Alerts>,
) -> AdminController {
    let mut controller =
        AdminController::new(transport, config.skills.clone()).with_alerts(alerts);
    controller.mount().await;
    controller
}

/// Build the HTTP-backed controller described by `config`.
pub async fn open(config: &AdminConfig, alerts: Arc<dyn Alerts>) -> Result<AdminController> {
    let transport = config.transport()?;
    tracing::debug!(base_url = transport.base_url(), "opening admin view");
    Ok(mount(config, Arc::new(transport), alerts).await)
}
