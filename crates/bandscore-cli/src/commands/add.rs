//! The `bandscore add` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::commands::{finish_save, FieldArgs};
use crate::view::{self, StderrAlerts};

pub async fn execute(
    fields: FieldArgs,
    config_path: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let config = view::load(config_path.as_deref(), base_url)?;
    let mut controller = view::open(&config, Arc::new(StderrAlerts)).await?;

    controller.open_for_create();
    fields.apply(&mut controller)?;

    let name = fields.name.clone().unwrap_or_else(|| "record".to_string());
    finish_save(controller.submit().await, &name)
}
