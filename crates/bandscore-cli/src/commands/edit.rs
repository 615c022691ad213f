//! The `bandscore edit` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use bandscore_core::model::RecordId;

use crate::commands::{finish_save, FieldArgs};
use crate::view::{self, StderrAlerts};

pub async fn execute(
    id: String,
    fields: FieldArgs,
    config_path: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let id: RecordId = id.parse()?;
    let config = view::load(config_path.as_deref(), base_url)?;
    let mut controller = view::open(&config, Arc::new(StderrAlerts)).await?;

    controller
        .open_for_edit_by_id(&id)
        .with_context(|| format!("cannot edit #{id}"))?;
    fields.apply(&mut controller)?;

    let name = controller
        .form()
        .map(|f| f.draft.name.clone())
        .unwrap_or_else(|| id.to_string());
    finish_save(controller.submit().await, &name)
}
