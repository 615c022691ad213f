//! The `bandscore delete` command.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use bandscore_core::model::RecordId;
use bandscore_core::traits::{AutoConfirm, ConfirmGate};
use bandscore_core::DeleteOutcome;

use crate::view::{self, LinePrompt, StderrAlerts};

pub async fn execute(
    id: String,
    yes: bool,
    config_path: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let id: RecordId = id.parse()?;
    let config = view::load(config_path.as_deref(), base_url)?;
    let mut controller = view::open(&config, Arc::new(StderrAlerts)).await?;

    let mut auto = AutoConfirm(true);
    let mut stdin = io::stdin().lock();
    let mut stderr = io::stderr();
    let mut prompt = LinePrompt {
        input: &mut stdin,
        output: &mut stderr,
    };
    let gate: &mut dyn ConfirmGate = if yes { &mut auto } else { &mut prompt };

    match controller.delete(&id, gate).await {
        DeleteOutcome::Dismissed => println!("Delete cancelled."),
        DeleteOutcome::Issued => println!(
            "Delete sent for #{id}; {} student(s) listed.",
            controller.records().len()
        ),
    }

    Ok(())
}
