pub mod add;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod shell;

use anyhow::Result;
use clap::Args;

use bandscore_core::{AdminController, SubmitOutcome};

/// Form fields accepted by `add` and `edit`, as raw text.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    /// Student name
    #[arg(long)]
    pub name: Option<String>,

    /// Listening score (0-75)
    #[arg(long)]
    pub listening: Option<String>,

    /// Reading score (0-75)
    #[arg(long)]
    pub reading: Option<String>,

    /// Speaking score (0-75)
    #[arg(long)]
    pub speaking: Option<String>,

    /// Writing score (0-75)
    #[arg(long)]
    pub writing: Option<String>,
}

impl FieldArgs {
    /// `(field, value)` for every flag that was given.
    pub fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("listening", &self.listening),
            ("reading", &self.reading),
            ("speaking", &self.speaking),
            ("writing", &self.writing),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    /// Copy the given flags into the open form.
    pub fn apply(&self, controller: &mut AdminController) -> Result<()> {
        for (field, value) in self.assignments() {
            controller.update_field(field, value)?;
        }
        Ok(())
    }
}

/// Turn a one-shot submit into the command's result.
///
/// Validation warnings have already gone out through the alert sink, and
/// transport failures through the log.
pub fn finish_save(outcome: SubmitOutcome, name: &str) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved => {
            println!("Saved {name}.");
            Ok(())
        }
        _ => anyhow::bail!("{name} was not saved"),
    }
}
