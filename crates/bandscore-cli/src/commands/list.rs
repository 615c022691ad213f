//! The `bandscore list` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;

use bandscore_client::Layout;

use crate::render;
use crate::view::{self, StderrAlerts};

/// How `list` prints the visible records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub async fn execute(
    search: Option<String>,
    layout: Option<Layout>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let config = view::load(config_path.as_deref(), base_url)?;
    let mut controller = view::open(&config, Arc::new(StderrAlerts)).await?;

    if let Some(term) = search {
        controller.set_search(term);
    }
    let visible = controller.visible();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&visible)?);
        }
        OutputFormat::Text => {
            let layout = render::resolve_layout(
                layout.unwrap_or(config.layout),
                render::terminal_width(),
                config.card_breakpoint,
            );
            println!(
                "{}",
                render::render_records(&visible, controller.schema(), layout)
            );
            println!(
                "{}",
                render::render_footer(
                    visible.len(),
                    controller.records().len(),
                    controller.last_refreshed()
                )
            );
        }
    }

    Ok(())
}
