//! bandscore CLI — admin client for IELTS score records.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use bandscore_client::Layout;
use commands::list::OutputFormat;

mod commands;
mod render;
mod view;

#[derive(Parser)]
#[command(name = "bandscore", version, about = "Admin client for IELTS score records")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Score-records API root, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List students
    List {
        /// Only show names containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Layout: auto, table, cards
        #[arg(long)]
        layout: Option<Layout>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Add a student
    Add {
        #[command(flatten)]
        fields: commands::FieldArgs,
    },

    /// Edit a student; omitted fields keep their current values
    Edit {
        /// Record id
        #[arg(long)]
        id: String,

        #[command(flatten)]
        fields: commands::FieldArgs,
    },

    /// Delete a student
    Delete {
        /// Record id
        #[arg(long)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Interactive admin view
    Shell,

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bandscore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            search,
            layout,
            format,
        } => commands::list::execute(search, layout, format, cli.config, cli.base_url).await,
        Commands::Add { fields } => commands::add::execute(fields, cli.config, cli.base_url).await,
        Commands::Edit { id, fields } => {
            commands::edit::execute(id, fields, cli.config, cli.base_url).await
        }
        Commands::Delete { id, yes } => {
            commands::delete::execute(id, yes, cli.config, cli.base_url).await
        }
        Commands::Shell => commands::shell::execute(cli.config, cli.base_url).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
