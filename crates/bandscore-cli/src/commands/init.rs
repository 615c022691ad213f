//! The `bandscore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("bandscore.toml").exists() {
        println!("bandscore.toml already exists, skipping.");
    } else {
        std::fs::write("bandscore.toml", SAMPLE_CONFIG)?;
        println!("Created bandscore.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point base_url in bandscore.toml at your score-records API");
    println!("  2. Run: bandscore list");
    println!("  3. Run: bandscore shell");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# bandscore configuration

# Root of the score-records resource. ${VAR} references are expanded,
# and BANDSCORE_BASE_URL overrides this value.
base_url = "http://localhost:3000/api/scores"

# Scored skills. Listening and reading are required; drop speaking and
# writing for the two-skill view.
skills = ["listening", "reading", "speaking", "writing"]

# auto, table or cards. auto switches to cards below card_breakpoint columns.
layout = "auto"
card_breakpoint = 80

# Per-request timeout in seconds. Unset means no client-side timeout.
# timeout_secs = 30
"#;
