//! Client configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bandscore_core::model::ScoreSchema;

use crate::http::HttpTransport;

const CONFIG_FILE: &str = "bandscore.toml";
const BASE_URL_ENV: &str = "BANDSCORE_BASE_URL";

/// How the record list is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Cards below the breakpoint, a table above it.
    #[default]
    Auto,
    Table,
    Cards,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Auto => write!(f, "auto"),
            Layout::Table => write!(f, "table"),
            Layout::Cards => write!(f, "cards"),
        }
    }
}

impl FromStr for Layout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Layout::Auto),
            "table" => Ok(Layout::Table),
            "cards" | "card" => Ok(Layout::Cards),
            other => anyhow::bail!("unknown layout: {other} (expected auto, table or cards)"),
        }
    }
}

/// Top-level bandscore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Root of the score-records resource.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Scored skills shown in the form and the list.
    #[serde(default)]
    pub skills: ScoreSchema,
    /// Per-request timeout; none by default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Record list layout.
    #[serde(default)]
    pub layout: Layout,
    /// Terminal width below which `auto` switches to cards.
    #[serde(default = "default_card_breakpoint")]
    pub card_breakpoint: usize,
}

fn default_base_url() -> String {
    "http://localhost:3000/api/scores".to_string()
}
fn default_card_breakpoint() -> usize {
    80
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            skills: ScoreSchema::default(),
            timeout_secs: None,
            layout: Layout::default(),
            card_breakpoint: default_card_breakpoint(),
        }
    }
}

impl AdminConfig {
    /// Build the HTTP transport this configuration describes.
    pub fn transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(&self.base_url, self.timeout_secs.map(Duration::from_secs))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through as-is and never re-scanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `bandscore.toml` in the current directory
/// 2. `~/.config/bandscore/config.toml`
///
/// `BANDSCORE_BASE_URL` overrides the file's `base_url`.
pub fn load_config() -> Result<AdminConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AdminConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AdminConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AdminConfig::default(),
    };

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            config.base_url = url;
        }
    }
    config.base_url = resolve_env_vars(&config.base_url);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bandscore"))
}
