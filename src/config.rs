// ⚙️ Configuration - JSON file + defaults, CLI flags override
//
// Lookup: explicit --config path, else ./report-card.json, else defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "report-card.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the terminal UI saves downloaded report cards
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Listen address for the HTTP form
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// tracing EnvFilter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./report-cards")
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_log_filter() -> String {
    "report_card=info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            output_dir: default_output_dir(),
            bind_addr: default_bind_addr(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: AppConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Load from an explicit path (must exist), else the default file if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("config file not found: {}", p.display());
                }
                AppConfig::from_file(p)
            }
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    AppConfig::from_file(local)
                } else {
                    Ok(AppConfig::default())
                }
            }
        }
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn with_bind_addr(mut self, bind_addr: Option<String>) -> Self {
        if let Some(addr) = bind_addr {
            self.bind_addr = addr;
        }
        self
    }
}
