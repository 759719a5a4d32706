// src/config/options.rs
use std::{fs, path::{Path, PathBuf}, time::Duration};

use serde::Deserialize;

use super::consts::{API_BASE, REQUEST_PAUSE_SECS};
use crate::error::{Error, Result};

/// What to do when one run fails to format or to post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure and leave the run file untouched.
    #[default]
    Abort,
    /// Log the failure, keep going, and leave the failed id out of the run file.
    Skip,
}

/// The JSON config file, e.g.
///
/// ```json
/// {
///   "webhook": "https://discord.com/api/webhooks/…",
///   "name": "Run Bot",
///   "params": ["status=verified", "orderby=verify-date", "direction=desc"],
///   "series": "rj1dy1o8",
///   "runfile": "runs.json"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    pub webhook: String,
    pub name: String,
    /// Raw query-string fragments, appended as-is to the runs request.
    pub params: Vec<String>,
    #[serde(default)]
    pub series: Option<String>,
    pub runfile: PathBuf,

    #[serde(default = "default_api")]
    pub api: String,
    #[serde(default = "default_delay")]
    pub delay_secs: u64,
    /// Keep only the most recent N ids in the run file.
    #[serde(default)]
    pub keep: Option<usize>,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

fn default_api() -> String {
    s!(API_BASE)
}

fn default_delay() -> u64 {
    REQUEST_PAUSE_SECS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
            .map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, webhook: Option<String>, name: Option<String>) {
        if let Some(w) = webhook { self.webhook = w; }
        if let Some(n) = name { self.name = n; }
    }

    pub fn validate(&self) -> Result<()> {
        let hook = self.webhook.trim();
        if hook.is_empty() {
            return Err(Error::ConfigInvalid(s!("webhook URL is empty")));
        }
        if !(hook.starts_with("https://") || hook.starts_with("http://")) {
            return Err(Error::ConfigInvalid(format!("webhook URL must be http(s): {hook}")));
        }
        if self.runfile.as_os_str().is_empty() {
            return Err(Error::ConfigInvalid(s!("runfile path is empty")));
        }
        if self.keep == Some(0) {
            return Err(Error::ConfigInvalid(s!("keep must be at least 1")));
        }
        Ok(())
    }

    /// An empty `series` string means no series.
    pub fn series(&self) -> Option<&str> {
        self.series.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}
