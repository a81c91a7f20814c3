use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::models::RunMetadata;

pub const CONFIG_FILE: &str = "tally.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub submit: SubmitConfig,
}

/// Controls how the summary is delivered to the reporting service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Extra attempts after a failed POST.
    pub retries: u32,
    /// Base URL overriding `https://<instance>.service-now.com`.
    /// Example: "http://localhost:8080"
    pub endpoint: Option<String>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retries: 2,
            endpoint: None,
        }
    }
}

impl Config {
    /// Load `tally.toml` from the workspace root, falling back to defaults if absent or invalid.
    pub fn load(workspace: &Path) -> Self {
        Self::load_file(&workspace.join(CONFIG_FILE))
    }

    pub fn load_file(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), "ignoring invalid config: {}", e);
            Self::default()
        })
    }
}

/// The subset of the GitHub Actions `github` context the payload needs.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubContext {
    #[serde(deserialize_with = "text_or_number")]
    pub run_number: String,
    #[serde(deserialize_with = "text_or_number")]
    pub run_id: String,
    #[serde(deserialize_with = "text_or_number")]
    pub run_attempt: String,
    #[serde(default)]
    pub workflow: String,
    #[serde(default)]
    pub repository: String,
}

impl GithubContext {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse GitHub context JSON")
    }

    pub fn run_metadata(&self) -> RunMetadata {
        RunMetadata {
            build_number: self.run_number.clone(),
            attempt_number: self.run_attempt.clone(),
        }
    }
}

/// GitHub serialises run counters as strings, hand-written contexts often use numbers.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}
