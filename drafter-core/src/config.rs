use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::fetcher::FetcherConfig;

pub const ENV_API_URL: &str = "DRAFTER_API_URL";
pub const ENV_API_TOKEN: &str = "DRAFTER_API_TOKEN";
pub const ENV_MIN_CHARS: &str = "DRAFTER_MIN_CHARS";
pub const ENV_DEBOUNCE_MS: &str = "DRAFTER_DEBOUNCE_MS";
pub const ENV_TIMEOUT_MS: &str = "DRAFTER_TIMEOUT_MS";

/// Settings shared by the suggestion and document clients.
///
/// Layered as defaults, then an optional JSON file, then `DRAFTER_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrafterConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub min_chars: usize,
    pub debounce_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for DrafterConfig {
    fn default() -> Self {
        let fetcher = FetcherConfig::default();
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_token: None,
            min_chars: fetcher.min_chars,
            debounce_ms: fetcher.debounce.as_millis() as u64,
            request_timeout_ms: fetcher.request_timeout.as_millis() as u64,
        }
    }
}

impl DrafterConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid drafter config")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Defaults, optionally overlaid by `path`, then by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `DRAFTER_*` overrides pulled from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(v) = lookup(ENV_MIN_CHARS) {
            self.min_chars = parse_number(ENV_MIN_CHARS, &v)?;
        }
        if let Some(v) = lookup(ENV_DEBOUNCE_MS) {
            self.debounce_ms = parse_number(ENV_DEBOUNCE_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_MS) {
            self.request_timeout_ms = parse_number(ENV_TIMEOUT_MS, &v)?;
        }
        Ok(self)
    }

    pub fn fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            min_chars: self.min_chars,
            debounce: Duration::from_millis(self.debounce_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got {:?}", key, value))
}
