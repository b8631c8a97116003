//! Hashcrack configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coordinator::CoordinatorConfig;
use crate::digest::DigestAlgorithm;

/// Comma-separated worker base URLs; replaces `manager.worker-urls`
pub const WORKER_URLS_ENV: &str = "WORKER_URLS";

/// Manager base URL; replaces `worker.manager-url`
pub const MANAGER_URL_ENV: &str = "MANAGER_URL";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Manager role
    pub manager: ManagerConfig,

    /// Worker role
    pub worker: WorkerConfig,
}

impl Config {
    /// Reject settings no request could succeed with
    pub fn validate(&self) -> Result<()> {
        let alphabet = &self.manager.coordinator.alphabet;
        if alphabet.is_empty() {
            return Err(eyre::eyre!("manager.alphabet must not be empty"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = alphabet.chars().find(|c| !seen.insert(*c)) {
            return Err(eyre::eyre!("manager.alphabet repeats symbol '{}'", dup));
        }
        if self.manager.coordinator.timeout_ms == 0 {
            return Err(eyre::eyre!("manager.timeout-ms must be positive"));
        }
        if self.manager.dispatch_timeout_ms == 0 || self.worker.push_timeout_ms == 0 {
            return Err(eyre::eyre!("HTTP timeouts must be positive"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .hashcrack.yml
        let local_config = PathBuf::from(".hashcrack.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/hashcrack/hashcrack.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("hashcrack").join("hashcrack.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Log level from the config file, read before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `WORKER_URLS` and `MANAGER_URL` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(urls) = lookup(WORKER_URLS_ENV).filter(|v| !v.trim().is_empty()) {
            self.manager.worker_urls = split_urls(&urls);
            tracing::debug!(urls = ?self.manager.worker_urls, "apply_env_overrides_from: worker urls overridden");
        }
        if let Some(url) = lookup(MANAGER_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.worker.manager_url = url.trim().to_string();
            tracing::debug!(url = %self.worker.manager_url, "apply_env_overrides_from: manager url overridden");
        }
    }
}

/// Split a comma-separated URL list, dropping blanks
pub fn split_urls(urls: &str) -> Vec<String> {
    urls.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Manager role configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Listen address
    pub bind: String,

    /// Base URLs of the workers, one share each
    #[serde(rename = "worker-urls")]
    pub worker_urls: Vec<String>,

    /// Per-call timeout when sending shares, in milliseconds
    #[serde(rename = "dispatch-timeout-ms")]
    pub dispatch_timeout_ms: u64,

    /// Alphabet, request deadline and result buffer
    #[serde(flatten)]
    pub coordinator: CoordinatorConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            worker_urls: vec!["http://localhost:8081".to_string()],
            dispatch_timeout_ms: 10_000,
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl ManagerConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

/// Worker role configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Listen address
    pub bind: String,

    /// Base URL of the manager results are pushed to
    #[serde(rename = "manager-url")]
    pub manager_url: String,

    /// Hash function the worker compares against
    pub digest: DigestAlgorithm,

    /// Timeout when pushing results, in milliseconds
    #[serde(rename = "push-timeout-ms")]
    pub push_timeout_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8081".to_string(),
            manager_url: "http://localhost:8080".to_string(),
            digest: DigestAlgorithm::default(),
            push_timeout_ms: 10_000,
        }
    }
}

impl WorkerConfig {
    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}
