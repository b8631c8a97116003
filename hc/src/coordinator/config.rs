//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::combinations::DEFAULT_ALPHABET;

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Symbols candidates are built from, in enumeration order
    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    /// Deadline applied to every request, in milliseconds
    #[serde(default = "default_timeout_ms", rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Result channel buffer for in-process workers
    #[serde(default = "default_result_buffer", rename = "result-buffer")]
    pub result_buffer: usize,
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_timeout_ms() -> u64 {
    debug!("default_timeout_ms: called");
    60_000
}

fn default_result_buffer() -> usize {
    256
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            alphabet: default_alphabet(),
            timeout_ms: default_timeout_ms(),
            result_buffer: default_result_buffer(),
        }
    }
}

impl CoordinatorConfig {
    /// Request deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }
}
