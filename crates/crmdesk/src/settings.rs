//! Settings model.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crmdesk_core::{AudienceRegistry, RetryPolicy};
use serde::{Deserialize, Serialize};

/// File name inside the config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Application settings loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Default entity snapshot, used when `--data` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    /// Fake latency of the simulated transport, in milliseconds.
    pub simulated_latency_ms: u64,
    /// Retry behavior for failed sends.
    pub retry: RetrySettings,
    /// Recipient groups offered by `send`.
    pub audiences: AudienceRegistry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "crmdesk=info,crmdesk_core=info".to_string(),
            data_path: None,
            simulated_latency_ms: 2000,
            retry: RetrySettings::default(),
            audiences: AudienceRegistry::builtin(),
        }
    }
}

impl Settings {
    /// Latency of the simulated transport.
    #[must_use]
    pub const fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Serialized form of [`RetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds. Doubles each retry.
    pub initial_backoff_ms: u64,
    /// Upper bound on the delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Per-attempt time limit in seconds; `null` disables it.
    pub attempt_timeout_secs: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
            attempt_timeout_secs: Some(30),
        }
    }
}

impl RetrySettings {
    /// Builds the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the values are out of range.
    pub fn to_policy(self) -> crmdesk_core::Result<RetryPolicy> {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
            self.attempt_timeout_secs.map(Duration::from_secs),
        )
    }
}

/// Default settings location: `<config dir>/crmdesk/settings.json`.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crmdesk").join(SETTINGS_FILE))
}

/// Load settings from `path`, or defaults if the file does not exist.
pub async fn load_settings(path: &Path) -> Result<Settings, String> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;

    serde_json::from_str(&contents).map_err(|e| format!("Invalid {}: {e}", path.display()))
}
