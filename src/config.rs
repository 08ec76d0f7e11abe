//! Configuration types for station-dl
//!
//! All configuration is explicit constructor input: there is no ambient
//! global settings store. The hosting application loads its own config and
//! hands a [`Config`] to each controller it creates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the remote download service
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StationConfig {
    /// Base URL of the service's web API (e.g., "http://nas.local:5000")
    pub base_url: String,

    /// Username for session login (no login is attempted when unset)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for session login
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: None,
            password: None,
        }
    }
}

/// Remote destination settings
///
/// The destination root comes from the explicit override when set, otherwise
/// from the service's configured default destination (fetched once during
/// initialization).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Explicit destination root, overriding the service default (e.g., "/downloads")
    #[serde(default)]
    pub root: Option<String>,

    /// Optional subfolder grouping downloads under the root (e.g., "movies")
    #[serde(default)]
    pub category: Option<String>,
}

/// Retry behavior for task creation
///
/// `max_attempts` is the single authoritative bound: the creation loop and
/// its log messages both read it. Backoff is linear: the wait after attempt
/// `n` is `n * backoff_step`, with no wait after the final attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of creation attempts (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` waits `n * backoff_step` (default: 1 second)
    #[serde(default = "default_backoff_step", with = "duration_serde")]
    pub backoff_step: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_step: default_backoff_step(),
        }
    }
}

/// Top-level configuration for a download controller
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service connection settings
    #[serde(default)]
    pub station: StationConfig,

    /// Remote destination settings
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Task creation retry tuning
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_step() -> Duration {
    Duration::from_secs(1)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
