//! Configuration types for clean-audio

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the bearer token
pub const API_KEY_ENV: &str = "AUPHONIC_API_KEY";

/// Default preset name looked up on the server
pub const DEFAULT_PRESET: &str = "Usual-2";

/// Default output directory, relative to the user's home
pub const DEFAULT_OUTPUT_DIR: &str = "~/Downloads/auphonic_results";

/// Runtime configuration for one pipeline run
///
/// Defaults match the hosted Auphonic service; tests override `base_url` to
/// point at a mock server and shrink the timing fields so polling tests run
/// in virtual time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// API base URL (default: "https://auphonic.com/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token used on every request
    #[serde(default)]
    pub api_key: String,

    /// Pause between creating a production and sending the start command,
    /// letting the creation side effects settle server-side (default: 2s)
    #[serde(default = "default_start_delay")]
    pub start_delay: Duration,

    /// Pause before the first status poll (default: 5s)
    #[serde(default = "default_initial_poll_delay")]
    pub initial_poll_delay: Duration,

    /// Fixed spacing between status polls (default: 15s)
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Wall-clock budget for the whole polling phase (default: 300s)
    ///
    /// A hard ceiling, not a backoff schedule: on exceeding it the run
    /// aborts with a pointer to the manual status page.
    #[serde(default = "default_max_wait")]
    pub max_wait: Duration,

    /// Timeout for the small JSON requests (default: 60s)
    ///
    /// Applies to preset listing, the start command, status polls and the
    /// detail fetch. The upload and the result downloads are not bounded by
    /// it, since a long audio file legitimately takes longer than any fixed
    /// request deadline.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl Config {
    /// Build a config with defaults and the API key taken from the
    /// process environment.
    ///
    /// Fails before any network call if the key is absent or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config {
                message: format!("{API_KEY_ENV} environment variable is required"),
            })?;
        Ok(Self {
            api_key,
            ..Self::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            start_delay: default_start_delay(),
            initial_poll_delay: default_initial_poll_delay(),
            poll_interval: default_poll_interval(),
            max_wait: default_max_wait(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://auphonic.com/api".to_string()
}

fn default_start_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_initial_poll_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_max_wait() -> Duration {
    Duration::from_secs(300)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}
