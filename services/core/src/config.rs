//! Configuration shared by every tool.
//!
//! Each tool's configuration is loaded in layers (later sources override
//! earlier ones):
//! 1. serde defaults
//! 2. `config/<tool>` and `/etc/thapasya/<tool>` (any format `config` reads)
//! 3. an explicit `--config` file
//! 4. environment variables prefixed with `THAPASYA__`
//!    (`THAPASYA__FIRESTORE__PROJECT_ID` -> `firestore.project_id`)
//! 5. `FIRESTORE_EMULATOR_HOST`, which points the client at the emulator

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use ::config::ConfigError;

/// Firestore connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreConfig {
    /// GCP project; defaults to the project of the service-account key
    #[serde(default)]
    pub project_id: Option<String>,
    /// Database id
    #[serde(default = "default_database")]
    pub database: String,
    /// Path to the service-account JSON key
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    /// Pre-issued bearer token, used instead of the key file when set
    #[serde(default)]
    pub access_token: Option<String>,
    /// Custom API root (emulator, proxies); must include the `/v1` suffix
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Page size used when listing collections
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: compact, pretty or json
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("ServiceAccount.json")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    300
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            database: default_database(),
            credentials_path: default_credentials_path(),
            access_token: None,
            endpoint_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl FirestoreConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load a tool's configuration through the layers described above
pub fn load<T: DeserializeOwned>(tool: &str, explicit: Option<&Path>) -> Result<T, ConfigError> {
    let emulator = std::env::var("FIRESTORE_EMULATOR_HOST")
        .ok()
        .filter(|host| !host.trim().is_empty())
        .map(|host| format!("http://{}/v1", host.trim()));

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::with_name(&format!("config/{}", tool)).required(false))
        .add_source(::config::File::with_name(&format!("/etc/thapasya/{}", tool)).required(false));

    if let Some(path) = explicit {
        builder = builder.add_source(::config::File::from(path).required(true));
    }

    let config = builder
        .add_source(
            ::config::Environment::with_prefix("THAPASYA")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("firestore.endpoint_url", emulator)?
        .build()?;

    config.try_deserialize()
}
