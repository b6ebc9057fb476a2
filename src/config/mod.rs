//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SWAPREC_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::session::SessionPolicy;
use crate::session::policy::{DEFAULT_BRAND_CAP, DEFAULT_ORACLE_RETRIES};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SWAPREC_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path to the precomputed replacement dataset (JSON). Default:
    /// `./data/replacements.json`.
    pub dataset_path: PathBuf,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding product embeddings. Default: `usa_products`.
    pub collection: String,

    /// Completion model used for oracle selection. Default: `gemini-2.0-flash`.
    pub oracle_model: String,

    /// Max recommendations per brand per session. Default: `2`.
    pub brand_cap: u32,

    /// Oracle attempts per backfill. Default: `3`.
    pub oracle_retries: u32,

    /// Deadline (seconds) for each index/oracle call. Default: `10`.
    pub external_timeout_secs: u64,

    /// Max concurrently tracked sessions. Default: `10_000`.
    pub session_capacity: u64,

    /// Idle seconds before a session is evicted. Default: `3600`.
    pub session_idle_secs: u64,

    /// Serve canned oracle selections instead of calling the provider.
    /// Default: `false`.
    pub mock_oracle: bool,
}

/// Default Qdrant URL used when `SWAPREC_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            dataset_path: PathBuf::from("./data/replacements.json"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: crate::index::DEFAULT_COLLECTION_NAME.to_string(),
            oracle_model: crate::oracle::DEFAULT_ORACLE_MODEL.to_string(),
            brand_cap: DEFAULT_BRAND_CAP,
            oracle_retries: DEFAULT_ORACLE_RETRIES,
            external_timeout_secs: 10,
            session_capacity: 10_000,
            session_idle_secs: 3600,
            mock_oracle: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SWAPREC_PORT";
    const ENV_BIND_ADDR: &'static str = "SWAPREC_BIND_ADDR";
    const ENV_DATASET_PATH: &'static str = "SWAPREC_DATASET_PATH";
    const ENV_QDRANT_URL: &'static str = "SWAPREC_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "SWAPREC_COLLECTION";
    const ENV_ORACLE_MODEL: &'static str = "SWAPREC_ORACLE_MODEL";
    const ENV_BRAND_CAP: &'static str = "SWAPREC_BRAND_CAP";
    const ENV_ORACLE_RETRIES: &'static str = "SWAPREC_ORACLE_RETRIES";
    const ENV_EXTERNAL_TIMEOUT_SECS: &'static str = "SWAPREC_EXTERNAL_TIMEOUT_SECS";
    const ENV_SESSION_CAPACITY: &'static str = "SWAPREC_SESSION_CAPACITY";
    const ENV_SESSION_IDLE_SECS: &'static str = "SWAPREC_SESSION_IDLE_SECS";
    const ENV_MOCK_ORACLE: &'static str = "SWAPREC_MOCK_ORACLE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let dataset_path = Self::parse_path_from_env(Self::ENV_DATASET_PATH, defaults.dataset_path);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let oracle_model =
            Self::parse_string_from_env(Self::ENV_ORACLE_MODEL, defaults.oracle_model);
        let brand_cap = Self::parse_u32_from_env(Self::ENV_BRAND_CAP, defaults.brand_cap);
        let oracle_retries =
            Self::parse_u32_from_env(Self::ENV_ORACLE_RETRIES, defaults.oracle_retries);
        let external_timeout_secs = Self::parse_u64_from_env(
            Self::ENV_EXTERNAL_TIMEOUT_SECS,
            defaults.external_timeout_secs,
        );
        let session_capacity =
            Self::parse_u64_from_env(Self::ENV_SESSION_CAPACITY, defaults.session_capacity);
        let session_idle_secs =
            Self::parse_u64_from_env(Self::ENV_SESSION_IDLE_SECS, defaults.session_idle_secs);
        let mock_oracle = Self::parse_bool_from_env(Self::ENV_MOCK_ORACLE, defaults.mock_oracle);

        Ok(Self {
            port,
            bind_addr,
            dataset_path,
            qdrant_url,
            collection,
            oracle_model,
            brand_cap,
            oracle_retries,
            external_timeout_secs,
            session_capacity,
            session_idle_secs,
            mock_oracle,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dataset_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.dataset_path.clone(),
            });
        }
        if !self.dataset_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.dataset_path.clone(),
            });
        }

        if self.brand_cap == 0 {
            return Err(ConfigError::ZeroValue { name: "brand cap" });
        }
        if self.oracle_retries == 0 {
            return Err(ConfigError::ZeroValue {
                name: "oracle retries",
            });
        }
        if self.external_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue {
                name: "external timeout",
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Session tuning derived from this configuration.
    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            brand_cap: self.brand_cap,
            oracle_retries: self.oracle_retries,
            external_timeout: Duration::from_secs(self.external_timeout_secs),
            ..SessionPolicy::default()
        }
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u32_from_env(var_name: &str, default: u32) -> u32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .ok()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(default)
    }
}
