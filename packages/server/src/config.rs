//! Server configuration read from environment variables.

use std::time::Duration;

/// Default backend request timeout.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Default interval between backend health probes.
pub const DEFAULT_BACKEND_POLL_SECS: u64 = 15;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held an unusable value.
    #[error("invalid value '{value}' for {name}: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// What was expected.
        message: String,
    },
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Inference backend base URL (`BACKEND_URL`).
    pub backend_url: String,
    /// Per-request backend timeout (`BACKEND_TIMEOUT_SECS`).
    pub backend_timeout: Duration,
    /// Interval between backend health probes (`BACKEND_POLL_SECS`).
    pub backend_poll_interval: Duration,
    /// Path probed on the backend to check availability.
    pub backend_health_path: String,
    /// Whether to seed the alert store with demo alerts (`SEED_SAMPLE_ALERTS`).
    pub seed_sample_alerts: bool,
    /// Seed for the fallback random source (`SYNTH_SEED`). Entropy when unset.
    pub synth_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 3000,
            backend_url: "http://localhost:5000".to_string(),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            backend_poll_interval: Duration::from_secs(DEFAULT_BACKEND_POLL_SECS),
            backend_health_path: "/api/dashboard-stats".to_string(),
            seed_sample_alerts: true,
            synth_seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset or empty variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => parse_number::<u16>("PORT", &v)?,
            None => defaults.port,
        };
        let backend_timeout = match get("BACKEND_TIMEOUT_SECS") {
            Some(v) => positive_secs("BACKEND_TIMEOUT_SECS", &v)?,
            None => defaults.backend_timeout,
        };
        let backend_poll_interval = match get("BACKEND_POLL_SECS") {
            Some(v) => positive_secs("BACKEND_POLL_SECS", &v)?,
            None => defaults.backend_poll_interval,
        };
        let seed_sample_alerts = match get("SEED_SAMPLE_ALERTS") {
            Some(v) => parse_bool("SEED_SAMPLE_ALERTS", &v)?,
            None => defaults.seed_sample_alerts,
        };
        let synth_seed = get("SYNTH_SEED")
            .map(|v| parse_number::<u64>("SYNTH_SEED", &v))
            .transpose()?;

        let backend_url = get("BACKEND_URL").unwrap_or(defaults.backend_url);
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "BACKEND_URL",
                value: backend_url,
                message: "expected an http:// or https:// URL".to_string(),
            });
        }

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            backend_url,
            backend_timeout,
            backend_poll_interval,
            backend_health_path: get("BACKEND_HEALTH_PATH").unwrap_or(defaults.backend_health_path),
            seed_sample_alerts,
            synth_seed,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn positive_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_number::<u64>(name, value)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            message: "must be at least 1 second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}
