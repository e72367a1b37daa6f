/// Server configuration read from the environment.
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use nuit_downloader::ResolverConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything `main` needs to start serving.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub resolver: ResolverConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&lookup, "API_PORT", 3000, "a port number")?;
        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "./static".to_string());

        let metadata_secs = timeout_secs(&lookup, "METADATA_TIMEOUT_SECS", 45)?;
        let open_secs = timeout_secs(&lookup, "STREAM_OPEN_TIMEOUT_SECS", 30)?;

        let mut resolver = ResolverConfig::default().with_timeouts(
            Duration::from_secs(metadata_secs),
            Duration::from_secs(open_secs),
        );
        if let Some(command) = lookup("YTDLP_BIN") {
            resolver = resolver.with_command(&command);
        }
        if let Some(user_agent) = lookup("UPSTREAM_USER_AGENT").filter(|ua| !ua.trim().is_empty()) {
            resolver = resolver.with_user_agent(user_agent.trim());
        }

        Ok(Self {
            host,
            port,
            static_dir: PathBuf::from(static_dir),
            resolver,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
    }
}

/// Timeouts must be at least one second.
fn timeout_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    const EXPECTED: &str = "a positive number of seconds";
    let secs: u64 = parse_or(lookup, key, default, EXPECTED)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            expected: EXPECTED,
            value: secs.to_string(),
        });
    }
    Ok(secs)
}
