use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:6121";
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Coordinator configuration
///
/// Read from the process environment after loading an optional `.env` file.
///
/// | Variable            | Default        |
/// |---------------------|----------------|
/// | `BIND_ADDR`         | `0.0.0.0:6121` |
/// | `WWW_DIR`           | unset          |
/// | `MAX_AGENTS`        | unbounded      |
/// | `MAX_PAYLOAD_BYTES` | `1048576`      |
/// | `LOG_LEVEL`         | `info`         |
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Directory served for unmatched paths instead of generated data
    pub www_dir: Option<PathBuf>,
    pub max_agents: Option<usize>,
    pub max_payload_bytes: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 6121).into(),
            www_dir: None,
            max_agents: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_var(
            "BIND_ADDR",
            lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let www_dir = lookup("WWW_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        let max_agents = lookup("MAX_AGENTS")
            .map(|value| parse_var::<usize>("MAX_AGENTS", value))
            .transpose()?;

        let max_payload_bytes = match lookup("MAX_PAYLOAD_BYTES") {
            Some(value) => parse_var("MAX_PAYLOAD_BYTES", value)?,
            None => DEFAULT_MAX_PAYLOAD_BYTES,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            bind_addr,
            www_dir,
            max_agents,
            max_payload_bytes,
            log_level,
        })
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
        value,
    })
}
