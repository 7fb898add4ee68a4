//! Server configuration resolved from defaults and environment overrides.
//!
//! # Invariants
//! - Every setting has a default; environment variables only override.
//! - Blank override values fall back to the default.
//! - Relative paths are resolved against the process working directory.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use userboard_core::{LogLevel, LoggingError};

pub const DB_PATH_ENV: &str = "USERBOARD_DB_PATH";
pub const BIND_ENV: &str = "USERBOARD_BIND";
pub const LOG_LEVEL_ENV: &str = "USERBOARD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "USERBOARD_LOG_DIR";

const DEFAULT_DB_PATH: &str = "db/dev.db";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
    InvalidBind {
        value: String,
        source: AddrParseError,
    },
    InvalidLogLevel(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
            Self::InvalidBind { value, source } => {
                write!(f, "invalid {BIND_ENV} value `{value}`: {source}")
            }
            Self::InvalidLogLevel(err) => write!(f, "invalid {LOG_LEVEL_ENV}: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::InvalidBind { source, .. } => Some(source),
            Self::InvalidLogLevel(err) => Some(err),
        }
    }
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: LogLevel,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Resolves settings from an arbitrary key lookup, relative to `base_dir`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let db_path = base_dir.join(value(DB_PATH_ENV).unwrap_or_else(|| DEFAULT_DB_PATH.into()));

        let bind_raw = value(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind_raw.clone(),
                source,
            })?;

        let log_level = match value(LOG_LEVEL_ENV) {
            Some(raw) => LogLevel::parse(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => LogLevel::for_build(),
        };

        let log_dir = base_dir.join(value(LOG_DIR_ENV).unwrap_or_else(|| DEFAULT_LOG_DIR.into()));

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned(), Path::new("/srv/app"))
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = resolve(&[]).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/srv/app/db/dev.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, LogLevel::for_build());
        assert_eq!(config.log_dir, PathBuf::from("/srv/app/logs"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let config = resolve(&[
            (DB_PATH_ENV, "/var/lib/userboard/users.db"),
            (BIND_ENV, "0.0.0.0:8080"),
            (LOG_LEVEL_ENV, "WARN"),
            (LOG_DIR_ENV, "var/log"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/userboard/users.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, PathBuf::from("/srv/app/var/log"));
    }

    #[test]
    fn blank_overrides_fall_back_to_defaults() {
        let config = resolve(&[(DB_PATH_ENV, "   "), (BIND_ENV, "")]).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/srv/app/db/dev.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let err = resolve(&[(BIND_ENV, "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind { ref value, .. } if value == "localhost"));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let err = resolve(&[(LOG_LEVEL_ENV, "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }
}
