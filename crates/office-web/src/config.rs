//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Office web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Login portal that unauthenticated visitors are sent to.
    pub portal_url: String,
    /// Lifetime of a login session.
    pub session_ttl: Duration,
    /// Insert demo rows into an empty database.
    pub seed_demo: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `OFFICE_ADDR` | Server bind address | `127.0.0.1:3001` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:office.db?mode=rwc` |
    /// | `PORTAL_URL` | Login portal URL | `/login` |
    /// | `SESSION_TTL_HOURS` | Session lifetime in hours | `12` |
    /// | `SEED_DEMO` | Seed demo data on first run | `true` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("OFFICE_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:office.db?mode=rwc".to_string());

        let portal_url = env::var("PORTAL_URL").unwrap_or_else(|_| "/login".to_string());

        let session_ttl = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => {
                let hours: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidSessionTtl(raw.clone()))?;
                Duration::from_secs(hours * 3600)
            }
            Err(_) => Duration::from_secs(12 * 3600),
        };

        let seed_demo = match env::var("SEED_DEMO") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidSeedFlag(raw))?,
            Err(_) => true,
        };

        Ok(Self {
            addr,
            database_url,
            portal_url,
            session_ttl,
            seed_demo,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid OFFICE_ADDR format")]
    InvalidAddr,

    #[error("Invalid SESSION_TTL_HOURS value: {0}")]
    InvalidSessionTtl(String),

    #[error("Invalid SEED_DEMO value: {0}")]
    InvalidSeedFlag(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
