//! Configuration module for the fleet dashboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default GitHub REST endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Base URL of the GitHub REST API
    pub github_api_url: String,
    /// Per-request timeout for outbound GitHub calls
    pub github_timeout: Duration,
    /// Idle time after which a session handle stops working
    pub session_ttl: Duration,
    /// Directory holding one HTML fragment per view
    pub views_dir: PathBuf,
    /// When set, an in-memory GitHub backend is used and this is its only valid token
    pub offline_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_addr =
            env::var("FLEET_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                name: "FLEET_BIND_ADDR",
                value: raw_addr.clone(),
                reason: e.to_string(),
            }
        })?;

        let log_level = env::var("FLEET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("FLEET_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    name: "FLEET_LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected `text` or `json`".to_string(),
                })
            }
        };

        let github_api_url = env::var("FLEET_GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let github_timeout = seconds_var("FLEET_GITHUB_TIMEOUT_SECS", 15)?;
        let session_ttl = seconds_var(
            "FLEET_SESSION_TTL_SECS",
            crate::auth::DEFAULT_SESSION_TTL.as_secs(),
        )?;

        let views_dir = env::var("FLEET_VIEWS_DIR")
            .unwrap_or_else(|_| "./views".to_string())
            .into();

        let offline_token = env::var("FLEET_OFFLINE_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Ok(Self {
            bind_addr,
            log_level,
            log_format,
            github_api_url,
            github_timeout,
            session_ttl,
            views_dir,
            offline_token,
        })
    }
}

/// A positive whole number of seconds, or `default` when unset.
fn seconds_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "FLEET_BIND_ADDR",
        "FLEET_LOG_LEVEL",
        "FLEET_LOG_FORMAT",
        "FLEET_GITHUB_API_URL",
        "FLEET_GITHUB_TIMEOUT_SECS",
        "FLEET_SESSION_TTL_SECS",
        "FLEET_VIEWS_DIR",
        "FLEET_OFFLINE_TOKEN",
    ];

    // Single test so env mutation does not race across test threads.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.github_timeout, Duration::from_secs(15));
        assert_eq!(config.session_ttl, crate::auth::DEFAULT_SESSION_TTL);
        assert_eq!(config.views_dir, PathBuf::from("./views"));
        assert!(config.offline_token.is_none());

        env::set_var("FLEET_GITHUB_API_URL", "http://localhost:9000/");
        env::set_var("FLEET_GITHUB_TIMEOUT_SECS", "3");
        env::set_var("FLEET_OFFLINE_TOKEN", "dev-token");
        env::set_var("FLEET_SESSION_TTL_SECS", "900");
        let config = Config::from_env().unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(900));
        assert_eq!(config.github_api_url, "http://localhost:9000");
        assert_eq!(config.github_timeout, Duration::from_secs(3));
        assert_eq!(config.offline_token.as_deref(), Some("dev-token"));

        env::set_var("FLEET_BIND_ADDR", "not-an-addr");
        assert!(Config::from_env().is_err());
        env::set_var("FLEET_BIND_ADDR", "127.0.0.1:8080");
        env::set_var("FLEET_LOG_FORMAT", "xml");
        assert!(Config::from_env().is_err());
        env::remove_var("FLEET_LOG_FORMAT");
        env::set_var("FLEET_SESSION_TTL_SECS", "0");
        assert!(Config::from_env().is_err());
        env::set_var("FLEET_SESSION_TTL_SECS", "soon");
        assert!(Config::from_env().is_err());

        for var in VARS {
            env::remove_var(var);
        }
    }
}
