//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! defaults, a `.env` file and environment variables.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Graph API endpoint settings.
    pub graph: GraphConfig,

    /// Graph API credentials.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Facebook Graph API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Graph host, without the version segment.
    pub base_url: String,

    /// API version segment, e.g. `v24.0`.
    pub api_version: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Rows requested per page.
    pub page_limit: u32,
}

/// Credentials for the Graph API.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Marketing API access token.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Kept separate so logging can be set up before the rest of the
    /// configuration is loaded.
    pub fn from_env() -> Self {
        let mut logging = Self::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        if let Ok(flag) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = !matches!(flag.to_lowercase().as_str(), "false" | "0" | "no");
        }
        logging
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com".to_string(),
            api_version: "v24.0".to_string(),
            timeout_secs: 30,
            page_limit: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "facebook-ads-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            graph: GraphConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_GRAPH_API_VERSION`, ...). The access token is
    /// read from `MCP_FACEBOOK_ACCESS_TOKEN`, falling back to
    /// `FACEBOOK_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("MCP_GRAPH_BASE_URL") {
            config.graph.base_url = base_url;
        }

        if let Ok(version) = std::env::var("MCP_GRAPH_API_VERSION") {
            config.graph.api_version = version;
        }

        if let Ok(timeout) = std::env::var("MCP_GRAPH_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) if secs > 0 => config.graph.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_GRAPH_TIMEOUT_SECS={:?}, using {}s",
                    timeout, config.graph.timeout_secs
                ),
            }
        }

        if let Ok(limit) = std::env::var("MCP_GRAPH_PAGE_LIMIT") {
            match limit.parse() {
                Ok(n) if n > 0 => config.graph.page_limit = n,
                _ => warn!(
                    "Ignoring invalid MCP_GRAPH_PAGE_LIMIT={:?}, using {}",
                    limit, config.graph.page_limit
                ),
            }
        }

        config.credentials.access_token = ["MCP_FACEBOOK_ACCESS_TOKEN", "FACEBOOK_ACCESS_TOKEN"]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|token| !token.trim().is_empty());

        if config.credentials.access_token.is_some() {
            info!("Facebook access token loaded from environment");
        } else {
            warn!("No Facebook access token found in MCP_FACEBOOK_ACCESS_TOKEN or FACEBOOK_ACCESS_TOKEN");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_token_vars() {
        unsafe {
            std::env::remove_var("MCP_FACEBOOK_ACCESS_TOKEN");
            std::env::remove_var("FACEBOOK_ACCESS_TOKEN");
        }
    }

    #[test]
    fn test_token_from_prefixed_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_token_vars();
        unsafe {
            std::env::set_var("MCP_FACEBOOK_ACCESS_TOKEN", "prefixed_token");
            std::env::set_var("FACEBOOK_ACCESS_TOKEN", "plain_token");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.access_token.as_deref(),
            Some("prefixed_token")
        );
        clear_token_vars();
    }

    #[test]
    fn test_token_fallback_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_token_vars();
        unsafe {
            std::env::set_var("FACEBOOK_ACCESS_TOKEN", "plain_token");
        }
        let config = Config::from_env();
        assert_eq!(config.credentials.access_token.as_deref(), Some("plain_token"));
        clear_token_vars();
    }

    #[test]
    fn test_blank_prefixed_token_falls_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_token_vars();
        unsafe {
            std::env::set_var("MCP_FACEBOOK_ACCESS_TOKEN", "   ");
            std::env::set_var("FACEBOOK_ACCESS_TOKEN", "plain_token");
        }
        let config = Config::from_env();
        assert_eq!(config.credentials.access_token.as_deref(), Some("plain_token"));
        clear_token_vars();
    }

    #[test]
    fn test_graph_overrides_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_GRAPH_API_VERSION", "v23.0");
            std::env::set_var("MCP_GRAPH_TIMEOUT_SECS", "5");
            std::env::set_var("MCP_GRAPH_PAGE_LIMIT", "nope");
        }
        let config = Config::from_env();
        assert_eq!(config.graph.api_version, "v23.0");
        assert_eq!(config.graph.timeout_secs, 5);
        assert_eq!(config.graph.page_limit, 100);
        unsafe {
            std::env::remove_var("MCP_GRAPH_API_VERSION");
            std::env::remove_var("MCP_GRAPH_TIMEOUT_SECS");
            std::env::remove_var("MCP_GRAPH_PAGE_LIMIT");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            access_token: Some("super_secret_token".to_string()),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
    }

    #[test]
    fn test_credentials_never_serialized() {
        let mut config = Config::default();
        config.credentials.access_token = Some("super_secret_token".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super_secret_token"));
    }

    #[test]
    fn test_graph_defaults() {
        let config = Config::default();
        assert_eq!(config.graph.api_version, "v24.0");
        assert_eq!(config.graph.timeout_secs, 30);
        assert!(config.credentials.access_token.is_none());
    }
}
