//! Server configuration, fixed at startup.

use thiserror::Error;

use super::origin::OriginPolicy;

/// Default WebSocket endpoint path
pub const DEFAULT_WEBSOCKET_PATH: &str = "/watchparty";

/// Prefix reserved for the HTTP API
const API_PREFIX: &str = "/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("WebSocket path '{0}' must start with '/'")]
    PathNotAbsolute(String),

    #[error("WebSocket path '{0}' collides with the HTTP API under '{API_PREFIX}'")]
    PathReserved(String),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// The port number to bind to (e.g., 8080)
    pub port: u16,
    /// WebSocket endpoint path (e.g., "/watchparty")
    pub path: String,
    pub origin_policy: OriginPolicy,
}

impl ServerConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        path: impl Into<String>,
        origin_policy: OriginPolicy,
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(ConfigError::PathNotAbsolute(path));
        }
        if path == API_PREFIX || path.starts_with(&format!("{}/", API_PREFIX)) {
            return Err(ConfigError::PathReserved(path));
        }

        Ok(Self {
            host: host.into(),
            port,
            path,
            origin_policy,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            path: DEFAULT_WEBSOCKET_PATH.to_string(),
            origin_policy: OriginPolicy::Any,
        }
    }
}
