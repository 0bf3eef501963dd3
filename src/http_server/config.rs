//! HTTP Server Configuration
//!
//! Configuration for the HTTP server including host, port, CORS settings and
//! the directory holding static assets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Directory served for `/favicon.ico` (default: "static")
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            static_dir: default_static_dir(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Override host and port from a `host:port` string.
    pub fn with_bind(mut self, bind: &str) -> Result<Self, String> {
        let (host, port) = bind
            .rsplit_once(':')
            .ok_or_else(|| format!("expected host:port, got '{}'", bind))?;
        self.port = port
            .parse()
            .map_err(|e| format!("invalid port '{}': {}", port, e))?;
        self.host = host.to_string();
        Ok(self)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn favicon_path(&self) -> PathBuf {
        self.static_dir.join("favicon.ico")
    }
}
