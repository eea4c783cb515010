use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod loader;


pub use loader::ConfigLoader;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TCP_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_WS_ADDR: &str = "0.0.0.0:8082";
pub const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:8083";
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub http: HttpConfig,
    pub tcp: TcpConfig,
    pub websocket: WebSocketConfig,
    pub grpc: GrpcConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub addr: String,
    pub path: String,
    pub json_rpc_path: Option<String>,
    pub display_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    pub enabled: bool,
    pub addr: String,
    pub read_buffer: usize,
    /// `0` means no cap
    pub max_connections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    pub enabled: bool,
    pub addr: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    pub enabled: bool,
    pub addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: DEFAULT_HTTP_ADDR.to_string(),
            path: "/".to_string(),
            json_rpc_path: Some("/rpc".to_string()),
            display_path: None,
        }
    }
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: DEFAULT_TCP_ADDR.to_string(),
            read_buffer: crate::transport::tcp::DEFAULT_READ_BUFFER,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: DEFAULT_WS_ADDR.to_string(),
            path: "/ws".to_string(),
        }
    }
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: DEFAULT_GRPC_ADDR.to_string(),
        }
    }
}

impl HttpConfig {
    /// Every route path mounted on the HTTP listener
    pub fn paths(&self) -> Vec<&str> {
        let mut paths = vec![self.path.as_str()];
        paths.extend(self.json_rpc_path.as_deref());
        paths.extend(self.display_path.as_deref());
        paths
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_env_vars(&mut self) {
        if let Ok(addr) = std::env::var("D3_HTTP_ADDR") {
            self.http.addr = addr;
        }

        if let Ok(addr) = std::env::var("D3_TCP_ADDR") {
            self.tcp.addr = addr;
        }

        if let Ok(addr) = std::env::var("D3_WS_ADDR") {
            self.websocket.addr = addr;
        }

        if let Ok(addr) = std::env::var("D3_GRPC_ADDR") {
            self.grpc.addr = addr;
        }

        if let Ok(log_level) = std::env::var("D3_LOG_LEVEL") {
            self.log_level = Some(log_level);
        }

        if let Ok(max) = std::env::var("D3_TCP_MAX_CONNECTIONS") {
            if let Ok(value) = max.parse::<usize>() {
                self.tcp.max_connections = value;
            }
        }
    }

    pub fn get_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// True when HTTP and WebSocket routes share one listener
    pub fn shares_http_listener(&self) -> bool {
        self.http.enabled && self.websocket.enabled && self.http.addr == self.websocket.addr
    }

    pub fn validate(&self) -> Result<()> {
        if self.tcp.read_buffer == 0 {
            return Err(anyhow!("tcp.read_buffer must be greater than zero"));
        }

        let http_paths = if self.http.enabled {
            self.http.paths()
        } else {
            Vec::new()
        };
        let ws_paths = if self.websocket.enabled {
            vec![self.websocket.path.as_str()]
        } else {
            Vec::new()
        };

        for path in http_paths.iter().chain(ws_paths.iter()) {
            if !path.starts_with('/') {
                return Err(anyhow!("Route path must start with '/': {path}"));
            }
            check_literal(path)?;
        }

        if self.shares_http_listener() {
            check_unique(&[http_paths, ws_paths].concat())
        } else {
            check_unique(&http_paths)
        }
    }
}

/// Routes are matched literally. Reject the capture and wildcard syntax the
/// router would interpret or refuse at construction time.
fn check_literal(path: &str) -> Result<()> {
    if path.contains(['{', '}']) {
        return Err(anyhow!("Route path must not contain captures: {path}"));
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(anyhow!(
            "Route path segments must not start with ':' or '*': {path}"
        ));
    }
    Ok(())
}

fn check_unique(paths: &[&str]) -> Result<()> {
    let mut seen = HashSet::new();
    for path in paths {
        if !seen.insert(*path) {
            return Err(anyhow!("Route path mounted twice on one listener: {path}"));
        }
    }
    Ok(())
}
