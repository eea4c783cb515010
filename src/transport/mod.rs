//! Transport adapters
//!
//! Each adapter owns its transport's listening loop and hands every unit of
//! work to the matching [`Framework`](crate::framework::Framework) entry point:
//!
//! - `http`: axum router for the plain HTTP route, the JSON-RPC endpoint and
//!   the optional display route
//! - `tcp`: explicit accept loop, one task per connection
//! - `websocket`: axum upgrade route, one exchange per connection
//! - `grpc`: stream contract only, no bound service

pub mod grpc;
pub mod http;
pub mod json_rpc;
pub mod tcp;
pub mod websocket;

use std::fmt;
use tokio::net::TcpListener;

use crate::error::{PipelineError, PipelineResult};

pub use axum::extract::ws::WebSocket;
pub use axum::extract::Request as HttpRequest;
pub use grpc::GrpcStream;
pub use json_rpc::{JsonRpcRequest, JsonRpcResponse};
pub use tcp::{Connection, TcpServer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Http,
    Tcp,
    WebSocket,
    Grpc,
}

impl Transport {
    pub fn name(&self) -> &'static str {
        match self {
            Transport::Http => "HTTP",
            Transport::Tcp => "TCP",
            Transport::WebSocket => "WebSocket",
            Transport::Grpc => "gRPC",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bind a listener, reporting failure as a construction error of `transport`
pub async fn bind_listener(transport: Transport, addr: &str) -> PipelineResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| PipelineError::Bind {
            transport: transport.name(),
            addr: addr.to_string(),
            source,
        })
}
