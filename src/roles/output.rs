//! Output role: [`Payload`] to transport-native response

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};
use crate::payload::Payload;
use crate::transport::{Connection, GrpcStream, WebSocket};

/// Writes the final payload back through the transport that received the
/// request. HTTP and JSON-RPC produce a value the listener sends; the stream
/// transports write directly into the handle they are given.
#[async_trait]
pub trait Output: Send + Sync {
    async fn send_http(&self, _payload: Payload) -> PipelineResult<Response> {
        Err(PipelineError::NotImplemented("HTTP response handling"))
    }

    /// Value placed in the `result` member of the JSON-RPC response
    async fn render_json_rpc(&self, _payload: Payload) -> PipelineResult<Value> {
        Err(PipelineError::NotImplemented("JSON-RPC response handling"))
    }

    async fn send_tcp(&self, _conn: &mut dyn Connection, _payload: Payload) -> PipelineResult<()> {
        Err(PipelineError::NotImplemented("TCP response handling"))
    }

    async fn send_websocket(&self, _socket: &mut WebSocket, _payload: Payload) -> PipelineResult<()> {
        Err(PipelineError::NotImplemented("WebSocket response handling"))
    }

    async fn send_grpc(&self, _stream: &mut dyn GrpcStream, _payload: Payload) -> PipelineResult<()> {
        Err(PipelineError::NotImplemented("gRPC response handling"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BaseOutput;

impl Output for BaseOutput {}
