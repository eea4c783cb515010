//! Input role: transport-native request to [`Params`]

use async_trait::async_trait;

use crate::error::{PipelineError, PipelineResult};
use crate::params::Params;
use crate::transport::{Connection, GrpcStream, HttpRequest, JsonRpcRequest, WebSocket};

/// Translates one logical unit of transport input into a parameter set.
///
/// Every method has a default that fails with
/// [`PipelineError::NotImplemented`], so an implementation only overrides the
/// transports it actually serves.
#[async_trait]
pub trait Input: Send + Sync {
    async fn translate_http(&self, _request: HttpRequest) -> PipelineResult<Params> {
        Err(PipelineError::NotImplemented("HTTP input handling"))
    }

    async fn translate_json_rpc(&self, _request: &JsonRpcRequest) -> PipelineResult<Params> {
        Err(PipelineError::NotImplemented("JSON-RPC input handling"))
    }

    /// Must return after a single read from the connection
    async fn translate_tcp(&self, _conn: &mut dyn Connection) -> PipelineResult<Params> {
        Err(PipelineError::NotImplemented("TCP input handling"))
    }

    /// Must return after receiving a single message
    async fn translate_websocket(&self, _socket: &mut WebSocket) -> PipelineResult<Params> {
        Err(PipelineError::NotImplemented("WebSocket input handling"))
    }

    async fn translate_grpc(&self, _stream: &mut dyn GrpcStream) -> PipelineResult<Params> {
        Err(PipelineError::NotImplemented("gRPC input handling"))
    }
}

/// Input role with no transport wired up
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseInput;

impl Input for BaseInput {}
