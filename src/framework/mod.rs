//! Pipeline coordinator
//!
//! [`Framework`] owns one instance of every role and exposes one `serve_*`
//! entry point per transport. Listening loops call these once per request,
//! connection or message. Every entry point walks the same state machine:
//!
//! ```text
//! Received -> Translated -> Fetched -> Delivered -> Sent -> Closed
//! ```
//!
//! A failing stage ends the walk. The caller gets a [`StageError`] and the
//! peer gets an error response; no later stage runs with a placeholder value.

mod builder;

#[cfg(test)]
mod tests;

pub use builder::FrameworkBuilder;

use axum::extract::ws::Message;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{Stage, StageError};
use crate::params::Params;
use crate::payload::Payload;
use crate::roles::{Data, Delivery, Display, Input, Output};
use crate::transport::json_rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::transport::{Connection, GrpcStream, HttpRequest, WebSocket};

pub struct Framework {
    input: Arc<dyn Input>,
    data: Arc<dyn Data>,
    delivery: Arc<dyn Delivery>,
    output: Arc<dyn Output>,
    display: Arc<dyn Display>,
}

impl Framework {
    pub fn builder() -> FrameworkBuilder {
        FrameworkBuilder::new()
    }

    /// Run the transport-independent middle of the pipeline: Data then Delivery
    pub async fn process(&self, params: Params) -> Result<Payload, StageError> {
        debug!(params = params.len(), "fetching data");
        let data = self
            .data
            .fetch(params)
            .await
            .map_err(StageError::at(Stage::Fetch))?;

        debug!("delivering data");
        self.delivery
            .process(data)
            .await
            .map_err(StageError::at(Stage::Deliver))
    }

    /// Serve one HTTP request. Stage failures become an error response with a
    /// status derived from the failure.
    pub async fn serve_http(&self, request: HttpRequest) -> Response {
        match self.run_http(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(stage = %err.stage, "HTTP request failed: {}", err.error);
                err.into_response()
            }
        }
    }

    async fn run_http(&self, request: HttpRequest) -> Result<Response, StageError> {
        let params = self
            .input
            .translate_http(request)
            .await
            .map_err(StageError::at(Stage::Translate))?;
        let payload = self.process(params).await?;
        self.output
            .send_http(payload)
            .await
            .map_err(StageError::at(Stage::Send))
    }

    /// Serve one HTTP request through the Display role instead of Output
    pub async fn serve_display(&self, request: HttpRequest) -> Response {
        match self.run_display(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(stage = %err.stage, "Display request failed: {}", err.error);
                err.into_response()
            }
        }
    }

    async fn run_display(&self, request: HttpRequest) -> Result<Response, StageError> {
        let params = self
            .input
            .translate_http(request)
            .await
            .map_err(StageError::at(Stage::Translate))?;
        let payload = self.process(params).await?;
        let view = self
            .display
            .render(payload)
            .await
            .map_err(StageError::at(Stage::Render))?;
        self.display
            .display(view)
            .await
            .map_err(StageError::at(Stage::Send))
    }

    /// Serve one parsed JSON-RPC request
    pub async fn serve_json_rpc(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id();
        match self.run_json_rpc(&request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                warn!(stage = %err.stage, method = %request.method, "JSON-RPC request failed: {}", err.error);
                JsonRpcResponse::failure(id, JsonRpcError::from(&err))
            }
        }
    }

    async fn run_json_rpc(&self, request: &JsonRpcRequest) -> Result<serde_json::Value, StageError> {
        let params = self
            .input
            .translate_json_rpc(request)
            .await
            .map_err(StageError::at(Stage::Translate))?;
        let payload = self.process(params).await?;
        self.output
            .render_json_rpc(payload)
            .await
            .map_err(StageError::at(Stage::Send))
    }

    /// Serve one TCP connection: one read, one pipeline pass, one write.
    ///
    /// Closing the connection is left to the caller, which owns it.
    pub async fn serve_tcp(&self, conn: &mut dyn Connection) -> Result<(), StageError> {
        let result = self.run_tcp(conn).await;

        if let Err(err) = &result {
            if !err.error.is_connection_fault() {
                let message = err.client_message();
                if let Err(e) = write_error(conn, message.as_bytes()).await {
                    debug!("Failed to report TCP error to peer: {}", e);
                }
            }
        }

        result
    }

    async fn run_tcp(&self, conn: &mut dyn Connection) -> Result<(), StageError> {
        let params = self
            .input
            .translate_tcp(conn)
            .await
            .map_err(StageError::at(Stage::Translate))?;
        let payload = self.process(params).await?;
        self.output
            .send_tcp(conn, payload)
            .await
            .map_err(StageError::at(Stage::Send))
    }

    /// Serve one WebSocket exchange: one message in, one message out
    pub async fn serve_websocket(&self, socket: &mut WebSocket) -> Result<(), StageError> {
        let result = self.run_websocket(socket).await;

        if let Err(err) = &result {
            if !err.error.is_connection_fault() {
                let message = Message::Text(err.client_message().into());
                if let Err(e) = socket.send(message).await {
                    debug!("Failed to report WebSocket error to peer: {}", e);
                }
            }
        }

        result
    }

    async fn run_websocket(&self, socket: &mut WebSocket) -> Result<(), StageError> {
        let params = self
            .input
            .translate_websocket(socket)
            .await
            .map_err(StageError::at(Stage::Translate))?;
        let payload = self.process(params).await?;
        self.output
            .send_websocket(socket, payload)
            .await
            .map_err(StageError::at(Stage::Send))
    }

    /// Serve one gRPC stream exchange
    pub async fn serve_grpc(&self, stream: &mut dyn GrpcStream) -> Result<(), StageError> {
        let result = self.run_grpc(stream).await;

        if let Err(err) = &result {
            if !err.error.is_connection_fault() {
                let message = err.client_message().into_bytes();
                if let Err(e) = stream.send_message(message).await {
                    debug!("Failed to report gRPC error to peer: {}", e);
                }
            }
        }

        result
    }

    async fn run_grpc(&self, stream: &mut dyn GrpcStream) -> Result<(), StageError> {
        let params = self
            .input
            .translate_grpc(stream)
            .await
            .map_err(StageError::at(Stage::Translate))?;
        let payload = self.process(params).await?;
        self.output
            .send_grpc(stream, payload)
            .await
            .map_err(StageError::at(Stage::Send))
    }
}

async fn write_error(conn: &mut dyn Connection, message: &[u8]) -> std::io::Result<()> {
    conn.write_all(message).await?;
    conn.flush().await
}
