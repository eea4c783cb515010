use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use thiserror::Error;

/// Errors produced by roles and transport adapters
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A role operation the deployment never wired up
    #[error("{0} not implemented")]
    NotImplemented(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data fetch failed: {0}")]
    Fetch(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Output failed: {0}")]
    Output(String),

    #[error("Connection closed before a message was received")]
    ConnectionClosed,

    #[error("Failed to bind {transport} listener on {addr}: {source}")]
    Bind {
        transport: &'static str,
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, PipelineError::NotImplemented(_))
    }

    /// True when the peer went away or the byte stream broke, so there is
    /// nobody left to receive an error message.
    pub fn is_connection_fault(&self) -> bool {
        matches!(
            self,
            PipelineError::ConnectionClosed | PipelineError::Io(_) | PipelineError::WebSocket(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            PipelineError::InvalidInput(_) | PipelineError::ConnectionClosed => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// One step of the per-request state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Translate,
    Fetch,
    Deliver,
    Render,
    Send,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Translate => "translate",
            Stage::Fetch => "fetch",
            Stage::Deliver => "deliver",
            Stage::Render => "render",
            Stage::Send => "send",
        };
        f.write_str(name)
    }
}

/// A pipeline error tagged with the stage that produced it
#[derive(Error, Debug)]
#[error("{stage} failed: {error}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
}

impl StageError {
    pub fn new(stage: Stage, error: PipelineError) -> Self {
        Self { stage, error }
    }

    /// Closure for `map_err` at a given stage
    pub fn at(stage: Stage) -> impl FnOnce(PipelineError) -> StageError {
        move |error| StageError::new(stage, error)
    }

    /// Text sent to TCP, WebSocket and gRPC peers in place of a payload
    pub fn client_message(&self) -> String {
        format!("error: {self}")
    }
}

impl IntoResponse for StageError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        (status, format!("{self}\n")).into_response()
    }
}
