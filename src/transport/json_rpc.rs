//! JSON-RPC 2.0 envelope types for the HTTP listener

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PipelineError, StageError};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Parse a request body, reporting failures as JSON-RPC error objects
    pub fn parse(body: &[u8]) -> Result<Self, JsonRpcError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}")))?;

        let request: JsonRpcRequest = serde_json::from_value(value)
            .map_err(|e| JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")))?;

        if request.jsonrpc != "2.0" {
            return Err(JsonRpcError::new(
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            ));
        }

        Ok(request)
    }

    pub fn id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }

    /// A request without an `id` expects no response object
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&StageError> for JsonRpcError {
    fn from(err: &StageError) -> Self {
        let code = match &err.error {
            PipelineError::NotImplemented(_) => METHOD_NOT_FOUND,
            PipelineError::InvalidInput(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        };
        JsonRpcError::new(code, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}
