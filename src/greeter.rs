//! Demo business logic: a greeting service over every transport
//!
//! These roles are ordinary users of the [`roles`](crate::roles) contracts and
//! back the `d3` binary. `GreeterData` answers `Hello, <name>!` and
//! `GreeterDelivery` prefixes the result with `Processed Data: `.

use async_trait::async_trait;
use axum::extract::ws::Message;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{PipelineError, PipelineResult};
use crate::params::Params;
use crate::payload::Payload;
use crate::roles::{Data, Delivery, Display, Input, Output};
use crate::transport::tcp::DEFAULT_READ_BUFFER;
use crate::transport::{Connection, HttpRequest, JsonRpcRequest, WebSocket};

#[derive(Debug, Clone, Copy)]
pub struct GreeterInput {
    read_buffer: usize,
}

impl GreeterInput {
    pub fn new(read_buffer: usize) -> Self {
        Self { read_buffer }
    }
}

impl Default for GreeterInput {
    fn default() -> Self {
        Self::new(DEFAULT_READ_BUFFER)
    }
}

#[async_trait]
impl Input for GreeterInput {
    async fn translate_http(&self, request: HttpRequest) -> PipelineResult<Params> {
        let query = request.uri().query().unwrap_or("");
        let name = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "name")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        Ok(Params::single("name", name))
    }

    async fn translate_json_rpc(&self, request: &JsonRpcRequest) -> PipelineResult<Params> {
        match &request.params {
            None | Some(Value::Null) => Ok(Params::new()),
            Some(Value::Object(map)) => Ok(map
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), value)
                })
                .collect()),
            Some(_) => Err(PipelineError::InvalidInput(
                "params must be an object".to_string(),
            )),
        }
    }

    async fn translate_tcp(&self, conn: &mut dyn Connection) -> PipelineResult<Params> {
        let mut buffer = vec![0u8; self.read_buffer];
        let n = conn.read(&mut buffer).await?;
        if n == 0 {
            return Err(PipelineError::ConnectionClosed);
        }
        let message = String::from_utf8_lossy(&buffer[..n]).into_owned();
        Ok(Params::single("message", message))
    }

    async fn translate_websocket(&self, socket: &mut WebSocket) -> PipelineResult<Params> {
        loop {
            let message = match socket.recv().await {
                Some(message) => message?,
                None => return Err(PipelineError::ConnectionClosed),
            };

            match message {
                Message::Text(text) => return Ok(Params::single("message", text.as_str())),
                Message::Binary(bytes) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return Ok(Params::single("message", text));
                }
                Message::Close(_) => return Err(PipelineError::ConnectionClosed),
                // Control frames are answered by the library
                Message::Ping(_) | Message::Pong(_) => continue,
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GreeterData;

#[async_trait]
impl Data for GreeterData {
    async fn fetch(&self, params: Params) -> PipelineResult<Payload> {
        let name = params.get_non_empty("name", "World");
        Ok(Payload::Text(format!("Hello, {name}!")))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GreeterDelivery;

#[async_trait]
impl Delivery for GreeterDelivery {
    async fn process(&self, payload: Payload) -> PipelineResult<Payload> {
        Ok(Payload::Text(format!("Processed Data: {payload}")))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GreeterOutput;

#[async_trait]
impl Output for GreeterOutput {
    async fn send_http(&self, payload: Payload) -> PipelineResult<Response> {
        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("{payload}\n"),
        )
            .into_response())
    }

    async fn render_json_rpc(&self, payload: Payload) -> PipelineResult<Value> {
        Ok(payload.to_json())
    }

    async fn send_tcp(&self, conn: &mut dyn Connection, payload: Payload) -> PipelineResult<()> {
        conn.write_all(&payload.to_bytes()).await?;
        conn.flush().await?;
        Ok(())
    }

    async fn send_websocket(&self, socket: &mut WebSocket, payload: Payload) -> PipelineResult<()> {
        let message = match payload {
            Payload::Binary(bytes) => Message::Binary(bytes.into()),
            other => Message::Text(other.to_string().into()),
        };
        socket.send(message).await?;
        Ok(())
    }
}

/// Renders the greeting as a small HTML page
#[derive(Debug, Default, Clone, Copy)]
pub struct GreeterDisplay;

#[async_trait]
impl Display for GreeterDisplay {
    async fn render(&self, payload: Payload) -> PipelineResult<Payload> {
        let body = escape_html(&payload.to_string());
        Ok(Payload::Text(format!(
            "<!DOCTYPE html>\n<html><body><h1>{body}</h1></body></html>\n"
        )))
    }

    async fn display(&self, view: Payload) -> PipelineResult<Response> {
        Ok(Html(view.to_string()).into_response())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
