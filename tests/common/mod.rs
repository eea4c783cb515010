//! Common test utilities: listeners on ephemeral ports and reusable roles
#![allow(dead_code)]

use async_trait::async_trait;
use d3_pipeline::config::{HttpConfig, WebSocketConfig};
use d3_pipeline::greeter::{GreeterData, GreeterDelivery, GreeterInput, GreeterOutput};
use d3_pipeline::roles::Data;
use d3_pipeline::transport::{http, websocket, TcpServer};
use d3_pipeline::{Framework, Params, Payload, PipelineError, PipelineResult};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Returns the `message` parameter unchanged
pub struct EchoData;

#[async_trait]
impl Data for EchoData {
    async fn fetch(&self, params: Params) -> PipelineResult<Payload> {
        Ok(Payload::Text(params.get("message").unwrap_or("").to_string()))
    }
}

/// Always fails
pub struct FailingData;

#[async_trait]
impl Data for FailingData {
    async fn fetch(&self, _params: Params) -> PipelineResult<Payload> {
        Err(PipelineError::Fetch("backend unavailable".to_string()))
    }
}

pub fn greeter_framework() -> Arc<Framework> {
    Arc::new(
        Framework::builder()
            .input(GreeterInput::default())
            .data(GreeterData)
            .delivery(GreeterDelivery)
            .output(GreeterOutput)
            .build(),
    )
}

pub fn failing_framework() -> Arc<Framework> {
    Arc::new(
        Framework::builder()
            .input(GreeterInput::default())
            .data(FailingData)
            .delivery(GreeterDelivery)
            .output(GreeterOutput)
            .build(),
    )
}

pub fn echo_framework() -> Arc<Framework> {
    Arc::new(
        Framework::builder()
            .input(GreeterInput::default())
            .data(EchoData)
            .output(GreeterOutput)
            .build(),
    )
}

async fn ephemeral_listener() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}

/// Start the HTTP router on an ephemeral port
pub async fn spawn_http(framework: Arc<Framework>, config: HttpConfig) -> SocketAddr {
    let listener = ephemeral_listener().await;
    let addr = listener.local_addr().unwrap();
    let router = http::router(framework, &config);
    tokio::spawn(http::serve(listener, router));
    addr
}

/// Start the WebSocket router on an ephemeral port
pub async fn spawn_websocket(framework: Arc<Framework>) -> SocketAddr {
    let listener = ephemeral_listener().await;
    let addr = listener.local_addr().unwrap();
    let router = websocket::router(framework, &WebSocketConfig::default());
    tokio::spawn(http::serve(listener, router));
    addr
}

/// Start the TCP accept loop on an ephemeral port
pub async fn spawn_tcp(framework: Arc<Framework>, max_connections: usize) -> SocketAddr {
    let server = TcpServer::from_listener(ephemeral_listener().await, framework)
        .with_max_connections(max_connections);
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

/// A port that was free a moment ago, for tests that configure addresses by string
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Wait until something accepts connections on `addr`
pub async fn wait_for_listener(addr: &str) {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Nothing listening on {addr}");
}
