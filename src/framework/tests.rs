use super::*;
use crate::error::{PipelineError, PipelineResult};
use crate::greeter::{GreeterData, GreeterDelivery, GreeterDisplay, GreeterInput, GreeterOutput};
use crate::transport::grpc::MemoryStream;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FailingData;

#[async_trait]
impl Data for FailingData {
    async fn fetch(&self, _params: Params) -> PipelineResult<Payload> {
        Err(PipelineError::Fetch("backend unavailable".to_string()))
    }
}

#[derive(Clone, Default)]
struct CountingDelivery {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Delivery for CountingDelivery {
    async fn process(&self, payload: Payload) -> PipelineResult<Payload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(payload)
    }
}

/// Reads and writes gRPC messages as UTF-8 text
struct GrpcEcho;

#[async_trait]
impl Input for GrpcEcho {
    async fn translate_grpc(&self, stream: &mut dyn GrpcStream) -> PipelineResult<Params> {
        let message = stream
            .recv_message()
            .await?
            .ok_or(PipelineError::ConnectionClosed)?;
        Ok(Params::single("name", String::from_utf8_lossy(&message)))
    }
}

#[async_trait]
impl Output for GrpcEcho {
    async fn send_grpc(&self, stream: &mut dyn GrpcStream, payload: Payload) -> PipelineResult<()> {
        stream.send_message(payload.to_bytes()).await
    }
}

fn greeter() -> Framework {
    Framework::builder()
        .input(GreeterInput::default())
        .data(GreeterData)
        .delivery(GreeterDelivery)
        .output(GreeterOutput)
        .build()
}

fn request(uri: &str) -> HttpRequest {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_process_runs_data_then_delivery() {
    let payload = greeter()
        .process(Params::single("name", "Ada"))
        .await
        .unwrap();
    assert_eq!(payload.to_string(), "Processed Data: Hello, Ada!");
}

#[tokio::test]
async fn test_process_short_circuits_on_fetch_error() {
    let delivery = CountingDelivery::default();
    let framework = Framework::builder()
        .data(FailingData)
        .delivery(delivery.clone())
        .build();

    let err = framework.process(Params::new()).await.unwrap_err();

    assert_eq!(err.stage, Stage::Fetch);
    assert_eq!(delivery.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_serve_http_success() {
    let response = greeter().serve_http(request("/?name=Ada")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Processed Data: Hello, Ada!\n");
}

#[tokio::test]
async fn test_serve_http_fetch_error_is_not_a_success_payload() {
    let framework = Framework::builder()
        .input(GreeterInput::default())
        .data(FailingData)
        .delivery(GreeterDelivery)
        .output(GreeterOutput)
        .build();

    let response = framework.serve_http(request("/?name=Ada")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_text(response).await;
    assert!(body.contains("fetch failed"));
    assert!(body.contains("backend unavailable"));
    assert!(!body.contains("Processed Data"));
}

#[tokio::test]
async fn test_serve_http_with_base_roles_is_not_implemented() {
    let response = Framework::builder().build().serve_http(request("/")).await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        body_text(response).await,
        "translate failed: HTTP input handling not implemented\n"
    );
}

#[tokio::test]
async fn test_serve_http_missing_output_reports_send_stage() {
    let framework = Framework::builder()
        .input(GreeterInput::default())
        .data(GreeterData)
        .build();

    let response = framework.serve_http(request("/")).await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(body_text(response).await.starts_with("send failed"));
}

#[tokio::test]
async fn test_serve_tcp_single_exchange() {
    let mut conn = tokio_test::io::Builder::new()
        .read(b"hello there")
        .write(b"Processed Data: Hello, World!")
        .build();

    greeter().serve_tcp(&mut conn).await.unwrap();
}

#[tokio::test]
async fn test_serve_tcp_reports_fetch_error_to_peer() {
    let framework = Framework::builder()
        .input(GreeterInput::default())
        .data(FailingData)
        .output(GreeterOutput)
        .build();

    let mut conn = tokio_test::io::Builder::new()
        .read(b"hi")
        .write(b"error: fetch failed: Data fetch failed: backend unavailable")
        .build();

    let err = framework.serve_tcp(&mut conn).await.unwrap_err();
    assert_eq!(err.stage, Stage::Fetch);
}

#[tokio::test]
async fn test_serve_tcp_eof_writes_nothing() {
    let mut conn = tokio_test::io::Builder::new().build();

    let err = greeter().serve_tcp(&mut conn).await.unwrap_err();
    assert_eq!(err.stage, Stage::Translate);
    assert!(matches!(err.error, PipelineError::ConnectionClosed));
}

#[tokio::test]
async fn test_serve_grpc_defaults_report_not_implemented() {
    let mut stream = MemoryStream::new(vec![b"Ada".to_vec()]);

    let err = Framework::builder()
        .build()
        .serve_grpc(&mut stream)
        .await
        .unwrap_err();

    assert!(err.error.is_not_implemented());
    assert_eq!(stream.sent().len(), 1);
    assert_eq!(
        String::from_utf8_lossy(&stream.sent()[0]),
        "error: translate failed: gRPC input handling not implemented"
    );
}

#[tokio::test]
async fn test_serve_grpc_with_custom_roles() {
    let framework = Framework::builder()
        .input(GrpcEcho)
        .data(GreeterData)
        .delivery(GreeterDelivery)
        .output(GrpcEcho)
        .build();
    let mut stream = MemoryStream::new(vec![b"Ada".to_vec()]);

    framework.serve_grpc(&mut stream).await.unwrap();

    assert_eq!(stream.sent(), &[b"Processed Data: Hello, Ada!".to_vec()]);
}

#[tokio::test]
async fn test_serve_json_rpc_success_and_failure() {
    let request = JsonRpcRequest::parse(
        br#"{"jsonrpc":"2.0","method":"greet","params":{"name":"Ada"},"id":"req-1"}"#,
    )
    .unwrap();
    let response = greeter().serve_json_rpc(request.clone()).await;
    assert_eq!(response.id, json!("req-1"));
    assert_eq!(response.result, Some(json!("Processed Data: Hello, Ada!")));
    assert!(response.error.is_none());

    let response = Framework::builder().build().serve_json_rpc(request).await;
    assert!(response.result.is_none());
    let error = response.error.unwrap();
    assert_eq!(error.code, crate::transport::json_rpc::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_serve_display_without_display_role() {
    let response = greeter().serve_display(request("/view?name=Ada")).await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(body_text(response).await.contains("Display handling not implemented"));
}

#[tokio::test]
async fn test_serve_display_renders_view() {
    let framework = Framework::builder()
        .input(GreeterInput::default())
        .data(GreeterData)
        .delivery(GreeterDelivery)
        .display(GreeterDisplay)
        .build();

    let response = framework.serve_display(request("/view?name=Ada")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("<h1>Processed Data: Hello, Ada!</h1>"));
}
