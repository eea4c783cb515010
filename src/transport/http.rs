//! HTTP adapter: plain route, JSON-RPC endpoint and optional display route

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{any, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::json_rpc::{JsonRpcRequest, JsonRpcResponse};
use crate::config::HttpConfig;
use crate::error::PipelineResult;
use crate::framework::Framework;

/// Build the router for the HTTP listener. Paths come from `config`, which is
/// expected to have passed [`Config::validate`](crate::config::Config::validate).
pub fn router(framework: Arc<Framework>, config: &HttpConfig) -> Router {
    let mut router = Router::new().route(&config.path, any(handle_http));

    if let Some(path) = &config.json_rpc_path {
        router = router.route(path, post(handle_json_rpc));
    }
    if let Some(path) = &config.display_path {
        router = router.route(path, any(handle_display));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(framework)
}

/// Serve `router` on an already bound listener until the listener fails
pub async fn serve(listener: TcpListener, router: Router) -> PipelineResult<()> {
    let addr = listener.local_addr()?;
    info!("Starting HTTP server on {}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn handle_http(State(framework): State<Arc<Framework>>, request: Request) -> Response {
    framework.serve_http(request).await
}

async fn handle_display(State(framework): State<Arc<Framework>>, request: Request) -> Response {
    framework.serve_display(request).await
}

async fn handle_json_rpc(State(framework): State<Arc<Framework>>, body: Bytes) -> Response {
    match JsonRpcRequest::parse(&body) {
        Ok(request) if request.is_notification() => {
            framework.serve_json_rpc(request).await;
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(request) => Json(framework.serve_json_rpc(request).await).into_response(),
        Err(error) => {
            warn!("Rejected JSON-RPC request: {}", error.message);
            Json(JsonRpcResponse::failure(serde_json::Value::Null, error)).into_response()
        }
    }
}
