//! WebSocket adapter: one message in, one message out per connection

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info_span, warn, Instrument};

use crate::config::WebSocketConfig;
use crate::framework::Framework;

/// Build the router for the WebSocket upgrade route. Must be served with
/// connect info, as [`super::http::serve`] does.
pub fn router(framework: Arc<Framework>, config: &WebSocketConfig) -> Router {
    Router::new()
        .route(&config.path, get(handle_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(framework)
}

async fn handle_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(framework): State<Arc<Framework>>,
) -> Response {
    let span = info_span!("websocket_connection", %peer);
    ws.on_upgrade(move |socket| handle_socket(socket, framework).instrument(span))
}

async fn handle_socket(mut socket: WebSocket, framework: Arc<Framework>) {
    match framework.serve_websocket(&mut socket).await {
        Ok(()) => debug!("WebSocket exchange served"),
        Err(err) if err.error.is_connection_fault() => {
            debug!(stage = %err.stage, "WebSocket connection aborted: {}", err.error)
        }
        Err(err) => warn!(stage = %err.stage, "WebSocket exchange failed: {}", err.error),
    }
}
