//! Runtime supervisor that starts every enabled transport side by side

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::PipelineResult;
use crate::framework::Framework;
use crate::transport::{bind_listener, http, websocket, TcpServer, Transport};

pub struct Server {
    framework: Arc<Framework>,
    config: Config,
}

impl Server {
    pub fn new(framework: Arc<Framework>, config: Config) -> Self {
        Self { framework, config }
    }

    pub fn framework(&self) -> &Arc<Framework> {
        &self.framework
    }

    /// Run all enabled transports until each of them stops.
    ///
    /// The configuration is validated before any router is built. A transport
    /// that fails to bind stops alone; the others keep serving. Returns an
    /// error when the configuration is invalid or every started transport
    /// failed.
    pub async fn run(self) -> Result<()> {
        let Server { framework, config } = self;
        config.validate()?;
        let mut tasks: JoinSet<(Transport, PipelineResult<()>)> = JoinSet::new();
        let shared = config.shares_http_listener();

        if config.http.enabled {
            let mut router = http::router(Arc::clone(&framework), &config.http);
            if shared {
                info!(
                    "HTTP and WebSocket routes share listener {}",
                    config.http.addr
                );
                router = router.merge(websocket::router(
                    Arc::clone(&framework),
                    &config.websocket,
                ));
            }
            let addr = config.http.addr.clone();
            tasks.spawn(async move {
                let result = async {
                    let listener = bind_listener(Transport::Http, &addr).await?;
                    http::serve(listener, router).await
                }
                .await;
                (Transport::Http, result)
            });
        }

        if config.websocket.enabled && !shared {
            let router = websocket::router(Arc::clone(&framework), &config.websocket);
            let addr = config.websocket.addr.clone();
            tasks.spawn(async move {
                let result = async {
                    let listener = bind_listener(Transport::WebSocket, &addr).await?;
                    http::serve(listener, router).await
                }
                .await;
                (Transport::WebSocket, result)
            });
        }

        if config.tcp.enabled {
            let framework = Arc::clone(&framework);
            let tcp = config.tcp.clone();
            tasks.spawn(async move {
                let result = async {
                    TcpServer::bind(&tcp.addr, framework)
                        .await?
                        .with_max_connections(tcp.max_connections)
                        .run()
                        .await
                }
                .await;
                (Transport::Tcp, result)
            });
        }

        if config.grpc.enabled {
            warn!(
                "gRPC transport enabled on {} but no gRPC service is bound; skipping",
                config.grpc.addr
            );
        }

        let started = tasks.len();
        if started == 0 {
            return Err(anyhow!("No transports enabled"));
        }

        let mut failures = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((transport, Ok(()))) => info!("{} transport stopped", transport),
                Ok((transport, Err(e))) => {
                    error!("{} transport failed: {}", transport, e);
                    failures += 1;
                }
                Err(e) => {
                    error!("Transport task ended abnormally: {}", e);
                    failures += 1;
                }
            }
        }

        if failures == started {
            Err(anyhow!("All {started} transports failed to serve"))
        } else {
            Ok(())
        }
    }
}
