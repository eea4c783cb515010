//! Raw TCP adapter
//!
//! Every accepted connection gets its own task that runs exactly one
//! read, pipeline pass, write and close. A failed accept is logged and the
//! loop keeps going.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, info_span, warn, Instrument};

use super::{bind_listener, Transport};
use crate::error::PipelineResult;
use crate::framework::Framework;

/// Bytes read from a connection in its single read call
pub const DEFAULT_READ_BUFFER: usize = 1024;

/// Bidirectional byte stream handed to the TCP Input and Output roles
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Connection for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub struct TcpServer {
    listener: TcpListener,
    framework: Arc<Framework>,
    limit: Option<Arc<Semaphore>>,
}

impl TcpServer {
    pub async fn bind(addr: &str, framework: Arc<Framework>) -> PipelineResult<Self> {
        let listener = bind_listener(Transport::Tcp, addr).await?;
        Ok(Self::from_listener(listener, framework))
    }

    pub fn from_listener(listener: TcpListener, framework: Arc<Framework>) -> Self {
        Self {
            listener,
            framework,
            limit: None,
        }
    }

    /// Cap the number of connections handled at once. `0` removes the cap.
    ///
    /// Once the cap is reached the accept loop stops accepting until a
    /// connection task finishes; pending clients wait in the listen backlog.
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.limit = (max_connections > 0).then(|| Arc::new(Semaphore::new(max_connections)));
        self
    }

    pub fn local_addr(&self) -> PipelineResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop. Only returns if the local address cannot be read.
    pub async fn run(self) -> PipelineResult<()> {
        let addr = self.local_addr()?;
        info!("Starting TCP server on {}", addr);

        loop {
            let permit = match &self.limit {
                Some(limit) => match Arc::clone(limit).acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return Ok(()),
                },
                None => None,
            };

            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let framework = Arc::clone(&self.framework);
                    let span = info_span!("tcp_connection", %peer);
                    tokio::spawn(handle_connection(framework, stream, permit).instrument(span));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

async fn handle_connection(
    framework: Arc<Framework>,
    mut stream: TcpStream,
    _permit: Option<OwnedSemaphorePermit>,
) {
    match framework.serve_tcp(&mut stream).await {
        Ok(()) => debug!("TCP request served"),
        Err(err) if err.error.is_connection_fault() => {
            debug!(stage = %err.stage, "TCP connection aborted: {}", err.error)
        }
        Err(err) => warn!(stage = %err.stage, "TCP request failed: {}", err.error),
    }

    if let Err(e) = stream.shutdown().await {
        debug!("Failed to close TCP connection: {}", e);
    }
}
