//! gRPC stream contract
//!
//! No gRPC service is bound by the default runtime. [`GrpcStream`] describes
//! the one-message-in, one-message-out shape a server stream offers to the
//! pipeline, so a deployment that brings its own gRPC stack can drive
//! [`Framework::serve_grpc`](crate::framework::Framework::serve_grpc).

use async_trait::async_trait;

use crate::error::PipelineResult;

#[async_trait]
pub trait GrpcStream: Send {
    /// Receive the next encoded message, or `None` once the client half-closed
    async fn recv_message(&mut self) -> PipelineResult<Option<Vec<u8>>>;

    /// Send one encoded message
    async fn send_message(&mut self, message: Vec<u8>) -> PipelineResult<()>;
}

/// In-memory stream used to exercise the gRPC contract without a gRPC stack
#[derive(Debug, Default)]
pub struct MemoryStream {
    inbound: std::collections::VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

impl MemoryStream {
    pub fn new(inbound: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            inbound: inbound.into_iter().collect(),
            sent: Vec::new(),
        }
    }

    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

#[async_trait]
impl GrpcStream for MemoryStream {
    async fn recv_message(&mut self) -> PipelineResult<Option<Vec<u8>>> {
        Ok(self.inbound.pop_front())
    }

    async fn send_message(&mut self, message: Vec<u8>) -> PipelineResult<()> {
        self.sent.push(message);
        Ok(())
    }
}
