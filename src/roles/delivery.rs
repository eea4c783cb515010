use async_trait::async_trait;

use crate::error::PipelineResult;
use crate::payload::Payload;

/// Transforms the Data result before it reaches Output. Identity by default.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn process(&self, payload: Payload) -> PipelineResult<Payload> {
        Ok(payload)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BaseDelivery;

impl Delivery for BaseDelivery {}
