use async_trait::async_trait;
use axum::response::Response;

use crate::error::{PipelineError, PipelineResult};
use crate::payload::Payload;

/// Presentation step for view-oriented routes: compute a view, then emit it.
#[async_trait]
pub trait Display: Send + Sync {
    async fn render(&self, payload: Payload) -> PipelineResult<Payload> {
        Ok(payload)
    }

    async fn display(&self, _view: Payload) -> PipelineResult<Response> {
        Err(PipelineError::NotImplemented("Display handling"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BaseDisplay;

impl Display for BaseDisplay {}
