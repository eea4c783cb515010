//! Data role: [`Params`] to [`Payload`]

use async_trait::async_trait;

use crate::error::{PipelineError, PipelineResult};
use crate::params::Params;
use crate::payload::Payload;

/// Produces the opaque result for a request.
///
/// The pipeline adds no caching. An implementation that wants memoization
/// keeps it behind its own interior state.
#[async_trait]
pub trait Data: Send + Sync {
    async fn fetch(&self, _params: Params) -> PipelineResult<Payload> {
        Err(PipelineError::NotImplemented("Data fetching"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BaseData;

impl Data for BaseData {}
