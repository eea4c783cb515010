//! # d3-pipeline
//!
//! A request pipeline with four fixed stages, Input → Data → Delivery →
//! Output, driven by several wire transports that share one business-logic
//! implementation.
//!
//! ## Usage
//!
//! ```bash
//! d3 serve [--config d3.toml] [--http-addr 0.0.0.0:8080] [--tcp-addr 0.0.0.0:8081]
//! ```
//!
//! ## Modules
//!
//! - `params` - Flat string parameter set produced by the Input stage
//! - `payload` - Opaque result value carried from Data to Output
//! - `roles` - Input/Data/Delivery/Output/Display contracts with "not implemented" defaults
//! - `framework` - Pipeline coordinator holding one instance of each role
//! - `transport` - HTTP, JSON-RPC, TCP and WebSocket adapters plus the gRPC stream contract
//! - `config` - TOML and environment configuration for the listeners
//! - `server` - Runtime that starts every enabled transport concurrently
//! - `greeter` - Demo roles answering `Hello, <name>!`
pub mod config;
pub mod error;
pub mod framework;
pub mod greeter;
pub mod params;
pub mod payload;
pub mod roles;
pub mod server;
pub mod transport;

pub use error::{PipelineError, PipelineResult, Stage, StageError};
pub use framework::{Framework, FrameworkBuilder};
pub use params::Params;
pub use payload::Payload;
