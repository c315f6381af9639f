//! Runner-side HTTP client for the Fedrun coordination server.
//!
//! Lists claimable tasks, claims one for this runner, and reports lifecycle
//! transitions, structured results, LLM completion telemetry, and
//! federated-learning model updates. Task execution itself happens outside
//! this crate and only reports back through it.

pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod requests;

pub use client::{finalize_result, TaskClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use identity::{DeviceIdentity, StaticIdentity};
pub use requests::{ModelUpdate, PromptCompletion};
