//! Fedrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Database
//! - Runtime specifics
//!
//! All types here represent the task lifecycle domain shared by runners and
//! the coordination server.

pub mod error;
pub mod ids;
pub mod result;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::{PromptId, TaskId};
pub use result::TaskResult;
pub use status::{TaskStatus, TaskType};
pub use task::{EnvironmentConfig, ResourceConfig, Task, TaskConfig};
