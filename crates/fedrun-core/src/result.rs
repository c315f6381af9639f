//! Execution results reported back to the coordination server.

use crate::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A report of task execution outcome submitted by a runner.
///
/// `task_id`, `runner_address`, and `created_at` may be left unset; the
/// client fills them from the submission context before sending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task this result refers to. Defaults to the task being completed.
    #[serde(default)]
    pub task_id: Option<TaskId>,

    /// Device identity of the executing host.
    #[serde(default)]
    pub device_id: String,

    /// Address of the reporting runner. Defaults to the local device
    /// identity.
    #[serde(default)]
    pub runner_address: String,

    /// Address of the task creator, echoed back for attribution.
    #[serde(default)]
    pub creator_address: String,

    /// Captured stdout/stderr or other textual output.
    #[serde(default)]
    pub output: String,

    /// Error message if execution failed.
    #[serde(default)]
    pub error: Option<String>,

    /// Process exit code.
    #[serde(default)]
    pub exit_code: i32,

    /// Wall-clock execution time in milliseconds.
    #[serde(default)]
    pub execution_time: i64,

    /// When the result was produced. Defaults to submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskResult {
    /// Create an empty result for the caller to fill in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the captured output.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Builder method to record a failure.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Builder method to set the exit code.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }
}
