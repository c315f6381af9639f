//! Status and type enums for Tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a Task.
///
/// Progression is monotonic: pending -> running -> completed|failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task created but not yet claimed by a runner.
    #[default]
    Pending,
    /// Task claimed and executing on a runner.
    Running,
    /// Task completed successfully.
    Completed,
    /// Task failed.
    Failed,
}

impl TaskStatus {
    /// Returns true if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a Task describes.
///
/// The `Unknown` variant absorbs wire values this client predates, so that
/// decoding a task list never fails on a single unrecognized entry; such a
/// task is rejected at validation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Run a container image.
    Docker,
    /// Run a command on the host.
    Command,
    /// Serve an LLM inference prompt.
    Llm,
    /// Participate in a federated-learning training round.
    FederatedLearning,
    /// Any task type this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl TaskType {
    /// Wire name of the task type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Command => "command",
            Self::Llm => "llm",
            Self::FederatedLearning => "federated_learning",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), json!("pending"));
        assert_eq!(serde_json::to_value(TaskStatus::Failed).unwrap(), json!("failed"));
    }

    #[test]
    fn test_task_type_wire_names() {
        assert_eq!(
            serde_json::to_value(TaskType::FederatedLearning).unwrap(),
            json!("federated_learning")
        );
        assert_eq!(serde_json::to_value(TaskType::Docker).unwrap(), json!("docker"));
    }

    #[test]
    fn test_unrecognized_task_type_decodes_as_unknown() {
        let ty: TaskType = serde_json::from_value(json!("quantum")).unwrap();
        assert_eq!(ty, TaskType::Unknown);

        let ty: TaskType = serde_json::from_value(json!("")).unwrap();
        assert_eq!(ty, TaskType::Unknown);
    }
}
