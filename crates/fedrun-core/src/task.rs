//! Task types and validation.

use crate::{CoreError, TaskId, TaskStatus, TaskType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A Task represents a unit of remote work handed to a runner.
///
/// All state of record lives on the coordination server; runners observe a
/// task through the lifecycle protocol and never mutate it locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Human-readable title.
    #[serde(default)]
    pub title: String,

    /// Longer description of the work.
    #[serde(default)]
    pub description: String,

    /// Kind of work; determines which config fields are required.
    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Current lifecycle status.
    #[serde(default)]
    pub status: TaskStatus,

    /// Opaque structured configuration, validated against `task_type`
    /// through [`TaskConfig`] but not interpreted further here.
    #[serde(default)]
    pub config: serde_json::Value,

    /// Execution environment descriptor. Mandatory (and of kind "docker")
    /// for docker tasks.
    #[serde(default)]
    pub environment: Option<EnvironmentConfig>,

    /// Reward offered for completing the task.
    #[serde(default)]
    pub reward: f64,

    /// Address of the task creator.
    #[serde(default)]
    pub creator_address: String,

    /// Device identity of the task creator.
    #[serde(default)]
    pub creator_device_id: String,

    /// Runner assigned to the task, once claimed.
    #[serde(default)]
    pub runner_id: String,

    /// Anti-replay token attached by the creator.
    #[serde(default)]
    pub nonce: String,

    /// When the task was created.
    pub created_at: DateTime<Utc>,

    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,

    /// When the task reached a terminal status. Set exactly once,
    /// server-side, on the terminal transition.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a fresh pending task draft with a new identifier and current
    /// timestamps. All other fields are left at their defaults for the
    /// caller to fill in.
    pub fn new(task_type: TaskType) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::generate(),
            title: String::new(),
            description: String::new(),
            task_type,
            status: TaskStatus::Pending,
            config: serde_json::Value::Null,
            environment: None,
            reward: 0.0,
            creator_address: String::new(),
            creator_device_id: String::new(),
            runner_id: String::new(),
            nonce: String::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder method to set the config blob.
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }

    /// Builder method to set the environment descriptor.
    pub fn with_environment(mut self, environment: EnvironmentConfig) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Decode the opaque config blob into its typed view.
    pub fn task_config(&self) -> Result<TaskConfig, CoreError> {
        Ok(serde_json::from_value(self.config.clone())?)
    }

    /// Validate structural requirements before the task is used.
    ///
    /// Checks run in a fixed order and the first failure short-circuits the
    /// rest, so callers must not assume partial validation results.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.is_empty() {
            return Err(CoreError::MissingTitle);
        }

        let config = self.task_config()?;
        config.validate(self.task_type)?;

        if self.task_type == TaskType::Docker {
            let has_docker_env = self
                .environment
                .as_ref()
                .is_some_and(|env| env.kind == "docker");
            if !has_docker_env {
                return Err(CoreError::MissingDockerEnvironment);
            }
        }

        Ok(())
    }
}

/// Decoded view of [`Task::config`], carrying type-specific requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Source file to fetch before execution.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_url: String,

    /// Environment variables for the task process.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Requested resource limits.
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Registry URL for the container image.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docker_image_url: String,

    /// Container image name. Mandatory for docker tasks.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_name: String,
}

impl TaskConfig {
    /// Check the type-specific requirements for `task_type`.
    ///
    /// Docker tasks must name an image; command, llm, and
    /// federated-learning tasks have no required config fields.
    pub fn validate(&self, task_type: TaskType) -> Result<(), CoreError> {
        match task_type {
            TaskType::Docker => {
                if self.image_name.is_empty() {
                    return Err(CoreError::MissingImageName);
                }
            }
            TaskType::Command | TaskType::Llm | TaskType::FederatedLearning => {}
            TaskType::Unknown => return Err(CoreError::UnsupportedTaskType),
        }
        Ok(())
    }
}

/// Resource limits requested for a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Memory limit, e.g. "512m".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory: String,

    /// Relative CPU weight.
    #[serde(default)]
    pub cpu_shares: i64,

    /// Execution timeout, e.g. "300s".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timeout: String,
}

/// Execution environment descriptor attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment kind, e.g. "docker".
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific settings, opaque to the task model.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub config: HashMap<String, serde_json::Value>,
}

impl EnvironmentConfig {
    /// Create a descriptor of the given kind with no settings.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docker_task() -> Task {
        Task::new(TaskType::Docker)
            .with_title("render frames")
            .with_config(json!({ "image_name": "renderer:latest" }))
            .with_environment(EnvironmentConfig::new("docker"))
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new(TaskType::Command);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, task.updated_at);
        assert!(task.completed_at.is_none());
        assert!(task.title.is_empty());
    }

    #[test]
    fn test_docker_config_requires_image_name() {
        let config = TaskConfig::default();
        assert!(matches!(
            config.validate(TaskType::Docker),
            Err(CoreError::MissingImageName)
        ));

        let config = TaskConfig {
            image_name: "alpine:3.20".to_string(),
            ..Default::default()
        };
        assert!(config.validate(TaskType::Docker).is_ok());
    }

    #[test]
    fn test_non_docker_types_need_no_config_fields() {
        let config = TaskConfig::default();
        assert!(config.validate(TaskType::Command).is_ok());
        assert!(config.validate(TaskType::Llm).is_ok());
        assert!(config.validate(TaskType::FederatedLearning).is_ok());
    }

    #[test]
    fn test_unknown_type_fails_config_validation() {
        let config = TaskConfig {
            image_name: "alpine:3.20".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(TaskType::Unknown),
            Err(CoreError::UnsupportedTaskType)
        ));
    }

    #[test]
    fn test_validate_requires_title() {
        let task = docker_task().with_title("");
        assert!(matches!(task.validate(), Err(CoreError::MissingTitle)));
    }

    #[test]
    fn test_title_checked_before_config() {
        // Malformed config must not be reached when the title is missing.
        let task = Task::new(TaskType::Command).with_config(json!("not an object"));
        assert!(matches!(task.validate(), Err(CoreError::MissingTitle)));
    }

    #[test]
    fn test_validate_rejects_malformed_config() {
        let task = Task::new(TaskType::Command)
            .with_title("run")
            .with_config(json!([1, 2, 3]));
        assert!(matches!(task.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_docker_requires_docker_environment() {
        let mut task = docker_task();
        task.environment = None;
        assert!(matches!(
            task.validate(),
            Err(CoreError::MissingDockerEnvironment)
        ));

        // An environment of the wrong kind is as bad as none at all,
        // even with a valid image name.
        let task = docker_task().with_environment(EnvironmentConfig::new("vm"));
        assert!(matches!(
            task.validate(),
            Err(CoreError::MissingDockerEnvironment)
        ));
    }

    #[test]
    fn test_valid_docker_task_passes() {
        assert!(docker_task().validate().is_ok());
    }

    #[test]
    fn test_valid_command_task_passes() {
        let task = Task::new(TaskType::Command)
            .with_title("echo hello")
            .with_config(json!({ "env": { "LANG": "C" } }));
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_task_decodes_with_unknown_type() {
        let raw = json!({
            "id": "4be0643f-1d98-573b-97cd-ca98a65347dd",
            "title": "mystery",
            "type": "quantum_annealing",
            "status": "pending",
            "config": {},
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-01T00:00:00Z"
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.task_type, TaskType::Unknown);
        assert!(matches!(
            task.validate(),
            Err(CoreError::UnsupportedTaskType)
        ));
    }
}
