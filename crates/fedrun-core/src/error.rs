//! Core domain errors.

use thiserror::Error;

/// Validation errors for tasks and task configurations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Task has no title.
    #[error("title is required")]
    MissingTitle,

    /// Task type is not one of the supported kinds.
    #[error("unsupported task type")]
    UnsupportedTaskType,

    /// Docker tasks must name the image to run.
    #[error("image name is required for docker tasks")]
    MissingImageName,

    /// Docker tasks must carry a docker environment descriptor.
    #[error("docker environment configuration is required for docker tasks")]
    MissingDockerEnvironment,

    /// The task's config blob could not be decoded.
    #[error("invalid task config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
