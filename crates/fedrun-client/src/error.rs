//! Error types for the task client.

use fedrun_core::TaskStatus;
use thiserror::Error;

/// Errors surfaced by [`TaskClient`](crate::TaskClient) operations.
///
/// Every failure is returned to the caller; nothing is retried or swallowed
/// inside the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Network-level failure (DNS, connect, timeout), wrapped with the
    /// attempted URL.
    #[error("HTTP request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status the protocol does not map.
    #[error("unexpected status code: {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Malformed JSON in a response body.
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    /// A request payload could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The available-task queue was empty.
    #[error("no tasks available")]
    NoTasksAvailable,

    /// Another runner claimed the task first (HTTP 409). Expected under
    /// concurrent claiming; callers should move on to another task.
    #[error("task unavailable: {0}")]
    TaskUnavailable(String),

    /// The server rejected the claim as malformed (HTTP 400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The task does not exist on the server (HTTP 404).
    #[error("task not found")]
    TaskNotFound,

    /// `update_task_status` was called with a status that has no
    /// corresponding transition.
    #[error("unsupported status: {0}")]
    UnsupportedStatus(TaskStatus),

    /// The device identity could not be resolved.
    #[error("failed to get device ID: {0}")]
    Identity(String),

    /// The server reported an error message for a submission.
    #[error("server error: {0}")]
    Server(String),

    /// A federated-learning model update was rejected.
    #[error("model update rejected: {0}")]
    ModelUpdateRejected(String),
}
