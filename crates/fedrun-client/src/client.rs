//! HTTP task lifecycle client.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use fedrun_core::{PromptId, Task, TaskId, TaskResult, TaskStatus};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::identity::DeviceIdentity;
use crate::requests::{ModelUpdate, ModelUpdateEnvelope, PromptCompletion};

/// Header carrying the runner's device identity on mutating requests.
const DEVICE_ID_HEADER: &str = "X-Device-ID";

/// Client for the coordination server's runner-facing HTTP API.
///
/// Holds only the normalized base URL, the transport client, and the
/// identity handle; all task state of record lives on the server, so a
/// single instance is safe to share across tasks. Calls are single
/// attempts with a bounded timeout: retry cadence belongs to the calling
/// orchestrator, not this client.
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
    model_update_timeout: Duration,
    identity: Arc<dyn DeviceIdentity>,
}

impl TaskClient {
    /// Create a new client for the configured server.
    ///
    /// The base URL is normalized once here: trailing slashes are trimmed
    /// and a trailing `/api` suffix is stripped, since every operation
    /// appends its own `/api/v1` path.
    pub fn new(
        config: ClientConfig,
        identity: Arc<dyn DeviceIdentity>,
    ) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/');
        let base_url = base_url.strip_suffix("/api").unwrap_or(base_url).to_string();

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url,
            model_update_timeout: config.model_update_timeout,
            identity,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// List the queue of claimable tasks.
    pub async fn get_available_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = self.url("/runners/tasks/available");
        debug!(url = %url, "listing available tasks");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response.json().await.map_err(ClientError::Decode)
    }

    /// Fetch and claim the next available task.
    ///
    /// Lists the queue and claims the first entry, returning it for
    /// out-of-band execution. Fails with
    /// [`ClientError::NoTasksAvailable`] on an empty queue without
    /// issuing a claim call.
    pub async fn fetch_task(&self) -> Result<Task, ClientError> {
        let tasks = self.get_available_tasks().await?;

        let Some(task) = tasks.into_iter().next() else {
            return Err(ClientError::NoTasksAvailable);
        };

        self.start_task(&task.id).await?;
        Ok(task)
    }

    /// Claim a pending task for this runner.
    ///
    /// A 409 means another runner won the claim race; that is an expected
    /// outcome under concurrent claiming, surfaced as
    /// [`ClientError::TaskUnavailable`] so callers can move on to another
    /// task.
    pub async fn start_task(&self, task_id: &TaskId) -> Result<(), ClientError> {
        let device_id = self.identity.device_id().await?;

        let url = self.url(&format!("/runners/tasks/{task_id}/start"));
        debug!(url = %url, task_id = %task_id, "claiming task");

        let response = self
            .http
            .post(&url)
            .header(DEVICE_ID_HEADER, device_id)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::OK => Ok(()),
            StatusCode::CONFLICT => Err(ClientError::TaskUnavailable(body)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            StatusCode::NOT_FOUND => Err(ClientError::TaskNotFound),
            _ => Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Mark a task terminal on the server.
    pub async fn complete_task(&self, task_id: &TaskId) -> Result<(), ClientError> {
        let url = self.url(&format!("/runners/tasks/{task_id}/complete"));
        debug!(url = %url, task_id = %task_id, "completing task");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Submit the structured result for a task.
    ///
    /// Fields the result may omit (task id, creation time, runner address)
    /// are filled by [`finalize_result`] before serialization.
    pub async fn save_task_result(
        &self,
        task_id: &TaskId,
        result: TaskResult,
    ) -> Result<(), ClientError> {
        let device_id = self.identity.device_id().await?;
        let result = finalize_result(result, task_id, &device_id, Utc::now());
        let body = serde_json::to_vec(&result)?;

        let url = self.url(&format!("/runners/tasks/{task_id}/result"));
        debug!(url = %url, task_id = %task_id, "submitting task result");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(DEVICE_ID_HEADER, device_id)
            .body(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        match submission_failure(response).await {
            None => Ok(()),
            Some(SubmissionFailure::Server(message)) => Err(ClientError::Server(message)),
            Some(SubmissionFailure::Status { status, body }) => {
                Err(ClientError::UnexpectedStatus { status, body })
            }
        }
    }

    /// Report a task's new status, dispatching to the matching lifecycle
    /// call.
    ///
    /// `Running` claims the task; `Completed`/`Failed` mark it terminal and
    /// then submit `result` when one is supplied. `Pending` has no
    /// transition and is rejected before any network call.
    ///
    /// The complete/save pair is not transactional: if the result
    /// submission fails the task stays terminal server-side with no result
    /// attached, and the error is returned so the caller can resubmit via
    /// [`save_task_result`](Self::save_task_result).
    pub async fn update_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        result: Option<TaskResult>,
    ) -> Result<(), ClientError> {
        match status {
            TaskStatus::Running => self.start_task(task_id).await,
            TaskStatus::Completed | TaskStatus::Failed => {
                self.complete_task(task_id).await?;
                if let Some(result) = result {
                    self.save_task_result(task_id, result).await?;
                }
                Ok(())
            }
            TaskStatus::Pending => Err(ClientError::UnsupportedStatus(status)),
        }
    }

    /// Report LLM completion telemetry for a prompt.
    pub async fn complete_prompt(
        &self,
        prompt_id: &PromptId,
        completion: PromptCompletion,
    ) -> Result<(), ClientError> {
        let body = serde_json::to_vec(&completion)?;

        let url = self.url(&format!("/llm/prompts/{prompt_id}/complete"));
        debug!(url = %url, prompt_id = %prompt_id, "submitting prompt completion");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        match submission_failure(response).await {
            None => Ok(()),
            Some(SubmissionFailure::Server(message)) => Err(ClientError::Server(message)),
            Some(SubmissionFailure::Status { status, body }) => {
                Err(ClientError::UnexpectedStatus { status, body })
            }
        }
    }

    /// Submit a federated-learning round update.
    ///
    /// Model updates can be orders of magnitude larger than other
    /// payloads, so this call runs under the extended
    /// `model_update_timeout`.
    pub async fn submit_model_update(&self, update: ModelUpdate) -> Result<(), ClientError> {
        let body = serde_json::to_vec(&ModelUpdateEnvelope::new(&update))?;

        let url = self.url("/federated-learning/model-updates");
        debug!(
            url = %url,
            session_id = %update.session_id,
            round_id = %update.round_id,
            "submitting model update"
        );

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.model_update_timeout)
            .body(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        match submission_failure(response).await {
            None => Ok(()),
            Some(SubmissionFailure::Server(message)) => {
                Err(ClientError::ModelUpdateRejected(message))
            }
            Some(SubmissionFailure::Status { status, body }) => {
                Err(ClientError::ModelUpdateRejected(format!(
                    "unexpected status code: {status}, body: {body}"
                )))
            }
        }
    }
}

/// Fill in the defaults a submitted result may omit: the task it refers
/// to, its creation time, and the reporting runner's address.
///
/// Pure function of the result and the submission context, so default
/// filling stays testable without a client.
pub fn finalize_result(
    mut result: TaskResult,
    task_id: &TaskId,
    device_id: &str,
    now: DateTime<Utc>,
) -> TaskResult {
    if result.task_id.is_none() {
        result.task_id = Some(*task_id);
    }
    if result.created_at.is_none() {
        result.created_at = Some(now);
    }
    if result.runner_address.is_empty() {
        result.runner_address = device_id.to_string();
    }
    result
}

/// Server `{"error": ...}` body shape.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

enum SubmissionFailure {
    /// The body parsed as `{"error": string}`; the server's message wins
    /// over a generic status line.
    Server(String),
    Status { status: u16, body: String },
}

/// Classify a submission response, consuming its body. `None` on 200.
async fn submission_failure(response: reqwest::Response) -> Option<SubmissionFailure> {
    let status = response.status();
    if status == StatusCode::OK {
        return None;
    }

    let body = response.text().await.unwrap_or_default();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        if !parsed.error.is_empty() {
            return Some(SubmissionFailure::Server(parsed.error));
        }
    }

    Some(SubmissionFailure::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;

    #[test]
    fn test_finalize_fills_missing_fields() {
        let task_id = TaskId::generate();
        let now = Utc::now();

        let result = finalize_result(TaskResult::new(), &task_id, "device-1", now);
        assert_eq!(result.task_id, Some(task_id));
        assert_eq!(result.created_at, Some(now));
        assert_eq!(result.runner_address, "device-1");
    }

    #[test]
    fn test_finalize_preserves_explicit_fields() {
        let original_task = TaskId::generate();
        let earlier = Utc::now() - chrono::Duration::minutes(5);

        let mut result = TaskResult::new().with_output("done");
        result.task_id = Some(original_task);
        result.created_at = Some(earlier);
        result.runner_address = "runner-9".to_string();

        let finalized = finalize_result(result, &TaskId::generate(), "device-1", Utc::now());
        assert_eq!(finalized.task_id, Some(original_task));
        assert_eq!(finalized.created_at, Some(earlier));
        assert_eq!(finalized.runner_address, "runner-9");
        assert_eq!(finalized.output, "done");
    }

    #[test]
    fn test_base_url_normalization() {
        for base in [
            "http://server:8080",
            "http://server:8080/",
            "http://server:8080/api",
            "http://server:8080/api/",
        ] {
            let client = TaskClient::new(
                ClientConfig::new(base),
                Arc::new(StaticIdentity::new("d")),
            )
            .unwrap();
            assert_eq!(
                client.url("/runners/tasks/available"),
                "http://server:8080/api/v1/runners/tasks/available",
                "base: {base}"
            );
        }
    }
}
