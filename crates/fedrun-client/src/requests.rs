//! Wire payloads for telemetry and model update submissions.
//!
//! Field names are pinned with serde renames where they differ from the
//! Rust names; the server matches on them exactly.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// LLM completion telemetry for a prompt served by this runner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptCompletion {
    /// Generated completion text.
    pub response: String,

    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,

    /// Tokens produced in the response.
    pub response_tokens: u32,

    /// Wall-clock inference time in milliseconds.
    pub inference_time_ms: i64,
}

/// One round's federated-learning update from this runner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelUpdate {
    /// Training session this update belongs to.
    pub session_id: String,

    /// Round within the session.
    pub round_id: String,

    /// Runner submitting the update.
    pub runner_id: String,

    /// Per-parameter gradients, keyed by parameter name.
    pub gradients: HashMap<String, Vec<f64>>,

    /// Per-parameter weights, keyed by parameter name.
    pub weights: HashMap<String, Vec<f64>>,

    /// Number of local samples the round trained on.
    pub data_size: u64,

    /// Local training loss.
    pub loss: f64,

    /// Local training accuracy.
    pub accuracy: f64,

    /// Wall-clock training time in milliseconds.
    #[serde(rename = "training_time")]
    pub training_time_ms: u64,
}

/// Outgoing wire shape for a model update submission: the update itself
/// plus the fields the server expects the client to stamp on.
#[derive(Debug, Serialize)]
pub(crate) struct ModelUpdateEnvelope<'a> {
    #[serde(flatten)]
    pub update: &'a ModelUpdate,
    pub update_type: &'static str,
    pub metadata: ModelUpdateMetadata,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModelUpdateMetadata {
    /// Unix timestamp of the submission.
    pub submission_time: i64,
}

impl<'a> ModelUpdateEnvelope<'a> {
    pub fn new(update: &'a ModelUpdate) -> Self {
        Self {
            update,
            update_type: "gradients",
            metadata: ModelUpdateMetadata {
                submission_time: Utc::now().timestamp(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_completion_field_names() {
        let payload = PromptCompletion {
            response: "42".to_string(),
            prompt_tokens: 7,
            response_tokens: 1,
            inference_time_ms: 350,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "response": "42",
                "prompt_tokens": 7,
                "response_tokens": 1,
                "inference_time_ms": 350
            })
        );
    }

    #[test]
    fn test_model_update_envelope_shape() {
        let update = ModelUpdate {
            session_id: "s1".to_string(),
            round_id: "r3".to_string(),
            runner_id: "runner-a".to_string(),
            gradients: HashMap::from([("layer0".to_string(), vec![0.1, -0.2])]),
            training_time_ms: 1200,
            ..Default::default()
        };
        let value = serde_json::to_value(ModelUpdateEnvelope::new(&update)).unwrap();

        assert_eq!(value["session_id"], "s1");
        assert_eq!(value["round_id"], "r3");
        assert_eq!(value["update_type"], "gradients");
        assert_eq!(value["training_time"], 1200);
        assert_eq!(value["gradients"]["layer0"], json!([0.1, -0.2]));
        assert!(value["metadata"]["submission_time"].is_i64());
    }
}
