//! Client configuration.

use std::time::Duration;

/// Configuration for [`TaskClient`](crate::TaskClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Coordination server base URL. A trailing `/api` suffix is stripped
    /// once at construction; every operation appends its own `/api/v1`
    /// path.
    pub base_url: String,

    /// Timeout applied to ordinary calls.
    pub request_timeout: Duration,

    /// Timeout applied to federated-learning model update submissions,
    /// which carry much larger payloads.
    pub model_update_timeout: Duration,
}

impl ClientConfig {
    /// Configuration with default timeouts for the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(10),
            model_update_timeout: Duration::from_secs(30),
        }
    }
}
