//! Device identity capability.

use async_trait::async_trait;

use crate::error::ClientError;

/// Resolves this host's verified stable identity string.
///
/// Identity generation and storage live outside this crate; the client only
/// needs the resolved value to attach as the `X-Device-ID` header on
/// mutating requests. Injected at construction so the client can be tested
/// with a fake provider.
#[async_trait]
pub trait DeviceIdentity: Send + Sync {
    /// Return the device identity, or fail if it cannot be resolved.
    async fn device_id(&self) -> Result<String, ClientError>;
}

/// A fixed identity, for hosts with externally provisioned ids and for
/// tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity(String);

impl StaticIdentity {
    /// Wrap an already-resolved identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[async_trait]
impl DeviceIdentity for StaticIdentity {
    async fn device_id(&self) -> Result<String, ClientError> {
        Ok(self.0.clone())
    }
}
