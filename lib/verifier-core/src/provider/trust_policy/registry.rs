//! Trust decisions backed by a trust registry: an issuer is trusted when it is a
//! configured anchor or when the registry knows a delegation path from one of the
//! anchors to the issuer.

use std::sync::Arc;

use shared_types::DidValue;
use thiserror::Error;

use super::TrustPolicy;

pub const DEFAULT_MAX_PATH_LENGTH: usize = 5;

#[derive(Debug, Error)]
pub enum TrustRegistryError {
    #[error("Trust registry unavailable: `{0}`")]
    Unavailable(String),
    #[error("Trust registry error: `{0}`")]
    Other(String),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait TrustRegistry: Send + Sync {
    async fn is_trust_anchor(&self, identifier: &DidValue) -> Result<bool, TrustRegistryError>;

    /// Delegation path `from` → … → `to`, both ends included
    async fn find_trust_path(
        &self,
        from: &DidValue,
        to: &DidValue,
    ) -> Result<Option<Vec<DidValue>>, TrustRegistryError>;
}

pub struct RegistryTrustPolicy {
    registry: Arc<dyn TrustRegistry>,
    anchors: Vec<DidValue>,
    max_path_length: usize,
}

impl RegistryTrustPolicy {
    pub fn new(registry: Arc<dyn TrustRegistry>, anchors: Vec<DidValue>) -> Self {
        Self {
            registry,
            anchors,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }

    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    async fn lookup(&self, issuer: &DidValue) -> Result<bool, TrustRegistryError> {
        if self.registry.is_trust_anchor(issuer).await? {
            return Ok(true);
        }

        for anchor in &self.anchors {
            if let Some(path) = self.registry.find_trust_path(anchor, issuer).await? {
                // path length counts hops, not nodes
                if !path.is_empty() && path.len() - 1 <= self.max_path_length {
                    return Ok(true);
                }
                tracing::debug!(
                    "Trust path from {anchor} to {issuer} too long: {} hops",
                    path.len().saturating_sub(1)
                );
            }
        }

        Ok(false)
    }
}

#[async_trait::async_trait]
impl TrustPolicy for RegistryTrustPolicy {
    async fn is_trusted(&self, issuer: &DidValue) -> bool {
        match self.lookup(issuer).await {
            Ok(trusted) => trusted,
            Err(error) => {
                tracing::warn!(%error, "Trust registry lookup failed for {issuer}, treating as untrusted");
                false
            }
        }
    }
}
