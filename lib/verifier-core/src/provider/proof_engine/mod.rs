//! Pluggable proof formats (linked-data proofs, JWT, SD-JWT, …).

use serde::Serialize;

use self::error::ProofEngineError;
use crate::model::credential::Credential;
use crate::model::issuance::IssuanceRequest;
use crate::model::verification::{VerificationOptions, VerificationResult};

pub mod error;
pub mod provider;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait ProofEngine: Send + Sync {
    fn format(&self) -> String;

    fn capabilities(&self) -> ProofEngineCapabilities;

    fn is_ready(&self) -> bool;

    async fn issue(&self, request: &IssuanceRequest) -> Result<Credential, ProofEngineError>;

    /// Checks the cryptographic proof of `credential`
    async fn verify(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Result<VerificationResult, ProofEngineError>;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofEngineCapabilities {
    /// Proof `type` values this engine can issue and verify
    pub proof_types: Vec<String>,
    pub selective_disclosure: bool,
    pub presentations: bool,
}
