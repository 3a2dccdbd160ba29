//! Per proof type signature checks over canonicalized documents.

use thiserror::Error;

use crate::provider::did_resolver::VerificationMethod;

pub mod provider;

#[derive(Debug, Error)]
pub enum SignatureVerifierError {
    #[error("Unsupported verification method type `{0}`")]
    UnsupportedVerificationMethod(String),
    #[error("Malformed signature: `{0}`")]
    MalformedSignature(String),
    #[error("Malformed public key: `{0}`")]
    MalformedPublicKey(String),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// `Ok(false)` means the signature does not match
    async fn verify(
        &self,
        document: &[u8],
        signature: &str,
        verification_method: &VerificationMethod,
    ) -> Result<bool, SignatureVerifierError>;
}
