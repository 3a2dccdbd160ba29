//! DID resolution is provided by the host; the core only consumes resolved documents.

use serde::{Deserialize, Serialize};
use shared_types::DidValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DidResolverError {
    #[error("DID `{0}` not found")]
    NotFound(DidValue),
    #[error("Unsupported DID method `{0}`")]
    UnsupportedMethod(String),
    #[error("Resolution failed: `{0}`")]
    ResolutionFailed(String),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait DidResolver: Send + Sync {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidResolverError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    pub id: DidValue,
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default)]
    pub authentication: Vec<String>,
    #[serde(default)]
    pub assertion_method: Vec<String>,
}

impl DidDocument {
    /// Accepts both absolute (`did:…#key-1`) and relative (`#key-1`) references
    pub fn find_verification_method(&self, reference: &str) -> Option<&VerificationMethod> {
        let fragment = reference
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .unwrap_or(reference);

        self.verification_method.iter().find(|method| {
            method.id == reference
                || method
                    .id
                    .split_once('#')
                    .is_some_and(|(_, method_fragment)| method_fragment == fragment)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub id: String,
    pub r#type: String,
    pub controller: String,
    #[serde(flatten)]
    pub public_key: PublicKeyMaterial,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PublicKeyMaterial {
    PublicKeyMultibase(String),
    PublicKeyJwk(serde_json::Value),
}

/// DID part of a verification method reference (`did:example:123#key-1` → `did:example:123`)
pub fn did_from_verification_method(reference: &str) -> Option<DidValue> {
    reference
        .split('#')
        .next()
        .and_then(|did| did.parse().ok())
}
