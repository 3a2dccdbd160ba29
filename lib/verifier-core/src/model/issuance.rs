use shared_types::CredentialId;
use thiserror::Error;
use time::OffsetDateTime;

use super::credential::{Credential, CredentialStatus, CredentialSubject};

pub const GENERIC_REQUEST_FIELD: &str = "request";
pub const ENGINE_NOT_INITIALIZED: &str = "Proof engine not initialized";
pub const UNKNOWN_ISSUANCE_ERROR: &str = "Unknown issuance error";

#[derive(Clone, Debug, PartialEq)]
pub struct IssuanceRequest {
    pub format: String,
    pub issuer: String,
    pub verification_method: String,
    pub credential_id: Option<CredentialId>,
    pub context: Vec<String>,
    pub r#type: Vec<String>,
    pub credential_subject: CredentialSubject,
    pub valid_from: Option<OffsetDateTime>,
    pub expiration_date: Option<OffsetDateTime>,
    pub credential_status: Option<CredentialStatus>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IssuanceResult {
    Success(Box<Credential>),
    Failure(IssuanceFailure),
}

impl IssuanceResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<IssuanceFailure> for IssuanceResult {
    fn from(value: IssuanceFailure) -> Self {
        Self::Failure(value)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum IssuanceFailure {
    #[error("Invalid issuance request, field `{field}`: {reason}")]
    InvalidRequest { field: String, reason: String },
    #[error("Proof engine `{format}` not ready: {reason}")]
    AdapterNotReady { format: String, reason: String },
    #[error("Proof engine `{format}` failed: {reason}")]
    AdapterError { format: String, reason: String },
    #[error("Unsupported format `{format}`, supported formats: [{}]", .supported_formats.join(", "))]
    UnsupportedFormat {
        format: String,
        supported_formats: Vec<String>,
    },
    #[error("{} issuance failures: {}", .failures.len(), join_failures(.failures))]
    MultipleFailures { failures: Vec<IssuanceFailure> },
}

impl IssuanceFailure {
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn aggregate(failures: Vec<IssuanceFailure>) -> Option<Self> {
        let mut flattened: Vec<IssuanceFailure> = failures
            .into_iter()
            .flat_map(|failure| match failure {
                Self::MultipleFailures { failures } => failures,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => None,
            1 => flattened.pop(),
            _ => Some(Self::MultipleFailures {
                failures: flattened,
            }),
        }
    }
}

fn join_failures(failures: &[IssuanceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
