use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::Display;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::provider::trust_policy::TrustPolicy;

pub const DEFAULT_CLOCK_SKEW_TOLERANCE: Duration = Duration::minutes(5);

#[derive(Clone)]
pub struct VerificationOptions {
    pub check_not_before: bool,
    pub check_expiration: bool,
    pub check_revocation: bool,
    pub check_trust: bool,
    pub check_challenge: bool,
    pub check_domain: bool,
    /// Applied symmetrically to `validFrom` and `expirationDate`
    pub clock_skew_tolerance: Duration,
    pub expected_challenge: Option<String>,
    pub expected_domain: Option<String>,
    /// `None` accepts every issuer
    pub trust_policy: Option<Arc<dyn TrustPolicy>>,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            check_not_before: true,
            check_expiration: true,
            check_revocation: true,
            check_trust: true,
            check_challenge: true,
            check_domain: true,
            clock_skew_tolerance: DEFAULT_CLOCK_SKEW_TOLERANCE,
            expected_challenge: None,
            expected_domain: None,
            trust_policy: None,
        }
    }
}

impl fmt::Debug for VerificationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationOptions")
            .field("check_not_before", &self.check_not_before)
            .field("check_expiration", &self.check_expiration)
            .field("check_revocation", &self.check_revocation)
            .field("check_trust", &self.check_trust)
            .field("check_challenge", &self.check_challenge)
            .field("check_domain", &self.check_domain)
            .field("clock_skew_tolerance", &self.clock_skew_tolerance)
            .field("expected_challenge", &self.expected_challenge)
            .field("expected_domain", &self.expected_domain)
            .field("trust_policy", &self.trust_policy.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationCheck {
    Context,
    CredentialType,
    ProofPresent,
    ProofSignature,
    NotBefore,
    Expiration,
    Trust,
    Revocation,
    Challenge,
    Domain,
    HolderSignature,
    EmbeddedCredentials,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VerificationResult {
    Valid {
        /// Checks which actually ran and passed
        checks: Vec<VerificationCheck>,
        warnings: Vec<String>,
    },
    Invalid(VerificationFailure),
}

impl VerificationResult {
    pub fn valid(checks: Vec<VerificationCheck>, warnings: Vec<String>) -> Self {
        Self::Valid { checks, warnings }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn failure(&self) -> Option<&VerificationFailure> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid(failure) => Some(failure),
        }
    }

    /// Valid when `failures` is empty, otherwise the (possibly aggregated) failure
    pub fn from_failures(
        failures: Vec<VerificationFailure>,
        checks: Vec<VerificationCheck>,
        warnings: Vec<String>,
    ) -> Self {
        match VerificationFailure::aggregate(failures) {
            Some(failure) => Self::Invalid(failure),
            None => Self::valid(checks, warnings),
        }
    }
}

impl From<VerificationFailure> for VerificationResult {
    fn from(value: VerificationFailure) -> Self {
        Self::Invalid(value)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum VerificationFailure {
    #[error("Credential expired at {expired_at}")]
    Expired { expired_at: OffsetDateTime },
    #[error("{}", revocation_message(.suspended, .reason))]
    Revoked {
        suspended: bool,
        reason: Option<String>,
    },
    #[error("{reason}")]
    InvalidProof { reason: String },
    #[error("Issuer `{issuer}` is not trusted")]
    UntrustedIssuer { issuer: String },
    #[error("Unsupported proof format `{format}`")]
    UnsupportedFormat { format: String },
    #[error("Schema validation failed: {}", .errors.join("; "))]
    SchemaValidationFailed { errors: Vec<String> },
    #[error("Credential is not valid before {valid_from}")]
    NotYetValid { valid_from: OffsetDateTime },
    #[error("{} verification failures: {}", .failures.len(), join_failures(.failures))]
    MultipleFailures { failures: Vec<VerificationFailure> },
}

impl VerificationFailure {
    pub fn invalid_proof(reason: impl Into<String>) -> Self {
        Self::InvalidProof {
            reason: reason.into(),
        }
    }

    /// Collapses a list of failures into one, flattening nested aggregates.
    /// The order of the underlying failures is preserved.
    pub fn aggregate(failures: Vec<VerificationFailure>) -> Option<Self> {
        let mut flattened: Vec<VerificationFailure> = failures
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

fn revocation_message(suspended: &bool, reason: &Option<String>) -> String {
    let state = if *suspended { "suspended" } else { "revoked" };

    match reason {
        Some(reason) => format!("Credential has been {state}: {reason}"),
        None => format!("Credential has been {state}"),
    }
}

fn join_failures(failures: &[VerificationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_aggregate_empty_is_none() {
        assert_eq!(VerificationFailure::aggregate(vec![]), None);
    }

    #[test]
    fn test_aggregate_single_failure_is_kept_as_is() {
        let failure = VerificationFailure::invalid_proof("bad");
        assert_eq!(
            VerificationFailure::aggregate(vec![failure.clone()]),
            Some(failure)
        );
    }

    #[test]
    fn test_aggregate_flattens_nested_failures() {
        let expired = VerificationFailure::Expired {
            expired_at: datetime!(2020-01-01 0:00 UTC),
        };
        let untrusted = VerificationFailure::UntrustedIssuer {
            issuer: "did:example:issuer".to_owned(),
        };
        let nested = VerificationFailure::MultipleFailures {
            failures: vec![expired.clone(), untrusted.clone()],
        };
        let proof = VerificationFailure::invalid_proof("bad");

        let Some(VerificationFailure::MultipleFailures { failures }) =
            VerificationFailure::aggregate(vec![nested, proof.clone()])
        else {
            panic!("expected aggregate");
        };

        assert_eq!(failures, vec![expired, untrusted, proof]);
    }

    #[test]
    fn test_revoked_messages() {
        let revoked = VerificationFailure::Revoked {
            suspended: false,
            reason: None,
        };
        assert_eq!(revoked.to_string(), "Credential has been revoked");

        let suspended = VerificationFailure::Revoked {
            suspended: true,
            reason: Some("key compromise".to_owned()),
        };
        assert_eq!(
            suspended.to_string(),
            "Credential has been suspended: key compromise"
        );
    }

    #[test]
    fn test_multiple_failures_message_lists_all() {
        let failure = VerificationFailure::MultipleFailures {
            failures: vec![
                VerificationFailure::invalid_proof("first"),
                VerificationFailure::UnsupportedFormat {
                    format: "MDOC".to_owned(),
                },
            ],
        };

        assert_eq!(
            failure.to_string(),
            "2 verification failures: first; Unsupported proof format `MDOC`"
        );
    }
}
