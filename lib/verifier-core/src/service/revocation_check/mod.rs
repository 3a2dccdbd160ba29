//! Revocation status lookup with a configurable policy for an unreachable or
//! failing status list backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::common::Cancelled;
use crate::model::credential::Credential;
use crate::model::verification::VerificationFailure;
use crate::provider::revocation::RevocationManager;
use crate::provider::revocation::error::{RevocationError, RevocationErrorCategory};


/// What a revocation manager error means for the verification outcome
#[derive(
    Clone, Copy, Debug, Default, Display, EnumString, Eq, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationFailurePolicy {
    /// The credential is rejected
    #[default]
    FailClosed,
    /// The error is ignored
    FailOpen,
    /// The credential passes with a warning attached
    FailWithWarning,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevocationCheckOutcome {
    pub failure: Option<VerificationFailure>,
    pub warnings: Vec<String>,
}

pub async fn check_revocation_status(
    credential: &Credential,
    manager: Option<&dyn RevocationManager>,
    policy: RevocationFailurePolicy,
    timeout: Option<Duration>,
) -> Result<RevocationCheckOutcome, Cancelled> {
    let Some(manager) = manager else {
        return Ok(RevocationCheckOutcome::default());
    };
    if credential.credential_status.is_none() {
        return Ok(RevocationCheckOutcome::default());
    }

    let lookup = manager.check_revocation_status(credential);
    let result = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, lookup)
            .await
            .unwrap_or(Err(RevocationError::Timeout(timeout))),
        None => lookup.await,
    };

    let error = match result {
        Ok(status) if status.is_active() => return Ok(RevocationCheckOutcome::default()),
        Ok(status) => {
            return Ok(RevocationCheckOutcome {
                failure: Some(VerificationFailure::Revoked {
                    suspended: !status.revoked,
                    reason: status.reason,
                }),
                warnings: vec![],
            });
        }
        Err(error) => error,
    };

    let Some(description) = describe_error(&error) else {
        return Err(Cancelled);
    };

    Ok(match policy {
        RevocationFailurePolicy::FailClosed => {
            tracing::warn!("{description}, rejecting credential");
            RevocationCheckOutcome {
                failure: Some(VerificationFailure::invalid_proof(format!(
                    "{description} (fail-closed: credential treated as not valid)"
                ))),
                warnings: vec![],
            }
        }
        RevocationFailurePolicy::FailOpen => {
            tracing::warn!("{description}, ignoring");
            RevocationCheckOutcome::default()
        }
        RevocationFailurePolicy::FailWithWarning => {
            tracing::warn!("{description}, continuing with warning");
            RevocationCheckOutcome {
                failure: None,
                warnings: vec![format!(
                    "Revocation check warning: {description}; proceeding without revocation status"
                )],
            }
        }
    })
}

/// `None` for cancellation
fn describe_error(error: &RevocationError) -> Option<String> {
    let description = match error.category() {
        RevocationErrorCategory::Timeout => {
            format!("Revocation check failed: status list lookup timed out ({error})")
        }
        RevocationErrorCategory::UnknownHost => {
            format!("Revocation check failed: status list service unreachable ({error})")
        }
        RevocationErrorCategory::ConnectionRefused => {
            format!("Revocation check failed: connection refused by status list service ({error})")
        }
        RevocationErrorCategory::Io => format!("Revocation check I/O error: {error}"),
        RevocationErrorCategory::InvalidState => format!("Revocation manager error: {error}"),
        RevocationErrorCategory::InvalidArgument => {
            format!("Invalid revocation check request: {error}")
        }
        RevocationErrorCategory::Unexpected => {
            format!("Unexpected revocation check error: {error}")
        }
        RevocationErrorCategory::Cancelled => return None,
    };

    Some(description)
}
