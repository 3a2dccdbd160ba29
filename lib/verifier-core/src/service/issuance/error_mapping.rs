//! Translation of proof engine faults into issuance outcomes.

use std::future::Future;

use crate::model::common::Cancelled;
use crate::model::credential::Credential;
use crate::model::issuance::{
    ENGINE_NOT_INITIALIZED, GENERIC_REQUEST_FIELD, IssuanceFailure, IssuanceResult,
    UNKNOWN_ISSUANCE_ERROR,
};
use crate::provider::proof_engine::error::ProofEngineError;
use crate::provider::proof_engine::provider::ProofEngineProvider;

/// Runs an issuance attempt, mapping every engine error except cancellation
/// onto an [IssuanceFailure]
pub async fn handle_issuance_errors<F>(format: &str, attempt: F) -> Result<IssuanceResult, Cancelled>
where
    F: Future<Output = Result<Credential, ProofEngineError>>,
{
    let error = match attempt.await {
        Ok(credential) => return Ok(IssuanceResult::Success(Box::new(credential))),
        Err(error) => error,
    };

    tracing::warn!("Issuance with `{format}` failed: {error}");

    let failure = match error {
        ProofEngineError::Cancelled => return Err(Cancelled),
        ProofEngineError::InvalidArgument(reason) => IssuanceFailure::InvalidRequest {
            field: GENERIC_REQUEST_FIELD.to_owned(),
            reason,
        },
        ProofEngineError::InvalidState(reason) => IssuanceFailure::AdapterNotReady {
            format: format.to_owned(),
            reason,
        },
        error @ (ProofEngineError::Timeout(_)
        | ProofEngineError::Io(_)
        | ProofEngineError::Other(_)) => IssuanceFailure::AdapterError {
            format: format.to_owned(),
            reason: reason_or_default(error.to_string()),
        },
    };

    Ok(IssuanceResult::Failure(failure))
}

fn reason_or_default(reason: String) -> String {
    if reason.trim().is_empty() {
        UNKNOWN_ISSUANCE_ERROR.to_owned()
    } else {
        reason
    }
}

/// Pre-flight gate: the engine must be registered and ready
pub fn validate_engine_availability(
    format: &str,
    proof_engines: &dyn ProofEngineProvider,
) -> Option<IssuanceFailure> {
    let Some(engine) = proof_engines.get_proof_engine(format) else {
        return Some(IssuanceFailure::UnsupportedFormat {
            format: format.to_owned(),
            supported_formats: proof_engines.supported_formats(),
        });
    };

    if engine.is_ready() {
        None
    } else {
        Some(IssuanceFailure::AdapterNotReady {
            format: format.to_owned(),
            reason: ENGINE_NOT_INITIALIZED.to_owned(),
        })
    }
}
