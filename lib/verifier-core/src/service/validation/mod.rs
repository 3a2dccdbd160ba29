//! Stage-wise checks of a single credential.
//!
//! Every check returns `None` when it passes (or is disabled) and the failure
//! otherwise, so callers can run all of them and aggregate the outcome.

use time::OffsetDateTime;

use crate::model::credential::{Credential, RECOGNIZED_VC_CONTEXTS, VERIFIABLE_CREDENTIAL_TYPE};
use crate::model::verification::{VerificationFailure, VerificationOptions};


pub fn validate_context(credential: &Credential) -> Option<VerificationFailure> {
    let recognized = credential
        .context
        .iter()
        .any(|context| RECOGNIZED_VC_CONTEXTS.contains(&context.as_str()));

    if recognized {
        return None;
    }

    Some(VerificationFailure::invalid_proof(format!(
        "Credential @context must include one of: {}",
        RECOGNIZED_VC_CONTEXTS.join(", ")
    )))
}

pub fn validate_types(credential: &Credential) -> Option<VerificationFailure> {
    let mut errors = vec![];

    if credential.r#type.is_empty() {
        errors.push("Credential type must not be empty".to_owned());
    }
    if !credential
        .r#type
        .iter()
        .any(|r#type| r#type == VERIFIABLE_CREDENTIAL_TYPE)
    {
        errors.push(format!(
            "Credential type must include `{VERIFIABLE_CREDENTIAL_TYPE}`"
        ));
    }

    if errors.is_empty() {
        None
    } else {
        Some(VerificationFailure::SchemaValidationFailed { errors })
    }
}

pub fn validate_proof_exists(credential: &Credential) -> Option<VerificationFailure> {
    match &credential.proof {
        None => Some(VerificationFailure::invalid_proof(
            "Credential must have a proof property",
        )),
        Some(proof) if proof.proof_value.trim().is_empty() => {
            Some(VerificationFailure::invalid_proof(
                "Credential must have a proof property with a non-empty proof value",
            ))
        }
        Some(_) => None,
    }
}

pub fn validate_not_before(
    credential: &Credential,
    options: &VerificationOptions,
    now: OffsetDateTime,
) -> Option<VerificationFailure> {
    if !options.check_not_before {
        return None;
    }

    let valid_from = credential.valid_from?;
    // below the representable range the credential is already valid
    let earliest = valid_from.checked_sub(options.clock_skew_tolerance)?;
    if now < earliest {
        return Some(VerificationFailure::NotYetValid { valid_from });
    }

    None
}

pub fn validate_expiration(
    credential: &Credential,
    options: &VerificationOptions,
    now: OffsetDateTime,
) -> Option<VerificationFailure> {
    if !options.check_expiration {
        return None;
    }

    let expired_at = credential.expiration_date?;
    // past the representable range the credential never expires
    let deadline = expired_at.checked_add(options.clock_skew_tolerance)?;
    if now >= deadline {
        return Some(VerificationFailure::Expired { expired_at });
    }

    None
}

/// Issuers not identified by a DID are outside the policy's scope and pass
pub async fn validate_trust(
    credential: &Credential,
    options: &VerificationOptions,
) -> Option<VerificationFailure> {
    if !options.check_trust {
        return None;
    }
    let policy = options.trust_policy.as_ref()?;

    let Some(issuer) = credential.issuer_did() else {
        tracing::debug!(
            "Issuer `{}` is not a DID, skipping trust check",
            credential.issuer
        );
        return None;
    };

    if policy.is_trusted(&issuer).await {
        None
    } else {
        Some(VerificationFailure::UntrustedIssuer {
            issuer: credential.issuer.clone(),
        })
    }
}
