use crate::model::presentation::Presentation;
use crate::model::verification::{VerificationFailure, VerificationOptions};
use crate::provider::did_resolver::VerificationMethod;
use crate::provider::proof_engine::provider::ProofEngineProvider;
use crate::provider::signature_verifier::provider::SignatureVerifierProvider;


/// Passes when no challenge is expected
pub fn verify_challenge(
    presentation: &Presentation,
    options: &VerificationOptions,
) -> Option<VerificationFailure> {
    if !options.check_challenge {
        return None;
    }
    let expected = options.expected_challenge.as_deref()?;

    binding_mismatch("Challenge", expected, presentation.challenge())
}

/// Passes when no domain is expected
pub fn verify_domain(
    presentation: &Presentation,
    options: &VerificationOptions,
) -> Option<VerificationFailure> {
    if !options.check_domain {
        return None;
    }
    let expected = options.expected_domain.as_deref()?;

    binding_mismatch("Domain", expected, presentation.domain())
}

fn binding_mismatch(
    name: &str,
    expected: &str,
    actual: Option<&str>,
) -> Option<VerificationFailure> {
    if actual == Some(expected) {
        return None;
    }

    Some(VerificationFailure::invalid_proof(format!(
        "{name} mismatch: expected `{expected}`, got `{}`",
        actual.unwrap_or("<none>")
    )))
}

pub fn verify_proof_format_supported(
    format: &str,
    proof_engines: &dyn ProofEngineProvider,
) -> Option<VerificationFailure> {
    match proof_engines.get_proof_engine(format) {
        Some(_) => None,
        None => Some(VerificationFailure::UnsupportedFormat {
            format: format.to_owned(),
        }),
    }
}

/// `false` for a blank signature, an unknown proof type or a verifier error
pub async fn verify_presentation_signature(
    document: &[u8],
    signature: &str,
    verification_method: &VerificationMethod,
    proof_type: &str,
    signature_verifiers: &dyn SignatureVerifierProvider,
) -> bool {
    if signature.trim().is_empty() {
        return false;
    }

    let Some(verifier) = signature_verifiers.get_signature_verifier(proof_type) else {
        tracing::debug!("No signature verifier for proof type `{proof_type}`");
        return false;
    };

    match verifier
        .verify(document, signature, verification_method)
        .await
    {
        Ok(valid) => valid,
        Err(error) => {
            tracing::warn!(
                "Signature verification with `{}` failed: {error}",
                verification_method.id
            );
            false
        }
    }
}
