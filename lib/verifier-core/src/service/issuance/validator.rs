use crate::model::credential::{RECOGNIZED_VC_CONTEXTS, VERIFIABLE_CREDENTIAL_TYPE};
use crate::model::issuance::{IssuanceFailure, IssuanceRequest};

/// Collects every problem of the request instead of stopping at the first one
pub(crate) fn validate_issuance_request(request: &IssuanceRequest) -> Option<IssuanceFailure> {
    let mut failures = vec![];

    if request.format.trim().is_empty() {
        failures.push(IssuanceFailure::invalid_request("format", "must not be empty"));
    }
    if request.issuer.trim().is_empty() {
        failures.push(IssuanceFailure::invalid_request("issuer", "must not be empty"));
    }
    if request.verification_method.trim().is_empty() {
        failures.push(IssuanceFailure::invalid_request(
            "verificationMethod",
            "must not be empty",
        ));
    }

    if !request
        .context
        .iter()
        .any(|context| RECOGNIZED_VC_CONTEXTS.contains(&context.as_str()))
    {
        failures.push(IssuanceFailure::invalid_request(
            "@context",
            format!("must include one of: {}", RECOGNIZED_VC_CONTEXTS.join(", ")),
        ));
    }

    if !request
        .r#type
        .iter()
        .any(|r#type| r#type == VERIFIABLE_CREDENTIAL_TYPE)
    {
        failures.push(IssuanceFailure::invalid_request(
            "type",
            format!("must include `{VERIFIABLE_CREDENTIAL_TYPE}`"),
        ));
    }

    if request.credential_subject.id.is_none() && request.credential_subject.claims.is_empty() {
        failures.push(IssuanceFailure::invalid_request(
            "credentialSubject",
            "must have an id or at least one claim",
        ));
    }

    if let (Some(valid_from), Some(expiration_date)) =
        (request.valid_from, request.expiration_date)
        && expiration_date <= valid_from
    {
        failures.push(IssuanceFailure::invalid_request(
            "expirationDate",
            "must be after validFrom",
        ));
    }

    IssuanceFailure::aggregate(failures)
}
