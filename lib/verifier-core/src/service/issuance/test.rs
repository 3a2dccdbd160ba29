use std::io;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::json;
use similar_asserts::assert_eq;
use time::OffsetDateTime;

use super::IssuanceService;
use super::error_mapping::{handle_issuance_errors, validate_engine_availability};
use crate::model::common::Cancelled;
use crate::model::credential::{Credential, CredentialSubject, VC_CONTEXT_V2};
use crate::model::issuance::{
    ENGINE_NOT_INITIALIZED, IssuanceFailure, IssuanceRequest, IssuanceResult,
    UNKNOWN_ISSUANCE_ERROR,
};
use crate::provider::proof_engine::{MockProofEngine, ProofEngine};
use crate::provider::proof_engine::error::ProofEngineError;
use crate::provider::proof_engine::provider::MockProofEngineProvider;
use crate::service::test_utilities::{HOLDER_DID, ISSUER_DID, dummy_credential};

const FORMAT: &str = "JSON_LD";

fn issuance_request() -> IssuanceRequest {
    IssuanceRequest {
        format: FORMAT.to_owned(),
        issuer: ISSUER_DID.to_owned(),
        verification_method: format!("{ISSUER_DID}#key-1"),
        credential_id: None,
        context: vec![VC_CONTEXT_V2.to_owned()],
        r#type: vec!["VerifiableCredential".to_owned()],
        credential_subject: CredentialSubject {
            id: Some(HOLDER_DID.to_owned()),
            claims: IndexMap::from([("name".to_owned(), json!("Alice"))]),
        },
        valid_from: None,
        expiration_date: None,
        credential_status: None,
    }
}

fn engine_provider(engine: MockProofEngine) -> MockProofEngineProvider {
    let engine: Arc<dyn ProofEngine> = Arc::new(engine);
    let mut provider = MockProofEngineProvider::new();
    provider
        .expect_get_proof_engine()
        .with(eq(FORMAT))
        .returning(move |_| Some(engine.clone()));
    provider
        .expect_get_proof_engine()
        .withf(|format| format != FORMAT)
        .returning(|_| None);
    provider
        .expect_supported_formats()
        .returning(|| vec![FORMAT.to_owned()]);
    provider
}

#[tokio::test]
async fn test_handle_issuance_errors_success() {
    let credential = dummy_credential();

    let result = handle_issuance_errors(FORMAT, async { Ok(credential.clone()) })
        .await
        .unwrap();

    assert_eq!(result, IssuanceResult::Success(Box::new(credential)));
}

#[rstest]
#[case::invalid_argument(
    ProofEngineError::InvalidArgument("missing issuer".to_owned()),
    IssuanceFailure::InvalidRequest {
        field: "request".to_owned(),
        reason: "missing issuer".to_owned(),
    }
)]
#[case::invalid_state(
    ProofEngineError::InvalidState("key not loaded".to_owned()),
    IssuanceFailure::AdapterNotReady {
        format: FORMAT.to_owned(),
        reason: "key not loaded".to_owned(),
    }
)]
#[case::timeout(
    ProofEngineError::Timeout(Duration::from_secs(3)),
    IssuanceFailure::AdapterError {
        format: FORMAT.to_owned(),
        reason: "Timed out after 3s".to_owned(),
    }
)]
#[case::io(
    ProofEngineError::Io(io::Error::other("disk full")),
    IssuanceFailure::AdapterError {
        format: FORMAT.to_owned(),
        reason: "IO error: `disk full`".to_owned(),
    }
)]
#[case::other(
    ProofEngineError::Other("HSM exploded".to_owned()),
    IssuanceFailure::AdapterError {
        format: FORMAT.to_owned(),
        reason: "HSM exploded".to_owned(),
    }
)]
#[case::other_without_message(
    ProofEngineError::Other(String::new()),
    IssuanceFailure::AdapterError {
        format: FORMAT.to_owned(),
        reason: UNKNOWN_ISSUANCE_ERROR.to_owned(),
    }
)]
#[tokio::test]
async fn test_handle_issuance_errors_mapping(
    #[case] error: ProofEngineError,
    #[case] expected: IssuanceFailure,
) {
    let result = handle_issuance_errors(FORMAT, async { Err(error) })
        .await
        .unwrap();

    assert_eq!(result, IssuanceResult::Failure(expected));
}

#[tokio::test]
async fn test_handle_issuance_errors_cancelled() {
    let result = handle_issuance_errors(FORMAT, async {
        Err::<Credential, _>(ProofEngineError::Cancelled)
    })
    .await;

    assert_eq!(result, Err(Cancelled));
}

#[test]
fn test_validate_engine_availability() {
    let mut ready = MockProofEngine::new();
    ready.expect_is_ready().return_const(true);
    let provider = engine_provider(ready);

    assert_eq!(validate_engine_availability(FORMAT, &provider), None);
    assert_eq!(
        validate_engine_availability("MDOC", &provider),
        Some(IssuanceFailure::UnsupportedFormat {
            format: "MDOC".to_owned(),
            supported_formats: vec![FORMAT.to_owned()],
        })
    );

    let mut not_ready = MockProofEngine::new();
    not_ready.expect_is_ready().return_const(false);
    let provider = engine_provider(not_ready);

    assert_eq!(
        validate_engine_availability(FORMAT, &provider),
        Some(IssuanceFailure::AdapterNotReady {
            format: FORMAT.to_owned(),
            reason: ENGINE_NOT_INITIALIZED.to_owned(),
        })
    );
}

#[tokio::test]
async fn test_issue_credential_success() {
    let mut engine = MockProofEngine::new();
    engine.expect_is_ready().return_const(true);
    engine
        .expect_issue()
        .withf(|request| request.issuer == ISSUER_DID)
        .once()
        .returning(|_| Ok(dummy_credential()));

    let service = IssuanceService::new(Arc::new(engine_provider(engine)), None);

    let result = service.issue_credential(&issuance_request()).await.unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn test_issue_credential_invalid_request_aggregates_problems() {
    let mut engine = MockProofEngine::new();
    engine.expect_issue().never();

    let service = IssuanceService::new(Arc::new(engine_provider(engine)), None);
    let now = OffsetDateTime::now_utc();
    let request = IssuanceRequest {
        issuer: String::new(),
        r#type: vec![],
        valid_from: Some(now),
        expiration_date: Some(now),
        ..issuance_request()
    };

    let IssuanceResult::Failure(IssuanceFailure::MultipleFailures { failures }) =
        service.issue_credential(&request).await.unwrap()
    else {
        panic!("expected aggregated failure");
    };

    let fields: Vec<_> = failures
        .iter()
        .filter_map(|failure| match failure {
            IssuanceFailure::InvalidRequest { field, .. } => Some(field.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(fields, vec!["issuer", "type", "expirationDate"]);
}

#[tokio::test]
async fn test_issue_credential_unsupported_format() {
    let service = IssuanceService::new(Arc::new(engine_provider(MockProofEngine::new())), None);
    let request = IssuanceRequest {
        format: "MDOC".to_owned(),
        ..issuance_request()
    };

    let result = service.issue_credential(&request).await.unwrap();
    assert!(matches!(
        result,
        IssuanceResult::Failure(IssuanceFailure::UnsupportedFormat { .. })
    ));
}

#[tokio::test]
async fn test_issue_credential_engine_error() {
    let mut engine = MockProofEngine::new();
    engine.expect_is_ready().return_const(true);
    engine
        .expect_issue()
        .once()
        .returning(|_| Err(ProofEngineError::InvalidState("signer locked".to_owned())));

    let service = IssuanceService::new(Arc::new(engine_provider(engine)), None);

    let result = service.issue_credential(&issuance_request()).await.unwrap();
    assert_eq!(
        result,
        IssuanceResult::Failure(IssuanceFailure::AdapterNotReady {
            format: FORMAT.to_owned(),
            reason: "signer locked".to_owned(),
        })
    );
}
