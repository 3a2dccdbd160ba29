use indexmap::IndexMap;
use serde_json::json;
use shared_types::StatusListId;
use time::{Duration, OffsetDateTime};

use crate::model::credential::{
    Credential, CredentialStatus, CredentialSubject, Proof, StatusPurpose, VC_CONTEXT_V2,
    VERIFIABLE_CREDENTIAL_TYPE, VERIFIABLE_PRESENTATION_TYPE,
};
use crate::model::presentation::Presentation;

pub const ISSUER_DID: &str = "did:example:issuer";
pub const HOLDER_DID: &str = "did:example:holder";
pub const PROOF_TYPE: &str = "Ed25519Signature2020";

pub fn dummy_proof(verification_method: &str) -> Proof {
    Proof {
        r#type: PROOF_TYPE.to_owned(),
        proof_purpose: "assertionMethod".to_owned(),
        verification_method: verification_method.to_owned(),
        created: OffsetDateTime::now_utc() - Duration::hours(1),
        proof_value: "z3FXQjecWufY46yg5abdVZsXqLhxhueuSoZgNSARiKBk".to_owned(),
        challenge: None,
        domain: None,
    }
}

pub fn dummy_credential() -> Credential {
    let now = OffsetDateTime::now_utc();

    Credential {
        context: vec![VC_CONTEXT_V2.to_owned()],
        id: Some("urn:uuid:6a2c6e8e-6f5c-4d8a-9c1b-2f0b7c3f8d11".into()),
        r#type: vec![
            VERIFIABLE_CREDENTIAL_TYPE.to_owned(),
            "UniversityDegreeCredential".to_owned(),
        ],
        issuer: ISSUER_DID.to_owned(),
        issuance_date: now - Duration::days(1),
        valid_from: Some(now - Duration::days(1)),
        expiration_date: Some(now + Duration::days(365)),
        credential_subject: CredentialSubject {
            id: Some(HOLDER_DID.to_owned()),
            claims: IndexMap::from([("degree".to_owned(), json!({ "name": "BSc" }))]),
        },
        proof: Some(dummy_proof(&format!("{ISSUER_DID}#key-1"))),
        credential_status: None,
    }
}

pub fn dummy_credential_with_status(
    status_list_id: &StatusListId,
    index: usize,
    purpose: StatusPurpose,
) -> Credential {
    Credential {
        credential_status: Some(CredentialStatus {
            id: format!("{status_list_id}#{index}"),
            r#type: "BitstringStatusListEntry".to_owned(),
            status_purpose: purpose,
            status_list_index: index,
            status_list_credential: status_list_id.clone(),
        }),
        ..dummy_credential()
    }
}

pub fn dummy_presentation(credentials: Vec<Credential>) -> Presentation {
    Presentation {
        context: vec![VC_CONTEXT_V2.to_owned()],
        id: None,
        r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_owned()],
        holder: Some(HOLDER_DID.to_owned()),
        verifiable_credential: credentials,
        proof: Some(Proof {
            proof_purpose: "authentication".to_owned(),
            challenge: Some("challenge-123".to_owned()),
            domain: Some("verifier.example.com".to_owned()),
            ..dummy_proof(&format!("{HOLDER_DID}#key-1"))
        }),
    }
}
