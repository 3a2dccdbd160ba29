use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_types::{CredentialId, DidValue, StatusListId};
use strum::{Display, EnumString};
use time::OffsetDateTime;

pub const VC_CONTEXT_V1_1: &str = "https://www.w3.org/2018/credentials/v1";
pub const VC_CONTEXT_V2: &str = "https://www.w3.org/ns/credentials/v2";
pub const RECOGNIZED_VC_CONTEXTS: [&str; 2] = [VC_CONTEXT_V1_1, VC_CONTEXT_V2];

pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CredentialId>,
    pub r#type: Vec<String>,
    pub issuer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issuance_date: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_from: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<OffsetDateTime>,
    pub credential_subject: CredentialSubject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
}

impl Credential {
    /// Issuer as a DID, `None` for issuers identified by a plain URI
    pub fn issuer_did(&self) -> Option<DidValue> {
        self.issuer.parse().ok()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub claims: IndexMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub r#type: String,
    pub proof_purpose: String,
    pub verification_method: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub proof_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub id: String,
    pub r#type: String,
    pub status_purpose: StatusPurpose,
    #[serde(with = "index_as_string")]
    pub status_list_index: usize,
    pub status_list_credential: StatusListId,
}

#[derive(
    Clone, Copy, Debug, Display, EnumString, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusPurpose {
    Revocation,
    Suspension,
}

// `statusListIndex` is a string in the W3C data model
mod index_as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(index: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&index.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
