use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::macros::{impl_display, impl_into};

static DID_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^did:[a-z0-9]+:[A-Za-z0-9._:%\-]*[A-Za-z0-9._%\-]$"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DidValueError {
    #[error("Not a decentralized identifier: `{0}`")]
    NotADid(String),
}

/// A decentralized identifier (`did:<method>:<method-specific-id>`)
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DidValue(String);

impl DidValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    pub fn is_did(value: &str) -> bool {
        DID_REGEX
            .as_ref()
            .is_ok_and(|regex| regex.is_match(value))
    }
}

impl FromStr for DidValue {
    type Err = DidValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_did(s) {
            return Err(DidValueError::NotADid(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for DidValue {
    type Error = DidValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl_display!(DidValue);
impl_into!(DidValue; String);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_valid_did() {
        let did: DidValue = "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"
            .parse()
            .unwrap();
        assert_eq!(did.method(), "key");
    }

    #[test]
    fn test_parse_did_with_colons_in_method_specific_id() {
        assert!(DidValue::is_did("did:web:example.com:issuers:1"));
    }

    #[test]
    fn test_reject_non_did_values() {
        assert!(!DidValue::is_did("https://example.com/issuer"));
        assert!(!DidValue::is_did("did:"));
        assert!(!DidValue::is_did("did:web:"));
        assert_eq!(
            "https://example.com".parse::<DidValue>(),
            Err(DidValueError::NotADid("https://example.com".to_owned()))
        );
    }

    #[test]
    fn test_deserialize_checks_syntax() {
        assert!(serde_json::from_str::<DidValue>(r#""did:example:123""#).is_ok());
        assert!(serde_json::from_str::<DidValue>(r#""not-a-did""#).is_err());
    }
}
