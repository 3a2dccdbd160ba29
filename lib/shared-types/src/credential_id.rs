use serde::{Deserialize, Serialize};

use crate::macros::impls_for_string_newtype;

/// Identifier of a credential, usually an URI such as `urn:uuid:…`
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct CredentialId(String);

impls_for_string_newtype!(CredentialId);
