use serde::{Deserialize, Serialize};

use super::credential::{Credential, Proof};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub r#type: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    #[serde(default)]
    pub verifiable_credential: Vec<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl Presentation {
    pub fn challenge(&self) -> Option<&str> {
        self.proof.as_ref()?.challenge.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.proof.as_ref()?.domain.as_deref()
    }
}
