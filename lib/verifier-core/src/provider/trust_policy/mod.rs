//! Issuer trust decisions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared_types::DidValue;
use strum::{Display, EnumString};

pub mod registry;


#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait TrustPolicy: Send + Sync {
    async fn is_trusted(&self, issuer: &DidValue) -> bool;
}

#[derive(
    Clone, Copy, Debug, Default, Display, EnumString, Eq, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustPolicyType {
    /// No policy configured, issuers are not checked
    #[default]
    None,
    AcceptAll,
    AllowList,
    BlockList,
}

pub struct AcceptAllTrustPolicy;

#[async_trait::async_trait]
impl TrustPolicy for AcceptAllTrustPolicy {
    async fn is_trusted(&self, _issuer: &DidValue) -> bool {
        true
    }
}

pub struct AllowListTrustPolicy {
    issuers: HashSet<String>,
}

impl AllowListTrustPolicy {
    pub fn new(issuers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            issuers: issuers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait::async_trait]
impl TrustPolicy for AllowListTrustPolicy {
    async fn is_trusted(&self, issuer: &DidValue) -> bool {
        self.issuers.contains(issuer.as_str())
    }
}

pub struct BlockListTrustPolicy {
    issuers: HashSet<String>,
}

impl BlockListTrustPolicy {
    pub fn new(issuers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            issuers: issuers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait::async_trait]
impl TrustPolicy for BlockListTrustPolicy {
    async fn is_trusted(&self, issuer: &DidValue) -> bool {
        !self.issuers.contains(issuer.as_str())
    }
}
