//! `struct`s for revocation managers.

use serde::Serialize;
use shared_types::StatusListId;
use time::OffsetDateTime;

use crate::model::credential::StatusPurpose;
use crate::util::bitstring::MAXIMUM_BITSTRING_SIZE;

pub const DEFAULT_STATUS_LIST_SIZE: usize = 131072;
pub const MAX_STATUS_LIST_SIZE: usize = MAXIMUM_BITSTRING_SIZE;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RevocationStatus {
    pub revoked: bool,
    pub suspended: bool,
    pub reason: Option<String>,
}

impl RevocationStatus {
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.suspended
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusListInfo {
    pub id: StatusListId,
    pub issuer_id: String,
    pub purpose: StatusPurpose,
    pub size: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusList {
    #[serde(flatten)]
    pub info: StatusListInfo,
    /// GZIP + base64url bitstring, as published in a status list credential
    pub encoded_list: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusListStatistics {
    pub status_list_id: StatusListId,
    pub total_capacity: usize,
    pub assigned_indices: usize,
    pub revoked_count: usize,
    pub suspended_count: usize,
    pub available_indices: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub index: usize,
    /// `true` sets the bit (revoked / suspended), `false` clears it
    pub status: bool,
}
