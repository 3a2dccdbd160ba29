//! Status list backed revocation and suspension.

use std::collections::HashMap;

use shared_types::{CredentialId, StatusListId};

use self::error::RevocationError;
use self::model::{RevocationStatus, StatusList, StatusListInfo, StatusListStatistics, StatusUpdate};
use crate::model::credential::{Credential, StatusPurpose};

pub mod error;
pub mod in_memory;
pub mod model;
pub mod utils;

/// Status list backend.
///
/// Implementations must serialize mutations of a single status list: at most one
/// writer per list at any time, while different lists can be written concurrently.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait RevocationManager: Send + Sync {
    /// Reads the current status of the entry referenced by `credential.credential_status`
    async fn check_revocation_status(
        &self,
        credential: &Credential,
    ) -> Result<RevocationStatus, RevocationError>;

    /// `size` defaults to the manager's configured capacity
    async fn create_status_list(
        &self,
        issuer_id: &str,
        purpose: StatusPurpose,
        size: Option<usize>,
        custom_id: Option<StatusListId>,
    ) -> Result<StatusListId, RevocationError>;

    /// Returns `true` when the status changed
    async fn revoke_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError>;

    async fn suspend_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError>;

    async fn unrevoke_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError>;

    async fn unsuspend_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError>;

    async fn check_status_by_index(
        &self,
        status_list_id: &StatusListId,
        index: usize,
    ) -> Result<RevocationStatus, RevocationError>;

    async fn get_credential_index(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<Option<usize>, RevocationError>;

    /// Assigns `index`, or a hash-derived free index when `None`
    async fn assign_credential_index(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
        index: Option<usize>,
    ) -> Result<usize, RevocationError>;

    /// All-or-nothing: no credential is revoked when any of them cannot get an index
    async fn revoke_credentials(
        &self,
        credential_ids: Vec<CredentialId>,
        status_list_id: &StatusListId,
    ) -> Result<HashMap<CredentialId, bool>, RevocationError>;

    /// All-or-nothing: nothing is applied when any update is invalid
    async fn update_status_list_batch(
        &self,
        status_list_id: &StatusListId,
        updates: Vec<StatusUpdate>,
    ) -> Result<(), RevocationError>;

    async fn get_status_list_statistics(
        &self,
        status_list_id: &StatusListId,
    ) -> Result<StatusListStatistics, RevocationError>;

    async fn get_status_list(
        &self,
        status_list_id: &StatusListId,
    ) -> Result<Option<StatusList>, RevocationError>;

    async fn list_status_lists(
        &self,
        issuer_id: Option<String>,
    ) -> Result<Vec<StatusListInfo>, RevocationError>;

    /// Returns `false` when the list did not exist
    async fn delete_status_list(&self, status_list_id: &StatusListId)
    -> Result<bool, RevocationError>;

    /// Returns the new capacity
    async fn expand_status_list(
        &self,
        status_list_id: &StatusListId,
        additional_size: usize,
    ) -> Result<usize, RevocationError>;
}
