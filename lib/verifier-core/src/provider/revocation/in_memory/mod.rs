//! In-process status list storage.
//!
//! Every list sits behind its own mutex, so writers of one list never block
//! readers or writers of another. The outer map lock is held only while looking
//! a list up, inserting or removing it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shared_types::{CredentialId, StatusListId};
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};

use super::RevocationManager;
use super::error::RevocationError;
use super::model::{
    DEFAULT_STATUS_LIST_SIZE, MAX_STATUS_LIST_SIZE, RevocationStatus, StatusList, StatusListInfo,
    StatusListStatistics, StatusUpdate,
};
use super::utils::derive_credential_index;
use crate::model::credential::{Credential, StatusPurpose};
use crate::util::bitstring::StatusBitstring;


struct StatusListEntry {
    info: StatusListInfo,
    bits: StatusBitstring,
    indices: HashMap<CredentialId, usize>,
    owners: HashMap<usize, CredentialId>,
}

impl StatusListEntry {
    fn new(info: StatusListInfo) -> Self {
        Self {
            bits: StatusBitstring::new(info.size),
            info,
            indices: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    fn status_at(&self, index: usize) -> Result<RevocationStatus, RevocationError> {
        let set = self.bits.get(index).map_err(|_| self.out_of_range(index))?;
        if !set {
            return Ok(RevocationStatus::default());
        }

        let reason = Some(format!(
            "{} entry {index} set in status list `{}`",
            self.info.purpose, self.info.id
        ));

        Ok(match self.info.purpose {
            StatusPurpose::Revocation => RevocationStatus {
                revoked: true,
                suspended: false,
                reason,
            },
            StatusPurpose::Suspension => RevocationStatus {
                revoked: false,
                suspended: true,
                reason,
            },
        })
    }

    fn out_of_range(&self, index: usize) -> RevocationError {
        RevocationError::IndexOutOfRange {
            status_list_id: self.info.id.clone(),
            index,
            size: self.info.size,
        }
    }

    fn assign_index(
        &mut self,
        credential_id: &CredentialId,
        requested: Option<usize>,
    ) -> Result<usize, RevocationError> {
        if let Some(existing) = self.indices.get(credential_id).copied() {
            return match requested {
                Some(requested) if requested != existing => Err(RevocationError::InvalidState(
                    format!(
                        "credential `{credential_id}` already has index {existing} in status list `{}`",
                        self.info.id
                    ),
                )),
                _ => Ok(existing),
            };
        }

        let index = match requested {
            Some(index) => {
                if index >= self.info.size {
                    return Err(self.out_of_range(index));
                }
                if let Some(owner) = self.owners.get(&index) {
                    return Err(RevocationError::IndexAlreadyAssigned {
                        status_list_id: self.info.id.clone(),
                        index,
                        credential_id: owner.clone(),
                    });
                }
                index
            }
            None => self.find_free_index(credential_id, &HashSet::new())?,
        };

        self.claim_index(credential_id, index);
        Ok(index)
    }

    fn claim_index(&mut self, credential_id: &CredentialId, index: usize) {
        self.indices.insert(credential_id.clone(), index);
        self.owners.insert(index, credential_id.clone());
    }

    // linear probing from the hash-derived position, skipping owned and `reserved` indices
    fn find_free_index(
        &self,
        credential_id: &CredentialId,
        reserved: &HashSet<usize>,
    ) -> Result<usize, RevocationError> {
        let size = self.info.size;
        let start = derive_credential_index(credential_id, size);

        (0..size)
            .map(|offset| (start + offset) % size)
            .find(|index| !self.owners.contains_key(index) && !reserved.contains(index))
            .ok_or_else(|| RevocationError::StatusListFull(self.info.id.clone()))
    }

    /// Indices the credentials would get, in order, without claiming any of them
    fn plan_indices(&self, credential_ids: &[CredentialId]) -> Result<Vec<usize>, RevocationError> {
        let mut planned: HashMap<&CredentialId, usize> = HashMap::new();
        let mut reserved = HashSet::new();

        credential_ids
            .iter()
            .map(|credential_id| {
                let known = self.indices.get(credential_id).or(planned.get(credential_id));
                if let Some(index) = known.copied() {
                    return Ok(index);
                }

                let index = self.find_free_index(credential_id, &reserved)?;
                planned.insert(credential_id, index);
                reserved.insert(index);
                Ok(index)
            })
            .collect()
    }

    fn check_purpose(&self, purpose: StatusPurpose) -> Result<(), RevocationError> {
        if self.info.purpose != purpose {
            return Err(RevocationError::InvalidArgument(format!(
                "status list `{}` has purpose {}, expected {purpose}",
                self.info.id, self.info.purpose
            )));
        }
        Ok(())
    }

    /// Returns `true` when the bit changed
    fn set_status(
        &mut self,
        credential_id: &CredentialId,
        index: usize,
        value: bool,
    ) -> Result<bool, RevocationError> {
        let previous = self
            .bits
            .set(index, value)
            .map_err(|_| self.out_of_range(index))?;

        if previous != value {
            self.info.last_modified = OffsetDateTime::now_utc();
        }

        tracing::debug!(
            "Status list `{}` entry {index} for `{credential_id}` set to {value}",
            self.info.id
        );

        Ok(previous != value)
    }

    fn update_status(
        &mut self,
        credential_id: &CredentialId,
        purpose: StatusPurpose,
        value: bool,
    ) -> Result<bool, RevocationError> {
        self.check_purpose(purpose)?;
        let index = self.assign_index(credential_id, None)?;
        self.set_status(credential_id, index, value)
    }
}

pub struct InMemoryStatusListManager {
    lists: RwLock<HashMap<StatusListId, Arc<Mutex<StatusListEntry>>>>,
    default_size: usize,
    max_size: usize,
}

impl Default for InMemoryStatusListManager {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_LIST_SIZE)
    }
}

impl InMemoryStatusListManager {
    pub fn new(default_size: usize) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            default_size,
            max_size: MAX_STATUS_LIST_SIZE,
        }
    }

    /// Upper bound for created and expanded lists, capped at [MAX_STATUS_LIST_SIZE]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.min(MAX_STATUS_LIST_SIZE);
        self
    }

    fn exceeds_max_size(&self, size: usize) -> RevocationError {
        RevocationError::InvalidArgument(format!(
            "status list size {size} exceeds the maximum of {}",
            self.max_size
        ))
    }

    async fn get_entry(
        &self,
        status_list_id: &StatusListId,
    ) -> Result<Arc<Mutex<StatusListEntry>>, RevocationError> {
        self.lists
            .read()
            .await
            .get(status_list_id)
            .cloned()
            .ok_or_else(|| RevocationError::StatusListNotFound(status_list_id.clone()))
    }

    async fn update_status(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
        purpose: StatusPurpose,
        value: bool,
    ) -> Result<bool, RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let mut entry = entry.lock().await;
        entry.update_status(credential_id, purpose, value)
    }
}

#[async_trait::async_trait]
impl RevocationManager for InMemoryStatusListManager {
    async fn check_revocation_status(
        &self,
        credential: &Credential,
    ) -> Result<RevocationStatus, RevocationError> {
        let Some(status) = &credential.credential_status else {
            return Ok(RevocationStatus::default());
        };

        let entry = self.get_entry(&status.status_list_credential).await?;
        let entry = entry.lock().await;

        if entry.info.purpose != status.status_purpose {
            return Err(RevocationError::InvalidState(format!(
                "credential status purpose {} does not match status list `{}` purpose {}",
                status.status_purpose, entry.info.id, entry.info.purpose
            )));
        }

        entry.status_at(status.status_list_index)
    }

    async fn create_status_list(
        &self,
        issuer_id: &str,
        purpose: StatusPurpose,
        size: Option<usize>,
        custom_id: Option<StatusListId>,
    ) -> Result<StatusListId, RevocationError> {
        let size = size.unwrap_or(self.default_size);
        if size == 0 {
            return Err(RevocationError::InvalidArgument(
                "status list size must be greater than zero".to_owned(),
            ));
        }
        if size > self.max_size {
            return Err(self.exceeds_max_size(size));
        }
        if issuer_id.trim().is_empty() {
            return Err(RevocationError::InvalidArgument(
                "issuer id must not be empty".to_owned(),
            ));
        }

        let id = custom_id.unwrap_or_else(StatusListId::new_random);

        let mut lists = self.lists.write().await;
        if lists.contains_key(&id) {
            return Err(RevocationError::StatusListAlreadyExists(id));
        }

        let now = OffsetDateTime::now_utc();
        let info = StatusListInfo {
            id: id.clone(),
            issuer_id: issuer_id.to_owned(),
            purpose,
            size,
            created_date: now,
            last_modified: now,
        };
        lists.insert(id.clone(), Arc::new(Mutex::new(StatusListEntry::new(info))));

        tracing::info!("Created {purpose} status list `{id}` for `{issuer_id}` with {size} entries");

        Ok(id)
    }

    async fn revoke_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError> {
        self.update_status(credential_id, status_list_id, StatusPurpose::Revocation, true)
            .await
    }

    async fn suspend_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError> {
        self.update_status(credential_id, status_list_id, StatusPurpose::Suspension, true)
            .await
    }

    async fn unrevoke_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError> {
        self.update_status(credential_id, status_list_id, StatusPurpose::Revocation, false)
            .await
    }

    async fn unsuspend_credential(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError> {
        self.update_status(credential_id, status_list_id, StatusPurpose::Suspension, false)
            .await
    }

    async fn check_status_by_index(
        &self,
        status_list_id: &StatusListId,
        index: usize,
    ) -> Result<RevocationStatus, RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let entry = entry.lock().await;
        entry.status_at(index)
    }

    async fn get_credential_index(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
    ) -> Result<Option<usize>, RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let entry = entry.lock().await;
        Ok(entry.indices.get(credential_id).copied())
    }

    async fn assign_credential_index(
        &self,
        credential_id: &CredentialId,
        status_list_id: &StatusListId,
        index: Option<usize>,
    ) -> Result<usize, RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let mut entry = entry.lock().await;
        entry.assign_index(credential_id, index)
    }

    async fn revoke_credentials(
        &self,
        credential_ids: Vec<CredentialId>,
        status_list_id: &StatusListId,
    ) -> Result<HashMap<CredentialId, bool>, RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let mut entry = entry.lock().await;

        entry.check_purpose(StatusPurpose::Revocation)?;
        let indices = entry.plan_indices(&credential_ids)?;

        credential_ids
            .into_iter()
            .zip(indices)
            .map(|(credential_id, index)| {
                entry.claim_index(&credential_id, index);
                let changed = entry.set_status(&credential_id, index, true)?;
                Ok((credential_id, changed))
            })
            .collect()
    }

    async fn update_status_list_batch(
        &self,
        status_list_id: &StatusListId,
        updates: Vec<StatusUpdate>,
    ) -> Result<(), RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let mut entry = entry.lock().await;

        if let Some(update) = updates.iter().find(|update| update.index >= entry.info.size) {
            return Err(entry.out_of_range(update.index));
        }

        for update in &updates {
            entry
                .bits
                .set(update.index, update.status)
                .map_err(|_| entry.out_of_range(update.index))?;
        }
        entry.info.last_modified = OffsetDateTime::now_utc();

        tracing::debug!(
            "Applied {} updates to status list `{status_list_id}`",
            updates.len()
        );

        Ok(())
    }

    async fn get_status_list_statistics(
        &self,
        status_list_id: &StatusListId,
    ) -> Result<StatusListStatistics, RevocationError> {
        let entry = self.get_entry(status_list_id).await?;
        let entry = entry.lock().await;

        let set_count = entry.bits.count_ones();
        let (revoked_count, suspended_count) = match entry.info.purpose {
            StatusPurpose::Revocation => (set_count, 0),
            StatusPurpose::Suspension => (0, set_count),
        };

        Ok(StatusListStatistics {
            status_list_id: entry.info.id.clone(),
            total_capacity: entry.info.size,
            assigned_indices: entry.indices.len(),
            revoked_count,
            suspended_count,
            available_indices: entry.info.size - entry.owners.len(),
        })
    }

    async fn get_status_list(
        &self,
        status_list_id: &StatusListId,
    ) -> Result<Option<StatusList>, RevocationError> {
        let entry = match self.get_entry(status_list_id).await {
            Ok(entry) => entry,
            Err(RevocationError::StatusListNotFound(_)) => return Ok(None),
            Err(error) => return Err(error),
        };
        let entry = entry.lock().await;

        Ok(Some(StatusList {
            info: entry.info.clone(),
            encoded_list: entry.bits.encode()?,
        }))
    }

    async fn list_status_lists(
        &self,
        issuer_id: Option<String>,
    ) -> Result<Vec<StatusListInfo>, RevocationError> {
        let entries: Vec<_> = self.lists.read().await.values().cloned().collect();

        let mut result = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.lock().await;
            if issuer_id
                .as_ref()
                .is_none_or(|issuer_id| *issuer_id == entry.info.issuer_id)
            {
                result.push(entry.info.clone());
            }
        }
        result.sort_by(|a, b| a.created_date.cmp(&b.created_date).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn delete_status_list(
        &self,
        status_list_id: &StatusListId,
    ) -> Result<bool, RevocationError> {
        let removed = self.lists.write().await.remove(status_list_id).is_some();
        if removed {
            tracing::info!("Deleted status list `{status_list_id}`");
        }
        Ok(removed)
    }

    async fn expand_status_list(
        &self,
        status_list_id: &StatusListId,
        additional_size: usize,
    ) -> Result<usize, RevocationError> {
        if additional_size == 0 {
            return Err(RevocationError::InvalidArgument(
                "additional size must be greater than zero".to_owned(),
            ));
        }

        let entry = self.get_entry(status_list_id).await?;
        let mut entry = entry.lock().await;

        let within_limit = entry
            .info
            .size
            .checked_add(additional_size)
            .is_some_and(|size| size <= self.max_size);
        if !within_limit {
            return Err(self.exceeds_max_size(entry.info.size.saturating_add(additional_size)));
        }

        entry.bits.grow(additional_size);
        entry.info.size = entry.bits.len();
        entry.info.last_modified = OffsetDateTime::now_utc();

        tracing::info!(
            "Expanded status list `{status_list_id}` to {} entries",
            entry.info.size
        );

        Ok(entry.info.size)
    }
}
