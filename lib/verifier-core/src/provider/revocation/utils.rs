use sha2::{Digest, Sha256};
use shared_types::CredentialId;

/// Stable index of `credential_id` within a list of `size` entries
pub(crate) fn derive_credential_index(credential_id: &CredentialId, size: usize) -> usize {
    let digest = Sha256::digest(credential_id.as_str().as_bytes());

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);

    (u64::from_be_bytes(prefix) % size as u64) as usize
}
