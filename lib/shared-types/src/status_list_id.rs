use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::impls_for_string_newtype;

/// Identifier (and location) of a status list
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct StatusListId(String);

impls_for_string_newtype!(StatusListId);

impl StatusListId {
    pub fn new_random() -> Self {
        Self(format!("urn:uuid:{}", Uuid::new_v4()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_random_status_list_ids_are_unique_urns() {
        let first = StatusListId::new_random();
        let second = StatusListId::new_random();

        assert!(first.as_str().starts_with("urn:uuid:"));
        assert_ne!(first, second);
    }
}
