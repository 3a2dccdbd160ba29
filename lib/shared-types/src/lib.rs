mod credential_id;
mod did_value;
mod macros;
mod status_list_id;

pub use credential_id::CredentialId;
pub use did_value::{DidValue, DidValueError};
pub use status_list_id::StatusListId;
