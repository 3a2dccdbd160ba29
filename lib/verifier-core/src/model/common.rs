use thiserror::Error;

/// Returned when the caller cancelled an in-flight operation.
///
/// This is never translated into a verification or issuance outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Operation cancelled")]
pub struct Cancelled;
