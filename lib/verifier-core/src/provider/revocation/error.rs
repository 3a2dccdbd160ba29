//! Enumerates errors related to revocation managers.

use std::io::ErrorKind;
use std::time::Duration;

use shared_types::{CredentialId, StatusListId};
use strum::Display;
use thiserror::Error;

use crate::util::bitstring::BitstringError;

#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("Status list not found: `{0}`")]
    StatusListNotFound(StatusListId),
    #[error("Status list already exists: `{0}`")]
    StatusListAlreadyExists(StatusListId),
    #[error("Status list `{0}` is full")]
    StatusListFull(StatusListId),
    #[error("Index {index} out of range for status list `{status_list_id}` of size {size}")]
    IndexOutOfRange {
        status_list_id: StatusListId,
        index: usize,
        size: usize,
    },
    #[error("Index {index} of status list `{status_list_id}` already assigned to `{credential_id}`")]
    IndexAlreadyAssigned {
        status_list_id: StatusListId,
        index: usize,
        credential_id: CredentialId,
    },
    #[error("Invalid argument: `{0}`")]
    InvalidArgument(String),
    #[error("Invalid state: `{0}`")]
    InvalidState(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unknown host: `{0}`")]
    UnknownHost(String),
    #[error("IO error: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Bitstring error: `{0}`")]
    BitstringError(#[from] BitstringError),
    #[error("Cancelled")]
    Cancelled,
    #[error("{0}")]
    Other(String),
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum RevocationErrorCategory {
    Timeout,
    UnknownHost,
    ConnectionRefused,
    Io,
    InvalidState,
    InvalidArgument,
    Cancelled,
    Unexpected,
}

impl RevocationError {
    pub fn category(&self) -> RevocationErrorCategory {
        match self {
            Self::Timeout(_) => RevocationErrorCategory::Timeout,
            Self::UnknownHost(_) => RevocationErrorCategory::UnknownHost,
            Self::Io(error) => match error.kind() {
                ErrorKind::ConnectionRefused => RevocationErrorCategory::ConnectionRefused,
                ErrorKind::TimedOut => RevocationErrorCategory::Timeout,
                _ => RevocationErrorCategory::Io,
            },
            Self::StatusListNotFound(_)
            | Self::IndexOutOfRange { .. }
            | Self::InvalidArgument(_) => RevocationErrorCategory::InvalidArgument,
            Self::StatusListAlreadyExists(_)
            | Self::StatusListFull(_)
            | Self::IndexAlreadyAssigned { .. }
            | Self::BitstringError(_)
            | Self::InvalidState(_) => RevocationErrorCategory::InvalidState,
            Self::Cancelled => RevocationErrorCategory::Cancelled,
            Self::Other(_) => RevocationErrorCategory::Unexpected,
        }
    }
}
