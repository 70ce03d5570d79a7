use thiserror::Error;

use crate::{store::StoreError, types::InvalidRecord};

/// Errors surfaced by [`HostRepository`](super::HostRepository).
///
/// Each variant is a distinct kind the HTTP layer maps to its own status.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("host with id {0} already exists")]
    DuplicateKey(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl RepositoryError {
    pub fn host_not_found(id: &str) -> Self {
        Self::NotFound(format!("host {id} not found"))
    }

    pub fn party_not_found(id: &str) -> Self {
        Self::NotFound(format!("host {id} has no active party"))
    }

    pub fn track_not_found(id: &str, uri: &str) -> Self {
        Self::NotFound(format!("track {uri} is not queued in the party of host {id}"))
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(id) => RepositoryError::DuplicateKey(id),
            StoreError::InUse { .. } | StoreError::Io(_) | StoreError::Serde(_) => {
                RepositoryError::StorageUnavailable(err.to_string())
            }
        }
    }
}

impl From<InvalidRecord> for RepositoryError {
    fn from(err: InvalidRecord) -> Self {
        RepositoryError::Validation(err.0)
    }
}
