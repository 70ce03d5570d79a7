//! # CLI Module
//!
//! Operator commands of the party backend.
//!
//! - [`serve`] - opens the host store and runs the HTTP API
//! - [`host`] - shows a stored host (party summary, saved playlists) or
//!   deletes it
//! - [`party`] - prints the queue of a host's party as a table or clears it
//!
//! The inspection commands only need `PARTY_STORE_PATH`; the Spotify
//! credentials are read by `serve` alone. A serving process keeps the
//! collection in memory and marks the file with a lock, so `host --delete` and
//! `party --clear` refuse to write while that lock exists. `--force` skips the
//! check for a lock left behind by a crashed server.
//!
//! ```bash
//! partyvote serve
//! partyvote party 31lk2y5x --clear
//! partyvote host 31lk2y5x
//! ```

mod hosts;
mod party;
mod serve;

use std::sync::Arc;

use crate::{
    config::StoreLocation,
    management::HostRepository,
    store::{self, JsonFileStore, StoreError},
};

pub use hosts::host;
pub use party::party;
pub use serve::serve;

/// Opens the configured store and wraps it in a repository.
pub async fn open_repository(store: &StoreLocation) -> Result<HostRepository, StoreError> {
    let store = match store {
        StoreLocation::InMemory => JsonFileStore::in_memory(),
        StoreLocation::File(path) => JsonFileStore::open(path).await?,
    };
    Ok(HostRepository::new(Arc::new(store)))
}

/// Fails with [`StoreError::InUse`] when a server holds the file store.
pub async fn ensure_not_served(location: &StoreLocation) -> Result<(), StoreError> {
    let StoreLocation::File(path) = location else {
        return Ok(());
    };
    match store::lock_holder(path).await? {
        Some(holder) => Err(StoreError::InUse {
            path: path.clone(),
            holder,
        }),
        None => Ok(()),
    }
}
