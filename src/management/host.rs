use std::sync::Arc;

use crate::{
    management::RepositoryError,
    store::{HostFilter, HostStore, HostUpdate},
    types::{Host, NewHost, Party, Playlist, Track},
};

/// Sole mediator between the application and the host collection.
///
/// Holds a shared handle to the store that is opened once at startup; cloning
/// the repository clones the handle, not the data. Each mutating method issues
/// exactly one update statement, so it is atomic on its own, but two calls are
/// never composed atomically.
#[derive(Clone)]
pub struct HostRepository {
    store: Arc<dyn HostStore>,
}

impl HostRepository {
    pub fn new(store: Arc<dyn HostStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new_host: NewHost) -> Result<Host, RepositoryError> {
        let host = new_host.into_host()?;
        self.store.insert_one(host.clone()).await?;
        Ok(host)
    }

    /// Absent hosts are `Ok(None)`, never an error.
    pub async fn find_by_id(&self, host_id: &str) -> Result<Option<Host>, RepositoryError> {
        Ok(self.store.find_one(&by_id(host_id)).await?)
    }

    /// Idempotent: returns `false` when nothing was deleted.
    pub async fn delete_by_id(&self, host_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.store.delete_one(&by_id(host_id)).await?)
    }

    /// Sets the active party, replacing the previous one.
    pub async fn start_party(&self, host_id: &str, party: Party) -> Result<Host, RepositoryError> {
        party.validate()?;
        let result = self
            .store
            .update_one(&by_id(host_id), HostUpdate::SetParty(party))
            .await?;
        result
            .document
            .ok_or_else(|| RepositoryError::host_not_found(host_id))
    }

    /// Appends `track` to the end of the party queue.
    ///
    /// Requires both the host and an active party.
    pub async fn add_track_to_party(
        &self,
        host_id: &str,
        track: Track,
    ) -> Result<Host, RepositoryError> {
        track.validate()?;
        let result = self
            .store
            .update_one(
                &HostFilter::WithParty(host_id.to_string()),
                HostUpdate::PushPartyTrack(track),
            )
            .await?;

        match result.document {
            Some(host) => Ok(host),
            None => Err(self.missing_party(host_id).await?),
        }
    }

    /// Removes every queued track with `uri`. Zero matches, a missing party
    /// or a missing host are all successful no-ops; `None` means no host
    /// matched.
    pub async fn remove_track_from_party(
        &self,
        host_id: &str,
        uri: &str,
    ) -> Result<Option<Host>, RepositoryError> {
        let result = self
            .store
            .update_one(
                &by_id(host_id),
                HostUpdate::PullPartyTracks {
                    uri: uri.to_string(),
                },
            )
            .await?;
        Ok(result.document)
    }

    /// Unsets the party and keeps the host. `None` means no host matched.
    pub async fn clear_party(&self, host_id: &str) -> Result<Option<Host>, RepositoryError> {
        let result = self
            .store
            .update_one(&by_id(host_id), HostUpdate::UnsetParty)
            .await?;
        Ok(result.document)
    }

    /// Adds one vote to every queued track with `uri`.
    pub async fn vote_for_track(&self, host_id: &str, uri: &str) -> Result<Host, RepositoryError> {
        self.update_track(
            host_id,
            uri,
            HostUpdate::IncPartyTrackVotes {
                uri: uri.to_string(),
                by: 1,
            },
        )
        .await
    }

    pub async fn set_track_votes(
        &self,
        host_id: &str,
        uri: &str,
        votes: u32,
    ) -> Result<Host, RepositoryError> {
        self.update_track(
            host_id,
            uri,
            HostUpdate::SetPartyTrackVotes {
                uri: uri.to_string(),
                votes,
            },
        )
        .await
    }

    pub async fn save_playlist(
        &self,
        host_id: &str,
        playlist: Playlist,
    ) -> Result<Host, RepositoryError> {
        playlist.validate()?;
        let result = self
            .store
            .update_one(&by_id(host_id), HostUpdate::PushPlaylist(playlist))
            .await?;
        result
            .document
            .ok_or_else(|| RepositoryError::host_not_found(host_id))
    }

    /// Tracks of the active party in queue order.
    ///
    /// An existing host without a party yields an empty list; only a missing
    /// host is `NotFound`.
    pub async fn get_party_tracks(&self, host_id: &str) -> Result<Vec<Track>, RepositoryError> {
        self.store
            .project_party_tracks(host_id)
            .await?
            .ok_or_else(|| RepositoryError::host_not_found(host_id))
    }

    /// Flushes the store. Part of the shutdown sequence.
    pub async fn close(&self) -> Result<(), RepositoryError> {
        Ok(self.store.flush().await?)
    }

    async fn update_track(
        &self,
        host_id: &str,
        uri: &str,
        update: HostUpdate,
    ) -> Result<Host, RepositoryError> {
        let filter = HostFilter::WithPartyTrack {
            id: host_id.to_string(),
            uri: uri.to_string(),
        };
        let result = self.store.update_one(&filter, update).await?;
        if let Some(host) = result.document {
            return Ok(host);
        }

        match self.store.find_one(&by_id(host_id)).await? {
            None => Err(RepositoryError::host_not_found(host_id)),
            Some(host) if !host.has_party() => Err(RepositoryError::party_not_found(host_id)),
            Some(_) => Err(RepositoryError::track_not_found(host_id, uri)),
        }
    }

    // Only used to word the NotFound; the failed update already decided.
    async fn missing_party(&self, host_id: &str) -> Result<RepositoryError, RepositoryError> {
        Ok(match self.store.find_one(&by_id(host_id)).await? {
            Some(_) => RepositoryError::party_not_found(host_id),
            None => RepositoryError::host_not_found(host_id),
        })
    }
}

fn by_id(host_id: &str) -> HostFilter {
    HostFilter::ById(host_id.to_string())
}
