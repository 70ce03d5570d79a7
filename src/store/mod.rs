//! # Store Module
//!
//! The storage-engine boundary. Hosts are kept as whole documents keyed by
//! their application level `id`, and every mutation is expressed as one
//! document statement (push, pull, set, unset, increment) so that a single
//! call is atomic with respect to other callers.
//!
//! The [`HostStore`] trait is what the repository depends on; it is injected
//! as an `Arc<dyn HostStore>` so tests and alternative engines can stand in.
//! [`JsonFileStore`] is the engine shipped with the crate: an in-memory
//! collection that is optionally persisted to a single JSON file. A running
//! server marks its file with a [`ServerLock`] so offline commands can tell.

mod error;
mod json;
mod lock;

pub use error::StoreError;
pub use json::JsonFileStore;
pub use lock::{ServerLock, lock_holder, lock_path};

use async_trait::async_trait;

use crate::types::{Host, Party, Playlist, Track};

/// Selects at most one host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostFilter {
    /// The host with this id.
    ById(String),
    /// The host with this id, only if it has an active party.
    WithParty(String),
    /// The host with this id whose party holds at least one track with `uri`.
    WithPartyTrack { id: String, uri: String },
}

impl HostFilter {
    pub fn id(&self) -> &str {
        match self {
            HostFilter::ById(id) | HostFilter::WithParty(id) => id.as_str(),
            HostFilter::WithPartyTrack { id, .. } => id.as_str(),
        }
    }

    pub fn matches(&self, host: &Host) -> bool {
        if host.id != self.id() {
            return false;
        }
        match self {
            HostFilter::ById(_) => true,
            HostFilter::WithParty(_) => host.has_party(),
            HostFilter::WithPartyTrack { uri, .. } => host.party_has_track(uri),
        }
    }
}

/// A single-document update statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostUpdate {
    SetParty(Party),
    UnsetParty,
    /// Appends to the end of `party.tracks`. No-op without a party.
    PushPartyTrack(Track),
    /// Removes every track whose uri equals `uri`, not just the first.
    PullPartyTracks { uri: String },
    /// Adds `by` to the votes of every track with `uri`, saturating.
    IncPartyTrackVotes { uri: String, by: u32 },
    /// Sets the votes of every track with `uri`.
    SetPartyTrackVotes { uri: String, votes: u32 },
    PushPlaylist(Playlist),
}

impl HostUpdate {
    /// Applies the statement in place and reports whether anything changed.
    pub fn apply(&self, host: &mut Host) -> bool {
        match self {
            HostUpdate::SetParty(party) => {
                if host.party.as_ref() == Some(party) {
                    return false;
                }
                host.party = Some(party.clone());
                true
            }
            HostUpdate::UnsetParty => host.party.take().is_some(),
            HostUpdate::PushPartyTrack(track) => match host.party.as_mut() {
                Some(party) => {
                    party.tracks.push(track.clone());
                    true
                }
                None => false,
            },
            HostUpdate::PullPartyTracks { uri } => match host.party.as_mut() {
                Some(party) => {
                    let before = party.tracks.len();
                    party.tracks.retain(|t| &t.uri != uri);
                    party.tracks.len() != before
                }
                None => false,
            },
            HostUpdate::IncPartyTrackVotes { uri, by } => {
                Self::each_party_track(host, uri, |t| t.votes = t.votes.saturating_add(*by))
            }
            HostUpdate::SetPartyTrackVotes { uri, votes } => {
                Self::each_party_track(host, uri, |t| t.votes = *votes)
            }
            HostUpdate::PushPlaylist(playlist) => {
                host.playlists.push(playlist.clone());
                true
            }
        }
    }

    fn each_party_track(host: &mut Host, uri: &str, mut f: impl FnMut(&mut Track)) -> bool {
        let Some(party) = host.party.as_mut() else {
            return false;
        };
        let mut touched = false;
        for track in party.tracks.iter_mut().filter(|t| t.uri == uri) {
            let before = track.votes;
            f(track);
            touched |= track.votes != before;
        }
        touched
    }
}

/// Outcome of [`HostStore::update_one`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
    /// The document after the update, when the filter matched.
    pub document: Option<Host>,
}

/// A collection of host documents.
///
/// Implementations must make each call atomic; no ordering is promised
/// between separate calls on the same host.
#[async_trait]
pub trait HostStore: Send + Sync {
    /// Inserts a new document. Fails with [`StoreError::DuplicateKey`] when
    /// a host with the same id exists.
    async fn insert_one(&self, host: Host) -> Result<(), StoreError>;

    async fn find_one(&self, filter: &HostFilter) -> Result<Option<Host>, StoreError>;

    async fn update_one(
        &self,
        filter: &HostFilter,
        update: HostUpdate,
    ) -> Result<UpdateResult, StoreError>;

    /// Returns whether a document was deleted.
    async fn delete_one(&self, filter: &HostFilter) -> Result<bool, StoreError>;

    /// Makes sure everything accepted so far is durable. Called on shutdown.
    async fn flush(&self) -> Result<(), StoreError>;

    /// Find-then-project of `party.tracks` for one host.
    ///
    /// `None` when the host does not exist, an empty list when it has no
    /// party.
    async fn project_party_tracks(&self, id: &str) -> Result<Option<Vec<Track>>, StoreError> {
        let host = self.find_one(&HostFilter::ById(id.to_string())).await?;
        Ok(host.map(|h| h.party.map(|p| p.tracks).unwrap_or_default()))
    }
}
