//! # API Module
//!
//! HTTP endpoints of the party backend, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - redirects a host to the Spotify consent page
//! - [`callback`] - completes the authorization code flow and returns the
//!   host's Spotify profile and token
//! - [`refresh`] - trades a refresh token for a new access token
//!
//! ### Hosts
//!
//! - [`create_host`], [`get_host`], [`delete_host`], [`save_playlist`]
//!
//! ### Party
//!
//! - [`start_party`], [`clear_party`] - set or unset the active party
//! - [`get_party_tracks`] - the flattened, ordered queue of the active party
//! - [`add_track`], [`remove_track`] - append to / prune the queue
//! - [`vote_track`], [`set_track_votes`] - guest votes
//! - [`party_live`] - websocket feed of party changes, fed by every party
//!   route above through the shared [`PartyFeed`]
//!
//! ### Search
//!
//! - [`search_tracks`] - Spotify catalog search with the caller's token
//!
//! ### Monitoring
//!
//! - [`health`] - status and version
//!
//! Every handler receives the shared [`AppState`] through an `Extension` and
//! converts repository and identity provider errors into [`ApiError`], which
//! renders as `{"message": ...}` with the matching status code.

mod callback;
mod error;
mod health;
mod hosts;
mod live;
mod logins;
mod party;
mod search;

use std::sync::Arc;

use crate::{config::SpotifyConfig, management::HostRepository};

pub use callback::{callback, login, refresh};
pub use error::ApiError;
pub use health::health;
pub use hosts::{create_host, delete_host, get_host, save_playlist};
pub use live::{PARTY_FEED_CAPACITY, PartyFeed, PartyUpdate, party_live};
pub use logins::{LOGIN_STATE_TTL, MAX_PENDING_LOGINS, PendingLogins};
pub use party::{
    PartyTracksResponse, add_track, clear_party, get_party_tracks, remove_track, set_track_votes,
    start_party, vote_track,
};
pub use search::search_tracks;

/// State shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub repo: HostRepository,
    pub spotify: Arc<SpotifyConfig>,
    pub http: reqwest::Client,
    pub pending_logins: Arc<PendingLogins>,
    pub feed: PartyFeed,
}

impl AppState {
    pub fn new(repo: HostRepository, spotify: SpotifyConfig) -> Self {
        Self {
            repo,
            spotify: Arc::new(spotify),
            http: reqwest::Client::new(),
            pending_logins: Arc::new(PendingLogins::default()),
            feed: PartyFeed::default(),
        }
    }

    /// Replaces the login bookkeeping, e.g. with a shorter expiry.
    pub fn with_pending_logins(mut self, pending_logins: PendingLogins) -> Self {
        self.pending_logins = Arc::new(pending_logins);
        self
    }
}
