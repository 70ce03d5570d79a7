use serde::{Deserialize, Serialize};
use tabled::Tabled;
use thiserror::Error;

/// A value failed construction-time validation.
///
/// Carries a human readable reason naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidRecord(pub String);

fn require_non_blank(field: &str, value: &str) -> Result<(), InvalidRecord> {
    if value.trim().is_empty() {
        return Err(InvalidRecord(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Image references of a track, both independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

/// One queued track. The uri is the natural key inside a party, but
/// duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub images: TrackImages,
}

impl Track {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            votes: 0,
            images: TrackImages::default(),
        }
    }

    pub fn with_votes(mut self, votes: u32) -> Self {
        self.votes = votes;
        self
    }

    pub fn with_images(mut self, small: Option<String>, large: Option<String>) -> Self {
        self.images = TrackImages { small, large };
        self
    }

    pub fn validate(&self) -> Result<(), InvalidRecord> {
        require_non_blank("track uri", &self.uri)
    }
}

/// An ordered, named list of tracks.
///
/// The same shape backs the active party and the saved playlists of a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackList {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

pub type Party = TrackList;
pub type Playlist = TrackList;

impl TrackList {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidRecord> {
        require_non_blank("list id", &self.id)?;
        self.tracks.iter().try_for_each(Track::validate)
    }
}

/// Root aggregate: a party organizer, keyed by the provider assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl Host {
    pub fn has_party(&self) -> bool {
        self.party.is_some()
    }

    pub fn party_has_track(&self, uri: &str) -> bool {
        self.party
            .as_ref()
            .is_some_and(|p| p.tracks.iter().any(|t| t.uri == uri))
    }

    pub fn validate(&self) -> Result<(), InvalidRecord> {
        require_non_blank("host id", &self.id)?;
        if let Some(party) = &self.party {
            party.validate()?;
        }
        self.playlists.iter().try_for_each(TrackList::validate)
    }
}

/// Input of a host creation. A new host never starts with a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHost {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl NewHost {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            playlists: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_playlist(mut self, playlist: Playlist) -> Self {
        self.playlists.push(playlist);
        self
    }

    /// Validates and turns the input into the record that gets stored.
    pub fn into_host(self) -> Result<Host, InvalidRecord> {
        let host = Host {
            id: self.id,
            name: self.name,
            party: None,
            playlists: self.playlists,
        };
        host.validate()?;
        Ok(host)
    }
}

/// OAuth token as returned by the Spotify accounts service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Unix time in seconds after which the access token is rejected.
    pub fn expires_at(&self) -> u64 {
        self.obtained_at.saturating_add(self.expires_in)
    }
}

/// The subset of the Spotify user profile the backend hands to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Result of a successful login: who logged in and the tokens to act as them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedHost {
    pub profile: SpotifyProfile,
    pub token: Token,
}

/// A track found through the Spotify catalog search, ready to be queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTrack {
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    #[serde(default)]
    pub images: TrackImages,
}

impl SearchTrack {
    pub fn into_track(self) -> Track {
        Track::new(self.uri).with_images(self.images.small, self.images.large)
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub position: usize,
    pub uri: String,
    pub votes: u32,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub id: String,
    pub name: String,
    pub tracks: usize,
}
