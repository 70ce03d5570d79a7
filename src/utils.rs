use rand::{Rng, distr::Alphanumeric};

use crate::types::{Playlist, PlaylistTableRow, Track, TrackTableRow};

/// Length of the OAuth `state` value handed to the identity provider.
pub const OAUTH_STATE_LEN: usize = 32;

/// Random alphanumeric value used as OAuth `state` to tie a callback to the
/// login that started it.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(OAUTH_STATE_LEN)
        .map(char::from)
        .collect()
}

/// Queue rows, numbered from 1 in queue order.
pub fn track_table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            uri: t.uri.clone(),
            votes: t.votes,
        })
        .collect()
}

pub fn playlist_table_rows(playlists: &[Playlist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .map(|p| PlaylistTableRow {
            id: p.id.clone(),
            name: p.name.clone(),
            tracks: p.tracks.len(),
        })
        .collect()
}

/// Total votes over a queue, for summaries.
pub fn total_votes(tracks: &[Track]) -> u64 {
    tracks.iter().map(|t| u64::from(t.votes)).sum()
}
