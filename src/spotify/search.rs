use reqwest::Client;
use serde::Deserialize;

use super::{SpotifyError, check_status};
use crate::{
    config::SpotifyConfig,
    types::{SearchTrack, TrackImages},
};

/// Largest page the search endpoint accepts.
pub const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    album: Option<ApiAlbum>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    #[serde(default)]
    images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
}

impl From<ApiTrack> for SearchTrack {
    fn from(track: ApiTrack) -> Self {
        // Album images come largest first
        let images = track.album.map(|a| a.images).unwrap_or_default();
        SearchTrack {
            uri: track.uri,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            images: TrackImages {
                small: images.last().map(|i| i.url.clone()),
                large: images.first().map(|i| i.url.clone()),
            },
        }
    }
}

/// Searches the Spotify catalog for tracks on behalf of the token's owner.
///
/// `limit` is clamped to `1..=50`.
///
/// # Example
///
/// ```
/// let tracks = search_tracks(&client, &config.spotify, token, "daft punk", 10).await?;
/// ```
pub async fn search_tracks(
    client: &Client,
    config: &SpotifyConfig,
    access_token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<SearchTrack>, SpotifyError> {
    let url = format!("{}/search", config.api_url.trim_end_matches('/'));
    let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();

    let res = client
        .get(url)
        .bearer_auth(access_token)
        .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
        .send()
        .await?;

    let payload: SearchResponse = check_status(res).await?.json().await?;
    Ok(payload.tracks.items.into_iter().map(SearchTrack::from).collect())
}
