use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::types::{Host, Party, Track};

#[derive(Debug, Serialize, Deserialize)]
pub struct PartyTracksResponse {
    pub host_id: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct SetVotesRequest {
    pub votes: u32,
}

pub async fn start_party(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
    body: Result<Json<Party>, JsonRejection>,
) -> Result<Json<Host>, ApiError> {
    let Json(party) = body?;
    let host = state.repo.start_party(&host_id, party).await?;
    state.feed.publish(&host);
    Ok(Json(host))
}

pub async fn clear_party(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Value>, ApiError> {
    let host = state.repo.clear_party(&host_id).await?;
    if let Some(host) = &host {
        state.feed.publish(host);
    }
    Ok(Json(json!({ "cleared": host.is_some() })))
}

pub async fn get_party_tracks(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<PartyTracksResponse>, ApiError> {
    let tracks = state.repo.get_party_tracks(&host_id).await?;
    Ok(Json(PartyTracksResponse { host_id, tracks }))
}

pub async fn add_track(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
    body: Result<Json<Track>, JsonRejection>,
) -> Result<Json<Host>, ApiError> {
    let Json(track) = body?;
    let host = state.repo.add_track_to_party(&host_id, track).await?;
    state.feed.publish(&host);
    Ok(Json(host))
}

/// Removing an unknown track or from an unknown host is not an error; the
/// response then carries the current queue (empty for unknown hosts).
pub async fn remove_track(
    Path((host_id, uri)): Path<(String, String)>,
    Extension(state): Extension<AppState>,
) -> Result<Json<PartyTracksResponse>, ApiError> {
    let host = state.repo.remove_track_from_party(&host_id, &uri).await?;
    if let Some(host) = &host {
        state.feed.publish(host);
    }
    let tracks = host
        .and_then(|h| h.party)
        .map(|p| p.tracks)
        .unwrap_or_default();
    Ok(Json(PartyTracksResponse { host_id, tracks }))
}

pub async fn vote_track(
    Path((host_id, uri)): Path<(String, String)>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Host>, ApiError> {
    let host = state.repo.vote_for_track(&host_id, &uri).await?;
    state.feed.publish(&host);
    Ok(Json(host))
}

pub async fn set_track_votes(
    Path((host_id, uri)): Path<(String, String)>,
    Extension(state): Extension<AppState>,
    body: Result<Json<SetVotesRequest>, JsonRejection>,
) -> Result<Json<Host>, ApiError> {
    let Json(req) = body?;
    let host = state.repo.set_track_votes(&host_id, &uri, req.votes).await?;
    state.feed.publish(&host);
    Ok(Json(host))
}
