use axum::{
    Extension, Json,
    extract::Query,
    http::{HeaderMap, header},
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::{
    spotify::{SpotifyError, search},
    types::SearchTrack,
};

const DEFAULT_SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
}

/// Track search proxied to Spotify with the caller's own access token
/// (`Authorization: Bearer ...`).
pub async fn search_tracks(
    Query(params): Query<SearchParams>,
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SearchTrack>>, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query parameter q must not be empty".into()));
    }

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    match search::search_tracks(&state.http, &state.spotify, token, query, limit).await {
        Ok(tracks) => Ok(Json(tracks)),
        Err(SpotifyError::Status { status: 401, .. }) => Err(ApiError::Unauthorized(
            "spotify rejected the access token".into(),
        )),
        Err(e) => Err(e.into()),
    }
}
