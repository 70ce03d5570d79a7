use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::types::{Host, NewHost, Playlist};

pub async fn create_host(
    Extension(state): Extension<AppState>,
    body: Result<Json<NewHost>, JsonRejection>,
) -> Result<(StatusCode, Json<Host>), ApiError> {
    let Json(new_host) = body?;
    let host = state.repo.create(new_host).await?;
    Ok((StatusCode::CREATED, Json(host)))
}

pub async fn get_host(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Host>, ApiError> {
    match state.repo.find_by_id(&host_id).await? {
        Some(host) => Ok(Json(host)),
        None => Err(ApiError::NotFound(format!("couldn't find host {}", host_id))),
    }
}

pub async fn delete_host(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state.repo.delete_by_id(&host_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

pub async fn save_playlist(
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
    body: Result<Json<Playlist>, JsonRejection>,
) -> Result<Json<Host>, ApiError> {
    let Json(playlist) = body?;
    let host = state.repo.save_playlist(&host_id, playlist).await?;
    Ok(Json(host))
}
