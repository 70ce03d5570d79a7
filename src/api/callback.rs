use axum::{
    Extension, Json,
    extract::{Query, rejection::JsonRejection},
    response::Redirect,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::{
    spotify::{auth, profile},
    types::{AuthenticatedHost, Token},
    utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Starts a host login: remembers a fresh `state` and sends the browser to
/// the Spotify consent page.
pub async fn login(Extension(state): Extension<AppState>) -> Result<Redirect, ApiError> {
    let oauth_state = utils::generate_state();
    let url = auth::authorize_url(&state.spotify, &oauth_state)?;

    state.pending_logins.insert(oauth_state).await;
    Ok(Redirect::to(url.as_str()))
}

/// Completes a host login.
///
/// The `state` must be one handed out by [`login`] within the login expiry
/// and is consumed here, so a callback can only be redeemed once. Returns
/// the provider profile together with the token; nothing is written to the
/// host collection.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<AppState>,
) -> Result<Json<AuthenticatedHost>, ApiError> {
    let Some(oauth_state) = params.state else {
        return Err(ApiError::Unauthorized("missing oauth state".into()));
    };
    if !state.pending_logins.redeem(&oauth_state).await {
        warning!("Rejected login callback with unknown or expired state");
        return Err(ApiError::Unauthorized("unknown or expired oauth state".into()));
    }

    if let Some(reason) = params.error {
        return Err(ApiError::Unauthorized(format!("login denied: {}", reason)));
    }
    let Some(code) = params.code else {
        return Err(ApiError::BadRequest("missing authorization code".into()));
    };

    let token = auth::exchange_code(&state.http, &state.spotify, &code).await?;
    let profile = profile::fetch_profile(&state.http, &state.spotify, &token.access_token).await?;

    Ok(Json(AuthenticatedHost { profile, token }))
}

pub async fn refresh(
    Extension(state): Extension<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<Token>, ApiError> {
    let Json(req) = body?;
    if req.refresh_token.trim().is_empty() {
        return Err(ApiError::BadRequest("refresh_token must not be empty".into()));
    }

    let token = auth::refresh_token(&state.http, &state.spotify, &req.refresh_token).await?;
    Ok(Json(token))
}
