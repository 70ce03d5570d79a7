//! # Spotify Integration Module
//!
//! Client side of the Spotify accounts service and Web API, limited to what a
//! host login needs:
//!
//! - [`auth`] - authorize URL, authorization code exchange and token refresh
//!   using the server's client credentials
//! - [`profile`] - the `/me` profile of the logged in host
//! - [`search`] - catalog track search with a client's access token
//!
//! ## Flow
//!
//! ```text
//! GET /auth/spotify            -> 303 to accounts.spotify.com/authorize?state=..
//! user grants access
//! GET /auth/spotify/callback   -> exchange code for a token
//!                              -> GET /me with the access token
//!                              -> { profile, token } to the client
//! ```
//!
//! What a client does with the returned profile (creating a host, looking an
//! existing one up) is left to the client; the callback does not touch the
//! host collection.
//!
//! Every call takes a shared [`reqwest::Client`] and the [`SpotifyConfig`]
//! explicitly, so tests can point the endpoints at a local fake server.
//!
//! [`SpotifyConfig`]: crate::config::SpotifyConfig

pub mod auth;
pub mod profile;
pub mod search;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request to spotify failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spotify answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid spotify endpoint: {0}")]
    Url(String),
}

/// Turns a non-success response into [`SpotifyError::Status`].
pub(crate) async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, SpotifyError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(SpotifyError::Status {
        status: status.as_u16(),
        body,
    })
}
