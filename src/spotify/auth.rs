use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{SpotifyError, check_status};
use crate::{config::SpotifyConfig, types::Token};

/// Raw token endpoint payload. `refresh_token` is absent on most refreshes.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the URL the host's browser is redirected to.
///
/// `state` is echoed back on the callback and must be checked there.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config.spotify, "a1b2c3")?;
/// // https://accounts.spotify.com/authorize?client_id=..&response_type=code&..
/// ```
pub fn authorize_url(config: &SpotifyConfig, state: &str) -> Result<Url, SpotifyError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| SpotifyError::Url(format!("{}: {}", config.auth_url, e)))
}

/// Exchanges the authorization code from the callback for a token.
///
/// Authenticates with the client id and secret (HTTP basic), which is why
/// this only ever runs server side. Codes are single use and short lived.
pub async fn exchange_code(
    client: &Client,
    config: &SpotifyConfig,
    code: &str,
) -> Result<Token, SpotifyError> {
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let payload: TokenResponse = check_status(res).await?.json().await?;
    Ok(payload.into_token(None))
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may rotate the refresh token; when it does not send one, the
/// token passed in stays valid and is carried over.
pub async fn refresh_token(
    client: &Client,
    config: &SpotifyConfig,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let payload: TokenResponse = check_status(res).await?.json().await?;
    Ok(payload.into_token(Some(refresh_token)))
}
