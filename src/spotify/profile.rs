use reqwest::Client;

use super::{SpotifyError, check_status};
use crate::{config::SpotifyConfig, types::SpotifyProfile};

/// Fetches the profile of the user the access token belongs to.
pub async fn fetch_profile(
    client: &Client,
    config: &SpotifyConfig,
    access_token: &str,
) -> Result<SpotifyProfile, SpotifyError> {
    let url = format!("{}/me", config.api_url.trim_end_matches('/'));
    let res = client.get(url).bearer_auth(access_token).send().await?;

    Ok(check_status(res).await?.json().await?)
}
