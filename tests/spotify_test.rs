use axum::{
    Form, Json, Router,
    body::{Body, to_bytes},
    extract::Query,
    http::{HeaderMap, Request, StatusCode, header},
    routing::{get, post},
};
use reqwest::Client;
use serde_json::{Value, json};
use std::{collections::HashMap, sync::Arc};
use tower::ServiceExt;

use partyvote::{
    api::AppState,
    config::SpotifyConfig,
    management::HostRepository,
    server::router,
    spotify::{SpotifyError, auth, profile, search},
    store::JsonFileStore,
    types::{SearchTrack, Token},
};

// Basic auth header for client-id:client-secret
const EXPECTED_BASIC: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

// Fake accounts service + Web API answering like Spotify does
async fn token_endpoint(
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if headers.get(header::AUTHORIZATION).map(|v| v.as_bytes()) != Some(EXPECTED_BASIC.as_bytes())
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client" })),
        );
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good-code") => (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-1",
                "token_type": "Bearer",
                "scope": "user-read-email",
                "expires_in": 3600,
                "refresh_token": "refresh-1"
            })),
        ),
        Some("refresh_token") => (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-2",
                "token_type": "Bearer",
                "scope": "user-read-email",
                "expires_in": 3600
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        ),
    }
}

async fn me_endpoint(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer access-1") => (
            StatusCode::OK,
            Json(json!({
                "id": "psjgh61luhrhqqp6bh7ol4oz2",
                "display_name": "DJ Host",
                "country": "DE"
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "status": 401 } })),
        ),
    }
}

async fn search_endpoint(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("Bearer access-1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "status": 401 } })),
        );
    }
    let limit: u32 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
    if params.get("type").map(String::as_str) != Some("track") || !(1..=50).contains(&limit) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "status": 400 } })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "tracks": {
                "href": "ignored",
                "items": [
                    {
                        "uri": "spotify:track:1",
                        "name": format!("{} anthem", params["q"]),
                        "artists": [{ "name": "Daft Punk" }, { "name": "Guest" }],
                        "album": { "images": [
                            { "url": "large.jpg", "width": 640 },
                            { "url": "medium.jpg", "width": 300 },
                            { "url": "small.jpg", "width": 64 }
                        ] }
                    },
                    { "uri": "spotify:track:2", "name": "No art" }
                ]
            }
        })),
    )
}

async fn start_fake_spotify() -> SpotifyConfig {
    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .route("/v1/me", get(me_endpoint))
        .route("/v1/search", get(search_endpoint));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    SpotifyConfig {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        redirect_uri: "http://localhost:1000/auth/spotify/callback".into(),
        scope: "user-read-email".into(),
        auth_url: format!("http://{}/authorize", addr),
        token_url: format!("http://{}/api/token", addr),
        api_url: format!("http://{}/v1", addr),
    }
}

#[test]
fn test_authorize_url_carries_state_and_encoded_redirect() {
    let config = SpotifyConfig {
        client_id: "cid".into(),
        client_secret: "secret".into(),
        redirect_uri: "http://localhost:1000/auth/spotify/callback".into(),
        scope: "user-read-email user-read-private".into(),
        auth_url: "https://accounts.spotify.com/authorize".into(),
        token_url: String::new(),
        api_url: String::new(),
    };

    let url = auth::authorize_url(&config, "xyz").unwrap();
    let params: HashMap<_, _> = url.query_pairs().into_owned().collect();

    assert_eq!(url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(params["client_id"], "cid");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["state"], "xyz");
    assert_eq!(params["scope"], "user-read-email user-read-private");
    assert_eq!(
        params["redirect_uri"],
        "http://localhost:1000/auth/spotify/callback"
    );
    // The client secret never goes to the browser
    assert!(!url.as_str().contains("secret"));
}

#[test]
fn test_authorize_url_rejects_invalid_endpoint() {
    let config = SpotifyConfig {
        client_id: "cid".into(),
        client_secret: "secret".into(),
        redirect_uri: "x".into(),
        scope: "s".into(),
        auth_url: "not a url".into(),
        token_url: String::new(),
        api_url: String::new(),
    };

    assert!(matches!(
        auth::authorize_url(&config, "xyz"),
        Err(SpotifyError::Url(_))
    ));
}

#[tokio::test]
async fn test_exchange_code_and_fetch_profile() {
    let config = start_fake_spotify().await;
    let client = Client::new();

    let token = auth::exchange_code(&client, &config, "good-code")
        .await
        .unwrap();
    assert_eq!(token.access_token, "access-1");
    assert_eq!(token.refresh_token, "refresh-1");
    assert_eq!(token.expires_in, 3600);
    assert_eq!(token.expires_at(), token.obtained_at + 3600);

    let profile = profile::fetch_profile(&client, &config, &token.access_token)
        .await
        .unwrap();
    assert_eq!(profile.id, "psjgh61luhrhqqp6bh7ol4oz2");
    assert_eq!(profile.display_name.as_deref(), Some("DJ Host"));
}

#[tokio::test]
async fn test_exchange_bad_code_surfaces_status() {
    let config = start_fake_spotify().await;

    let err = auth::exchange_code(&Client::new(), &config, "stale-code")
        .await
        .unwrap_err();
    match err {
        SpotifyError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_keeps_previous_refresh_token() {
    let config = start_fake_spotify().await;

    let token = auth::refresh_token(&Client::new(), &config, "refresh-1")
        .await
        .unwrap();
    assert_eq!(token.access_token, "access-2");
    assert_eq!(token.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_fetch_profile_with_bad_token() {
    let config = start_fake_spotify().await;

    let err = profile::fetch_profile(&Client::new(), &config, "expired")
        .await
        .unwrap_err();
    assert!(matches!(err, SpotifyError::Status { status: 401, .. }));
}

#[test]
fn test_token_expiry_saturates() {
    let token = Token {
        access_token: "a".into(),
        refresh_token: "r".into(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: u64::MAX - 10,
    };
    assert_eq!(token.expires_at(), u64::MAX);
}

#[tokio::test]
async fn test_search_tracks_maps_catalog_results() {
    let config = start_fake_spotify().await;

    // Out of range limits are clamped before they reach Spotify
    let tracks = search::search_tracks(&Client::new(), &config, "access-1", "daft", 500)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].uri, "spotify:track:1");
    assert_eq!(tracks[0].name, "daft anthem");
    assert_eq!(tracks[0].artists, vec!["Daft Punk", "Guest"]);
    assert_eq!(tracks[0].images.large.as_deref(), Some("large.jpg"));
    assert_eq!(tracks[0].images.small.as_deref(), Some("small.jpg"));
    assert!(tracks[1].images.large.is_none());

    let queued = tracks[0].clone().into_track();
    assert_eq!(queued.uri, "spotify:track:1");
    assert_eq!(queued.votes, 0);
    assert_eq!(queued.images.small.as_deref(), Some("small.jpg"));
}

#[tokio::test]
async fn test_search_route_forwards_caller_token() {
    let config = start_fake_spotify().await;
    let repo = HostRepository::new(Arc::new(JsonFileStore::in_memory()));
    let app = router(AppState::new(repo, config), "http://localhost:3000").unwrap();

    let request = Request::builder()
        .uri("/search?q=daft%20punk&limit=5")
        .header(header::AUTHORIZATION, "Bearer access-1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let tracks: Vec<SearchTrack> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(tracks[0].name, "daft punk anthem");

    let request = Request::builder()
        .uri("/search?q=daft")
        .header(header::AUTHORIZATION, "Bearer expired")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
