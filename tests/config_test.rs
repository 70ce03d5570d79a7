use std::collections::HashMap;
use std::path::PathBuf;

use partyvote::config::{
    Config, ConfigError, DEFAULT_SPOTIFY_TOKEN_URL, IN_MEMORY_STORE, StoreLocation,
};

// Helper function to build a lookup over a fixed set of variables
fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

const CREDENTIALS: [(&str, &str); 3] = [
    ("SPOTIFY_CLIENT_ID", "cid"),
    ("SPOTIFY_CLIENT_SECRET", "secret"),
    (
        "SPOTIFY_CALLBACK_URL",
        "http://localhost:1000/auth/spotify/callback",
    ),
];

#[test]
fn test_defaults_apply_when_only_credentials_are_set() {
    let config = Config::from_lookup(vars(&CREDENTIALS)).unwrap();

    assert_eq!(config.server_addr.to_string(), "127.0.0.1:1000");
    assert_eq!(config.cors_origin, "http://localhost:3000");
    assert_eq!(config.spotify.client_id, "cid");
    assert_eq!(config.spotify.token_url, DEFAULT_SPOTIFY_TOKEN_URL);
    assert_eq!(config.spotify.scope, "user-read-email user-read-private");
    assert!(matches!(config.store, StoreLocation::File(ref p) if p.ends_with("partyvote/hosts.json")));
}

#[test]
fn test_missing_credentials_are_reported_by_name() {
    let err = Config::from_lookup(vars(&CREDENTIALS[1..])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SPOTIFY_CLIENT_ID"));

    let err = Config::from_lookup(vars(&CREDENTIALS[..2])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SPOTIFY_CALLBACK_URL"));
}

#[test]
fn test_blank_values_count_as_unset() {
    let mut pairs = CREDENTIALS.to_vec();
    pairs.push(("SPOTIFY_CLIENT_SECRET", "   "));
    // Later pairs win in the map
    let err = Config::from_lookup(vars(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SPOTIFY_CLIENT_SECRET"));

    let mut pairs = CREDENTIALS.to_vec();
    pairs.push(("CORS_ALLOWED_ORIGIN", ""));
    let config = Config::from_lookup(vars(&pairs)).unwrap();
    assert_eq!(config.cors_origin, "http://localhost:3000");
}

#[test]
fn test_invalid_server_address() {
    let mut pairs = CREDENTIALS.to_vec();
    pairs.push(("SERVER_ADDRESS", "localhost"));

    let err = Config::from_lookup(vars(&pairs)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "SERVER_ADDRESS", .. }));
}

#[test]
fn test_overrides_are_honoured() {
    let mut pairs = CREDENTIALS.to_vec();
    pairs.extend([
        ("SERVER_ADDRESS", "0.0.0.0:8080"),
        ("CORS_ALLOWED_ORIGIN", "https://party.example"),
        ("PARTY_STORE_PATH", "/tmp/party/hosts.json"),
        ("SPOTIFY_API_URL", "http://127.0.0.1:9999/v1"),
    ]);

    let config = Config::from_lookup(vars(&pairs)).unwrap();
    assert_eq!(config.server_addr.port(), 8080);
    assert_eq!(config.cors_origin, "https://party.example");
    assert_eq!(
        config.store,
        StoreLocation::File(PathBuf::from("/tmp/party/hosts.json"))
    );
    assert_eq!(config.spotify.api_url, "http://127.0.0.1:9999/v1");
}

#[test]
fn test_in_memory_store_location() {
    let location = StoreLocation::from_lookup(vars(&[("PARTY_STORE_PATH", IN_MEMORY_STORE)]));
    assert_eq!(location, StoreLocation::InMemory);
    assert_eq!(location.to_string(), "in-memory");
}
