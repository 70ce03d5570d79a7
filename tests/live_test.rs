use std::sync::Arc;

use serde_json::json;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
};

use partyvote::{
    api::{AppState, PartyUpdate},
    config::SpotifyConfig,
    management::HostRepository,
    server::router,
    store::JsonFileStore,
    types::{NewHost, Party, Track},
};

fn test_spotify_config() -> SpotifyConfig {
    SpotifyConfig {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        redirect_uri: "http://localhost:1000/auth/spotify/callback".into(),
        scope: "user-read-email".into(),
        auth_url: "https://accounts.example.test/authorize".into(),
        token_url: "http://127.0.0.1:9/api/token".into(),
        api_url: "http://127.0.0.1:9/v1".into(),
    }
}

// Serves the API on a random local port with host "234" partying
async fn start_server() -> String {
    let repo = HostRepository::new(Arc::new(JsonFileStore::in_memory()));
    repo.create(NewHost::new("234")).await.unwrap();
    repo.start_party(
        "234",
        Party::new("abc", "testPlaylist").with_tracks(vec![Track::new("testUri")]),
    )
    .await
    .unwrap();

    let app = router(AppState::new(repo, test_spotify_config()), "http://localhost:3000").unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// Opens a websocket with a plain HTTP/1.1 upgrade and returns the reader
// positioned at the first frame
async fn connect(addr: &str, path: &str) -> BufReader<TcpStream> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let handshake = format!(
        "GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: Upgrade\r\nUpgrade: websocket\r\n\
         Sec-WebSocket-Version: 13\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n"
    );
    stream.write_all(handshake.as_bytes()).await.unwrap();

    let mut reader = BufReader::new(stream);
    let mut status = String::new();
    reader.read_line(&mut status).await.unwrap();
    assert!(status.starts_with("HTTP/1.1 101"), "unexpected status {status}");
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        if line == "\r\n" {
            break;
        }
    }
    reader
}

// Reads one unmasked server text frame
async fn read_update(reader: &mut BufReader<TcpStream>) -> PartyUpdate {
    let mut head = [0u8; 2];
    reader.read_exact(&mut head).await.unwrap();
    assert_eq!(head[0], 0x81, "expected a final text frame");

    let len = match head[1] & 0x7f {
        126 => reader.read_u16().await.unwrap() as usize,
        127 => reader.read_u64().await.unwrap() as usize,
        n => n as usize,
    };
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await.unwrap();
    serde_json::from_slice(&payload).unwrap()
}

#[tokio::test]
async fn test_live_feed_sends_snapshot_then_changes() {
    let addr = start_server().await;
    let mut socket = connect(&addr, "/hosts/234/party/live").await;

    let snapshot = read_update(&mut socket).await;
    assert_eq!(snapshot.host_id, "234");
    assert_eq!(snapshot.party.unwrap().tracks[0].votes, 0);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/hosts/234/party/tracks/testUri/vote"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let voted = read_update(&mut socket).await;
    assert_eq!(voted.party.unwrap().tracks[0].votes, 1);

    let res = client
        .post(format!("http://{addr}/hosts/234/party/tracks"))
        .json(&json!({ "uri": "second" }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let added = read_update(&mut socket).await;
    let uris: Vec<String> = added.party.unwrap().tracks.into_iter().map(|t| t.uri).collect();
    assert_eq!(uris, vec!["testUri", "second"]);
}

#[tokio::test]
async fn test_live_feed_of_unknown_host_starts_empty() {
    let addr = start_server().await;
    let mut socket = connect(&addr, "/hosts/ghost/party/live").await;

    let snapshot = read_update(&mut socket).await;
    assert_eq!(snapshot.host_id, "ghost");
    assert!(snapshot.party.is_none());
}
