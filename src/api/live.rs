use axum::{
    Extension,
    extract::{
        Path,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};

use super::AppState;
use crate::{
    types::{Host, Party},
    warning,
};

/// Updates a slow subscriber may fall behind before it starts skipping.
pub const PARTY_FEED_CAPACITY: usize = 256;

/// The party of one host after a change. `party` is `None` once cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyUpdate {
    pub host_id: String,
    pub party: Option<Party>,
}

impl From<&Host> for PartyUpdate {
    fn from(host: &Host) -> Self {
        PartyUpdate {
            host_id: host.id.clone(),
            party: host.party.clone(),
        }
    }
}

/// Fan-out of party changes made through the API to live subscribers.
#[derive(Debug, Clone)]
pub struct PartyFeed {
    tx: broadcast::Sender<PartyUpdate>,
}

impl Default for PartyFeed {
    fn default() -> Self {
        Self::new(PARTY_FEED_CAPACITY)
    }
}

impl PartyFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes the current party of `host`. Nobody listening is fine.
    pub fn publish(&self, host: &Host) {
        let _ = self.tx.send(PartyUpdate::from(host));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PartyUpdate> {
        self.tx.subscribe()
    }
}

/// Websocket stream of one host's party.
///
/// Sends the current party right after the upgrade, then every change made
/// through the API as a JSON [`PartyUpdate`] text message.
pub async fn party_live(
    ws: WebSocketUpgrade,
    Path(host_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Response {
    let updates = state.feed.subscribe();
    ws.on_upgrade(move |socket| stream_party(socket, state, host_id, updates))
}

async fn stream_party(
    mut socket: WebSocket,
    state: AppState,
    host_id: String,
    mut updates: broadcast::Receiver<PartyUpdate>,
) {
    let snapshot = match state.repo.find_by_id(&host_id).await {
        Ok(host) => PartyUpdate {
            host_id: host_id.clone(),
            party: host.and_then(|h| h.party),
        },
        Err(e) => {
            warning!("Cannot load party of host {} for live feed: {}", host_id, e);
            return;
        }
    };
    if send_update(&mut socket, &snapshot).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(update) if update.host_id == host_id => {
                    if send_update(&mut socket, &update).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warning!("Live feed of host {} skipped {} updates", host_id, skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn send_update(socket: &mut WebSocket, update: &PartyUpdate) -> Result<(), axum::Error> {
    let text = serde_json::to_string(update).map_err(axum::Error::new)?;
    socket.send(Message::Text(text.into())).await
}
