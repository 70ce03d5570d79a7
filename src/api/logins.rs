use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

/// How long a login may take between redirect and callback.
pub const LOGIN_STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound on logins awaiting their callback.
pub const MAX_PENDING_LOGINS: usize = 1024;

/// OAuth `state` values handed out by [`login`](super::login) and not yet
/// redeemed, with the time they were issued.
///
/// Expired entries are dropped on every insert. When the set is still full
/// the oldest entry makes room.
#[derive(Debug)]
pub struct PendingLogins {
    ttl: Duration,
    capacity: usize,
    // issue time and issue order per state
    states: Mutex<HashMap<String, (Instant, u64)>>,
    issued: AtomicU64,
}

impl Default for PendingLogins {
    fn default() -> Self {
        Self::new(LOGIN_STATE_TTL, MAX_PENDING_LOGINS)
    }
}

impl PendingLogins {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            states: Mutex::new(HashMap::new()),
            issued: AtomicU64::new(0),
        }
    }

    pub async fn insert(&self, state: String) {
        let mut states = self.states.lock().await;
        let now = Instant::now();
        states.retain(|_, (issued, _)| now.duration_since(*issued) <= self.ttl);

        while states.len() >= self.capacity {
            let Some(oldest) = states
                .iter()
                .min_by_key(|(_, (_, seq))| *seq)
                .map(|(s, _)| s.clone())
            else {
                break;
            };
            states.remove(&oldest);
        }
        let seq = self.issued.fetch_add(1, Ordering::Relaxed);
        states.insert(state, (now, seq));
    }

    /// Consumes `state`. False when it was never issued, already redeemed or
    /// has expired.
    pub async fn redeem(&self, state: &str) -> bool {
        match self.states.lock().await.remove(state) {
            Some((issued, _)) => issued.elapsed() <= self.ttl,
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
