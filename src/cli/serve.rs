use crate::{
    api::AppState,
    config::{Config, StoreLocation},
    error, info,
    server::start_api_server,
    store::ServerLock,
    warning,
};

/// Opens the host store and serves the HTTP API until ctrl-c.
pub async fn serve() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    let repo = match super::open_repository(&config.store).await {
        Ok(r) => r,
        Err(e) => error!("Cannot open host store at {}. Err: {}", config.store, e),
    };
    info!("Host store: {}", config.store);

    let lock = match &config.store {
        StoreLocation::InMemory => None,
        StoreLocation::File(path) => match ServerLock::acquire(path).await {
            Ok((lock, stale)) => {
                if let Some(pid) = stale {
                    warning!(
                        "Replaced lock {} left by process {}.",
                        lock.path().display(),
                        pid
                    );
                }
                Some(lock)
            }
            Err(e) => error!("Cannot lock host store at {}. Err: {}", config.store, e),
        },
    };

    let state = AppState::new(repo, config.spotify.clone());
    let result = start_api_server(&config, state).await;
    drop(lock);

    if let Err(e) = result {
        error!("Server stopped with an error: {}", e);
    }
}
