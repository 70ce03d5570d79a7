use axum::{
    Extension, Router,
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

use crate::{Res, api, api::AppState, config::Config, info, success, warning};

/// Assembles every route around `state`.
///
/// `cors_origin` is the single browser origin allowed to call the API with
/// credentials.
pub fn router(state: AppState, cors_origin: &str) -> Res<Router> {
    let origin = HeaderValue::from_str(cors_origin)?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/auth/spotify", get(api::login))
        .route("/auth/spotify/callback", get(api::callback))
        .route("/refresh", post(api::refresh))
        .route("/hosts", post(api::create_host))
        .route("/hosts/{id}", get(api::get_host).delete(api::delete_host))
        .route("/hosts/{id}/playlists", post(api::save_playlist))
        .route(
            "/hosts/{id}/party",
            put(api::start_party).delete(api::clear_party),
        )
        .route(
            "/hosts/{id}/party/tracks",
            get(api::get_party_tracks).post(api::add_track),
        )
        .route(
            "/hosts/{id}/party/tracks/{uri}",
            axum::routing::delete(api::remove_track),
        )
        .route("/hosts/{id}/party/tracks/{uri}/vote", post(api::vote_track))
        .route(
            "/hosts/{id}/party/tracks/{uri}/votes",
            put(api::set_track_votes),
        )
        .route("/hosts/{id}/party/live", get(api::party_live))
        .route("/search", get(api::search_tracks))
        .layer(Extension(state))
        .layer(middleware::from_fn(log_request))
        .layer(cors);

    Ok(app)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        warning!("{} {} -> {}", method, path, status);
    } else {
        info!("{} {} -> {}", method, path, status);
    }
    response
}

/// Serves the API until ctrl-c, then flushes the store.
pub async fn start_api_server(config: &Config, state: AppState) -> Res<()> {
    let repo = state.repo.clone();
    let app = router(state, &config.cors_origin)?;

    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    success!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, flushing host store...");
    repo.close().await?;
    success!("Host store closed.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warning!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
