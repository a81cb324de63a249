pub mod handlers;
mod types;

pub use types::*;

use crate::{
    Result,
    config::Config,
    gradio::GradioTryOnClient,
    publish::{self, PUBLIC_PREFIX, ReverseSearchPublisher},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

// Data URLs for photos run into the megabytes; axum's 2 MiB default is too
// small.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn app(state: handlers::AppState) -> Router {
    let public_dir = state.publisher.public_dir().to_path_buf();

    Router::new()
        .route("/tryon", post(handlers::try_on))
        .route("/reverse-search", post(handlers::reverse_search))
        .route("/healthz", get(handlers::health))
        .nest_service(&format!("/{PUBLIC_PREFIX}"), ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let publisher = Arc::new(ReverseSearchPublisher::new(&config.server.public_dir));
    publisher.ensure_dir().await?;

    if let Some(hours) = config.server.retention_hours {
        info!("Retention sweep enabled: published images expire after {}h", hours);
        publish::spawn_retention_sweep(publisher.clone(), hours);
    }

    let tryon = Arc::new(GradioTryOnClient::new(config.space.clone()));

    let state = handlers::AppState {
        tryon,
        publisher,
        file_base_url: config.space.base_url.clone(),
    };

    let app = app(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("TryMe backend listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
