pub mod handlers;
pub mod types;

use crate::{Result, config::Config, model::ModelHandle};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The model is loaded exactly once, before the listener accepts traffic.
    let model = ModelHandle::load(&config.model).await;
    if !model.is_ready() {
        warn!("Serving without a model; /predict will report it as not loaded");
    }

    let app = router(AppState::new(model), config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
