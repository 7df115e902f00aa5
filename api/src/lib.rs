use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::{
    core::app_state::{AppState, api_address},
    error_handler::AppError,
    routes::{generate::generate_route::generate, health_route::health, refine::refine_route::refine},
};

/// Builds the HTTP router. `/refine` is only mounted for variants that serve it.
pub fn build_router(state: AppState) -> Router {
    let serves_refine = state.serves_refine();
    let state = Arc::new(state);

    let mut router = Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health));
    if serves_refine {
        router = router.route("/refine", post(refine));
    }

    router.layer(cors_layer()).with_state(state)
}

/// Any origin may call the API (game clients run on arbitrary hosts).
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Serves on `API_ADDRESS` until Ctrl+C.
pub async fn start(state: AppState) -> Result<(), AppError> {
    let addr = api_address();
    let variant = state.variant();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, %variant, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("Server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
