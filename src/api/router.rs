use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let api = Router::new()
        // Tracking
        .route("/track", post(handlers::addresses::track))
        .route("/addresses", get(handlers::addresses::list))
        // Raw history
        .route("/trades/:address", get(handlers::trades::by_address))
        .route("/history/:address", get(handlers::reports::history))
        // Analysis
        .route("/pnl/:address", get(handlers::reports::pnl))
        .route("/winrate/:address", get(handlers::reports::winrate));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
