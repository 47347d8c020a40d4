// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use handlers::{admin, agents, demo, raw};
pub use state::AppState;

/// Builds the coordinator router
///
/// Unmatched paths go to the static directory when one is configured and to
/// the raw payload generator otherwise.
pub fn router(state: AppState, config: &Config) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health check
        .route("/health", get(admin::health_check))
        // Agent round trips
        .route("/demo/string", post(demo::push_state))
        .route("/demo/hash", post(demo::echo_state))
        // Command producer
        .route("/demo/command", post(demo::queue_command))
        // Inspection
        .route("/agents", get(agents::list_agents))
        .route("/agents/:name/command", get(agents::get_command))
        .route("/agents/:name/state", get(agents::get_last_push))
        // Administration
        .route("/admin/mailbox", delete(admin::flush_mailbox));

    let app = match &config.www_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.fallback(raw::raw_data),
    };

    app
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_payload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
