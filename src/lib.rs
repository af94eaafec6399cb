// src/lib.rs

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod routes;

pub use config::Config;
pub use engine::AllocationSession;
pub use error::AllocationError;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<AllocationSession>,
}

/// Sidecar router driven by the hosting app shell.
pub fn router(state: AppState) -> Router {
    // The shell talks to us over loopback; keep CORS open for its webview.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health
        .route("/health", get(routes::health::health))
        // lifecycle
        .route("/api/v1/focus", post(routes::lifecycle::focus))
        .route("/api/v1/blur", post(routes::lifecycle::blur))
        // targets
        .route("/api/v1/targets", get(routes::targets::get_targets))
        .route("/api/v1/targets/refresh", post(routes::targets::refresh_targets))
        .route("/api/v1/bucket", put(routes::targets::set_bucket))
        // selection
        .route(
            "/api/v1/selection",
            axum::routing::delete(routes::selection::clear_selection),
        )
        .route("/api/v1/selection/toggle", post(routes::selection::toggle_item))
        .route("/api/v1/selection/all", post(routes::selection::toggle_all))
        // officers
        .route("/api/v1/officers", get(routes::officers::list_officers))
        .route("/api/v1/assignee", put(routes::officers::choose_assignee))
        // pass
        .route("/api/v1/pass/prepare", post(routes::pass::prepare_pass))
        .route("/api/v1/pass/confirm", post(routes::pass::confirm_pass))
        .route("/api/v1/pass/cancel", post(routes::pass::cancel_pass))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
