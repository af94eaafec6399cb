// src/routes/health.rs

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Liveness plus enough session state for the shell to decide whether to focus.
#[derive(Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub version: &'static str,
    pub holder_officer_id: i64,
    pub feed_loaded: bool,
    pub submission_enabled: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    let view = state.session.view().await;
    Json(HealthResp {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        holder_officer_id: state.session.holder().id,
        feed_loaded: view.revision.is_some(),
        submission_enabled: view.submission_enabled,
    })
}
