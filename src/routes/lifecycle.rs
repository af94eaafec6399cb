// src/routes/lifecycle.rs

use axum::{extract::State, Json};

use super::{error_response, ApiResult};
use crate::{engine::SessionView, AppState};

/// POST /api/v1/focus
pub async fn focus(State(state): State<AppState>) -> ApiResult<SessionView> {
    let view = state.session.focus().await.map_err(error_response)?;
    Ok(Json(view))
}

/// POST /api/v1/blur
pub async fn blur(State(state): State<AppState>) -> Json<SessionView> {
    state.session.blur().await;
    Json(state.session.view().await)
}
