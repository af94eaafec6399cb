// src/routes/pass.rs

use axum::{extract::State, Json};

use super::{error_response, ApiResult};
use crate::{
    engine::{pass::ConfirmationSummary, PassReceipt, SessionView},
    AppState,
};

/// POST /api/v1/pass/prepare
pub async fn prepare_pass(State(state): State<AppState>) -> ApiResult<ConfirmationSummary> {
    let summary = state.session.prepare_pass().await.map_err(error_response)?;
    Ok(Json(summary))
}

/// POST /api/v1/pass/confirm
pub async fn confirm_pass(State(state): State<AppState>) -> ApiResult<PassReceipt> {
    let receipt = state.session.confirm_pass().await.map_err(error_response)?;
    Ok(Json(receipt))
}

/// POST /api/v1/pass/cancel
pub async fn cancel_pass(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.cancel_pass().await)
}
