// src/routes/selection.rs

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{error_response, ApiResult};
use crate::{
    engine::{SessionView, ToggleOutcome},
    AppState,
};

#[derive(Deserialize)]
pub struct ToggleBody {
    pub item_id: i64,
    /// Revision the caller rendered; rejected if the feed moved on since.
    pub revision: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ToggleAllBody {
    pub revision: Option<String>,
}

#[derive(Serialize)]
pub struct ToggleResp {
    pub outcome: &'static str,
    pub view: SessionView,
}

pub async fn toggle_item(
    State(state): State<AppState>,
    Json(b): Json<ToggleBody>,
) -> ApiResult<ToggleResp> {
    let (outcome, view) = state
        .session
        .toggle(b.item_id, b.revision.as_deref())
        .await
        .map_err(error_response)?;
    let outcome = match outcome {
        ToggleOutcome::Added => "added",
        ToggleOutcome::Removed => "removed",
        ToggleOutcome::Ignored => "ignored",
    };
    Ok(Json(ToggleResp { outcome, view }))
}

pub async fn toggle_all(
    State(state): State<AppState>,
    body: Option<Json<ToggleAllBody>>,
) -> ApiResult<SessionView> {
    let b = body.map(|Json(b)| b).unwrap_or_default();
    let view = state
        .session
        .toggle_all(b.revision.as_deref())
        .await
        .map_err(error_response)?;
    Ok(Json(view))
}

pub async fn clear_selection(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.clear_selection().await)
}
