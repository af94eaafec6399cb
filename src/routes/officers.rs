// src/routes/officers.rs

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{error_response, ApiResult};
use crate::{models::AssignableOfficer, AppState};

#[derive(Deserialize)]
pub struct AssigneeBody {
    pub officer_id: i64,
}

// GET /api/v1/officers
pub async fn list_officers(State(state): State<AppState>) -> ApiResult<Vec<AssignableOfficer>> {
    let officers = state.session.load_officers().await.map_err(error_response)?;
    Ok(Json(officers))
}

// PUT /api/v1/assignee
pub async fn choose_assignee(
    State(state): State<AppState>,
    Json(b): Json<AssigneeBody>,
) -> ApiResult<AssignableOfficer> {
    let officer = state
        .session
        .choose_assignee(b.officer_id)
        .await
        .map_err(error_response)?;
    Ok(Json(officer))
}
