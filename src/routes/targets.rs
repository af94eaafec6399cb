// src/routes/targets.rs

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{error_response, ApiResult};
use crate::{
    engine::{Bucket, SessionView},
    AppState,
};

#[derive(Deserialize)]
pub struct BucketBody {
    pub bucket: Bucket,
}

// GET /api/v1/targets
pub async fn get_targets(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.view().await)
}

// POST /api/v1/targets/refresh
pub async fn refresh_targets(State(state): State<AppState>) -> ApiResult<SessionView> {
    let view = state.session.refresh().await.map_err(error_response)?;
    Ok(Json(view))
}

// PUT /api/v1/bucket
pub async fn set_bucket(
    State(state): State<AppState>,
    Json(b): Json<BucketBody>,
) -> Json<SessionView> {
    Json(state.session.set_bucket(b.bucket).await)
}
