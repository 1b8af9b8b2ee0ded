//! `/api/transfusions`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use blood_bank_core::analytics::TransfusionStats;
use blood_bank_core::models::NewTransfusion;
use serde_json::{json, Value};

use super::{run, AppState};
use crate::error::ApiError;

/// Record a transfusion. Any client-sent status is ignored.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewTransfusion>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    let transfusion = run(&state, move |core| core.record_transfusion(payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "transfusion": transfusion })),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let transfusions = run(&state, |core| core.list_transfusions()).await?;
    Ok(Json(json!({ "success": true, "transfusions": transfusions })))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<TransfusionStats>, ApiError> {
    Ok(Json(run(&state, |core| core.transfusion_stats()).await?))
}
