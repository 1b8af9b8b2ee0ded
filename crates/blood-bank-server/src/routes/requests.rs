//! `/api/requests`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use blood_bank_core::analytics::RequestStats;
use blood_bank_core::models::NewRequest;
use blood_bank_core::RequestStatus;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{run, AppState};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    let request = run(&state, move |core| core.create_request(payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "request": request })),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let requests = run(&state, |core| core.list_requests()).await?;
    Ok(Json(json!({ "success": true, "requests": requests })))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<RequestStats>, ApiError> {
    Ok(Json(run(&state, |core| core.request_stats()).await?))
}

pub async fn pending(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pending = run(&state, |core| core.pending_requests()).await?;
    Ok(Json(json!({ "pendingRequests": pending })))
}

pub async fn shortage_alerts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let shortages = run(&state, |core| core.shortage_alerts()).await?;
    Ok(Json(json!({ "shortages": shortages })))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(update) = payload?;
    let status: RequestStatus = update
        .status
        .parse()
        .map_err(|e: blood_bank_core::models::ValidationError| ApiError::BadRequest(e.0))?;

    let request = run(&state, move |core| core.update_request_status(&id, status)).await?;
    Ok(Json(json!({ "success": true, "request": request })))
}
