//! `/api/donations`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use blood_bank_core::models::NewDonation;
use blood_bank_core::ExpiryReport;
use chrono::Utc;
use serde_json::{json, Value};

use super::{run, AppState};
use crate::error::ApiError;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewDonation>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    let donation = run(&state, move |core| core.record_donation(payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "donation": donation })),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let donations = run(&state, |core| core.list_donations()).await?;
    Ok(Json(json!({ "success": true, "donations": donations })))
}

/// Expiring and expired donations as of now.
pub async fn expiry(State(state): State<AppState>) -> Result<Json<ExpiryReport>, ApiError> {
    let report = run(&state, |core| core.expiry_report(Utc::now())).await?;
    Ok(Json(report))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |core| core.delete_donation(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
