//! `/api/recipients`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use blood_bank_core::analytics::RecipientStats;
use blood_bank_core::models::NewRecipient;
use serde_json::{json, Value};

use super::{run, AppState};
use crate::error::ApiError;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewRecipient>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    let recipient = run(&state, move |core| core.create_recipient(payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "recipient": recipient })),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let recipients = run(&state, |core| core.list_recipients()).await?;
    Ok(Json(json!({ "success": true, "recipients": recipients })))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<RecipientStats>, ApiError> {
    Ok(Json(run(&state, |core| core.recipient_stats()).await?))
}

pub async fn top_groups(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let top = run(&state, |core| core.top_requested_groups()).await?;
    Ok(Json(json!({ "topGroups": top })))
}
