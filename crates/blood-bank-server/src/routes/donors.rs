//! `/api/donors`

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use blood_bank_core::models::NewDonor;
use blood_bank_core::{Donor, DonorFilter};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{query_blood_group, run, AppState};
use crate::error::ApiError;

/// `?name&bloodGroup&city`; blank values are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorQuery {
    pub name: Option<String>,
    pub blood_group: Option<String>,
    pub city: Option<String>,
}

impl DonorQuery {
    fn into_filter(self) -> Result<DonorFilter, ApiError> {
        let blood_group = match self.blood_group.as_deref().filter(|g| !g.trim().is_empty()) {
            Some(raw) => Some(
                query_blood_group(raw)
                    .ok_or_else(|| ApiError::BadRequest(format!("Unknown blood group: {}", raw)))?,
            ),
            None => None,
        };

        Ok(DonorFilter {
            name: self.name.filter(|n| !n.trim().is_empty()),
            blood_group,
            city: self.city.filter(|c| !c.trim().is_empty()),
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewDonor>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;
    let donor = run(&state, move |core| core.register_donor(payload)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "donor": donor }))))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<DonorQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let donors = run(&state, move |core| core.search_donors(&filter)).await?;
    Ok(Json(json!({ "success": true, "donors": donors })))
}

/// Donors with coordinates in the service city, as a bare array.
pub async fn map(State(state): State<AppState>) -> Result<Json<Vec<Donor>>, ApiError> {
    let donors = run(&state, |core| core.map_donors()).await?;
    Ok(Json(donors))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let lookup = id.clone();
    let donor = run(&state, move |core| core.get_donor(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Donor {} not found", id)))?;
    Ok(Json(json!({ "success": true, "donor": donor })))
}
