//! Dashboard feed and the compatibility lookup.

use std::collections::BTreeMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use blood_bank_core::analytics::is_compatible;
use blood_bank_core::dashboard::ChartData;
use blood_bank_core::DashboardReport;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{query_blood_group, run, AppState};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct CompatibilityQuery {
    #[serde(default)]
    pub donor: String,
    #[serde(default)]
    pub recipient: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityAnswer {
    pub donor: String,
    pub recipient: String,
    pub compatible: bool,
}

/// Unknown groups are answered as incompatible rather than rejected.
pub async fn compatibility(
    query: Result<Query<CompatibilityQuery>, QueryRejection>,
) -> Result<Json<CompatibilityAnswer>, ApiError> {
    let Query(query) = query?;
    let compatible = match (query_blood_group(&query.donor), query_blood_group(&query.recipient)) {
        (Some(donor), Some(recipient)) => is_compatible(donor, recipient),
        _ => false,
    };

    Ok(Json(CompatibilityAnswer {
        donor: query.donor,
        recipient: query.recipient,
        compatible,
    }))
}

pub async fn report(State(state): State<AppState>) -> Result<Json<DashboardReport>, ApiError> {
    let report = run(&state, |core| core.dashboard(Utc::now())).await?;
    Ok(Json(report))
}

/// Re-render every chart into the shared registry and return them by id.
pub async fn charts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let registry = state.charts.clone();
    let charts = run(&state, move |core| {
        let mut registry = registry.lock()?;
        core.dashboard_charts(Utc::now(), &mut registry)?;
        Ok(registry
            .iter()
            .map(|(id, chart)| (id.to_string(), chart.clone()))
            .collect::<BTreeMap<String, ChartData>>())
    })
    .await?;

    Ok(Json(json!({ "success": true, "charts": charts })))
}
