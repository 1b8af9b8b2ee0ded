//! REST routes under `/api`.

mod dashboard;
mod donations;
mod donors;
mod recipients;
mod requests;
mod transfusions;

use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use blood_bank_core::{BloodBankCore, BloodBankResult, BloodGroup, ChartRegistry};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub core: BloodBankCore,
    /// Live dashboard charts, one per chart id
    pub charts: Arc<Mutex<ChartRegistry>>,
}

impl AppState {
    pub fn new(core: BloodBankCore) -> Self {
        Self {
            core,
            charts: Arc::new(Mutex::new(ChartRegistry::new())),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health))
        .route("/api/donors", post(donors::create).get(donors::list))
        .route("/api/donors/map", get(donors::map))
        .route("/api/donors/:id", get(donors::get_one))
        .route("/api/recipients", post(recipients::create).get(recipients::list))
        .route("/api/recipients/stats", get(recipients::stats))
        .route("/api/recipients/top-groups", get(recipients::top_groups))
        .route("/api/donations", post(donations::create).get(donations::list))
        .route("/api/donations/expiry", get(donations::expiry))
        .route("/api/donations/:id", delete(donations::remove))
        .route("/api/requests", post(requests::create).get(requests::list))
        .route("/api/requests/stats", get(requests::stats))
        .route("/api/requests/pending", get(requests::pending))
        .route("/api/requests/shortage-alerts", get(requests::shortage_alerts))
        .route("/api/requests/:id/status", patch(requests::update_status))
        .route("/api/transfusions", post(transfusions::create).get(transfusions::list))
        .route("/api/transfusions/stats", get(transfusions::stats))
        .route("/api/compatibility", get(dashboard::compatibility))
        .route("/api/dashboard", get(dashboard::report))
        .route("/api/dashboard/charts", get(dashboard::charts))
        .layer(cors)
        .with_state(state)
}

async fn banner() -> &'static str {
    "Blood Bank API is running"
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run a blocking core call on the blocking pool.
async fn run<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&BloodBankCore) -> BloodBankResult<T> + Send + 'static,
    T: Send + 'static,
{
    let core = state.core.clone();
    Ok(tokio::task::spawn_blocking(move || f(&core)).await??)
}

/// Parse a blood group taken from a query string.
///
/// An unencoded `+` arrives as a space, so `"A "` reads as `A+`.
fn query_blood_group(raw: &str) -> Option<BloodGroup> {
    raw.parse()
        .or_else(|_| raw.trim_start().replace(' ', "+").parse())
        .ok()
}
