//! Blood Bank Core Library
//!
//! Record store and analytics for a blood bank: donors, recipients,
//! donations, requests and transfusions.
//!
//! # Architecture
//!
//! ```text
//!   REST handlers ──► BloodBankCore ──► Database (SQLite)
//!                          │
//!                          ├──► analytics   compatibility, expiry, aggregates
//!                          │
//!                          └──► dashboard   report + chart registry
//! ```
//!
//! # Core Principle
//!
//! **Derived values are never stored.** Expiry buckets, shortages and stats
//! are recomputed from a snapshot of the records on every call. The only
//! derived value persisted is a transfusion's status, fixed when it is
//! recorded.
//!
//! # Modules
//!
//! - [`db`]: SQLite record store
//! - [`models`]: Domain types (Donor, Donation, BloodRequest, etc.)
//! - [`analytics`]: Pure compatibility, expiry and aggregation functions
//! - [`dashboard`]: Dashboard report and chart datasets

pub mod analytics;
pub mod dashboard;
pub mod db;
pub mod models;

// Re-export commonly used types
pub use analytics::{ExpiryReport, TransfusionPolicy};
pub use dashboard::{ChartRegistry, DashboardReport};
pub use db::{Database, DonorFilter};
pub use models::{
    BloodGroup, BloodRequest, Donation, Donor, Gender, Recipient, RequestStatus, Transfusion,
    TransfusionStatus,
};

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use analytics::{BloodGroupCount, RecipientStats, RequestStats, ShortageAlert, TransfusionStats};
use dashboard::RecordSnapshot;
use models::{NewDonation, NewDonor, NewRecipient, NewRequest, NewTransfusion, ValidationError};

/// Blood groups shown by the "top groups" panel.
pub const TOP_GROUP_LIMIT: usize = 3;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum BloodBankError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type BloodBankResult<T> = Result<T, BloodBankError>;

impl From<db::DbError> for BloodBankError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::Constraint(msg) => BloodBankError::Validation(msg),
            other => BloodBankError::Database(other.to_string()),
        }
    }
}

impl From<ValidationError> for BloodBankError {
    fn from(e: ValidationError) -> Self {
        BloodBankError::Validation(e.0)
    }
}

impl From<serde_json::Error> for BloodBankError {
    fn from(e: serde_json::Error) -> Self {
        BloodBankError::Serialization(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for BloodBankError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        BloodBankError::Database(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Settings
// =========================================================================

/// Creation-time rules applied by the facade.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreSettings {
    /// Donors must live in a city containing this text (case-insensitive)
    pub accepted_city: Option<String>,
    /// How a recorded transfusion's status is derived
    pub policy: TransfusionPolicy,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            accepted_city: Some("Lahore".to_string()),
            policy: TransfusionPolicy::default(),
        }
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe facade over the record store.
#[derive(Clone)]
pub struct BloodBankCore {
    db: Arc<Mutex<Database>>,
    settings: Arc<CoreSettings>,
}

impl BloodBankCore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, settings: CoreSettings) -> BloodBankResult<Self> {
        let db = Database::open(path)?;
        Ok(Self::with_database(db, settings))
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory(settings: CoreSettings) -> BloodBankResult<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::with_database(db, settings))
    }

    fn with_database(db: Database, settings: CoreSettings) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    // =========================================================================
    // Donor Operations
    // =========================================================================

    /// Validate and register a donor.
    pub fn register_donor(&self, payload: NewDonor) -> BloodBankResult<Donor> {
        let donor = payload.into_donor()?;

        if let Some(city) = self.settings.accepted_city.as_deref() {
            if !donor.city.to_lowercase().contains(&city.to_lowercase()) {
                warn!(city = %donor.city, "donor rejected outside service city");
                return Err(BloodBankError::Validation(format!(
                    "Only donors from {} are accepted.",
                    city
                )));
            }
        }

        let db = self.db.lock()?;
        db.insert_donor(&donor)?;
        info!(donor_id = %donor.id, blood_group = %donor.blood_group, "registered donor");
        Ok(donor)
    }

    /// Get a donor by ID.
    pub fn get_donor(&self, id: &str) -> BloodBankResult<Option<Donor>> {
        let db = self.db.lock()?;
        Ok(db.get_donor(id)?)
    }

    /// Search donors; an empty filter lists everyone.
    pub fn search_donors(&self, filter: &DonorFilter) -> BloodBankResult<Vec<Donor>> {
        let db = self.db.lock()?;
        Ok(db.search_donors(filter)?)
    }

    /// Donors with coordinates in the service city (every city when unrestricted).
    pub fn map_donors(&self) -> BloodBankResult<Vec<Donor>> {
        let db = self.db.lock()?;
        let city = self.settings.accepted_city.as_deref().unwrap_or("");
        Ok(db.list_mappable_donors(city)?)
    }

    // =========================================================================
    // Recipient Operations
    // =========================================================================

    pub fn create_recipient(&self, payload: NewRecipient) -> BloodBankResult<Recipient> {
        let recipient = payload.into_recipient()?;
        let db = self.db.lock()?;
        db.insert_recipient(&recipient)?;
        info!(recipient_id = %recipient.id, "created recipient");
        Ok(recipient)
    }

    pub fn list_recipients(&self) -> BloodBankResult<Vec<Recipient>> {
        let db = self.db.lock()?;
        Ok(db.list_recipients()?)
    }

    pub fn recipient_stats(&self) -> BloodBankResult<RecipientStats> {
        let recipients = self.list_recipients()?;
        Ok(analytics::recipient_stats(&recipients))
    }

    /// Most requested blood groups.
    pub fn top_requested_groups(&self) -> BloodBankResult<Vec<BloodGroupCount>> {
        let requests = self.list_requests()?;
        Ok(analytics::top_requested_blood_groups(&requests, TOP_GROUP_LIMIT))
    }

    // =========================================================================
    // Donation Operations
    // =========================================================================

    /// Record a donation; the blood group comes from the donor.
    pub fn record_donation(&self, payload: NewDonation) -> BloodBankResult<Donation> {
        let db = self.db.lock()?;
        let donor = db
            .get_donor(&payload.donor_id)?
            .ok_or_else(|| BloodBankError::NotFound(format!("Donor {}", payload.donor_id)))?;

        let donation = payload.into_donation(&donor)?;
        db.insert_donation(&donation)?;
        info!(
            donation_id = %donation.id,
            donor_id = %donor.id,
            expiry_date = %donation.expiry_date,
            "recorded donation"
        );
        Ok(donation)
    }

    pub fn list_donations(&self) -> BloodBankResult<Vec<Donation>> {
        let db = self.db.lock()?;
        Ok(db.list_donations()?)
    }

    pub fn delete_donation(&self, id: &str) -> BloodBankResult<()> {
        let db = self.db.lock()?;
        if !db.delete_donation(id)? {
            return Err(BloodBankError::NotFound(format!("Donation {}", id)));
        }
        info!(donation_id = %id, "deleted donation");
        Ok(())
    }

    /// Donations expiring soon or already expired at `reference`.
    pub fn expiry_report(&self, reference: DateTime<Utc>) -> BloodBankResult<ExpiryReport> {
        let donations = self.list_donations()?;
        Ok(analytics::classify(&donations, reference))
    }

    // =========================================================================
    // Request Operations
    // =========================================================================

    /// Create a request; the blood group defaults to the recipient's.
    pub fn create_request(&self, payload: NewRequest) -> BloodBankResult<BloodRequest> {
        let db = self.db.lock()?;
        let recipient = db.get_recipient(&payload.recipient_id)?.ok_or_else(|| {
            BloodBankError::NotFound(format!("Recipient {}", payload.recipient_id))
        })?;

        let request = payload.into_request(&recipient)?;
        db.insert_request(&request)?;
        info!(
            request_id = %request.id,
            blood_group = %request.blood_group,
            quantity = request.quantity,
            "created request"
        );
        Ok(request)
    }

    pub fn list_requests(&self) -> BloodBankResult<Vec<BloodRequest>> {
        let db = self.db.lock()?;
        Ok(db.list_requests()?)
    }

    pub fn pending_requests(&self) -> BloodBankResult<Vec<BloodRequest>> {
        let db = self.db.lock()?;
        Ok(db.list_requests_by_status(RequestStatus::Pending)?)
    }

    pub fn update_request_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> BloodBankResult<BloodRequest> {
        let db = self.db.lock()?;
        if !db.update_request_status(id, status)? {
            return Err(BloodBankError::NotFound(format!("Request {}", id)));
        }
        info!(request_id = %id, status = %status, "updated request status");
        db.get_request(id)?
            .ok_or_else(|| BloodBankError::NotFound(format!("Request {}", id)))
    }

    pub fn request_stats(&self) -> BloodBankResult<RequestStats> {
        let requests = self.list_requests()?;
        Ok(analytics::request_stats(&requests))
    }

    pub fn shortage_alerts(&self) -> BloodBankResult<Vec<ShortageAlert>> {
        let db = self.db.lock()?;
        let requests = db.list_requests()?;
        let donations = db.list_donations()?;
        Ok(analytics::shortage_alerts(&requests, &donations))
    }

    // =========================================================================
    // Transfusion Operations
    // =========================================================================

    /// Record a transfusion, deriving its status from the transfusion policy.
    pub fn record_transfusion(&self, payload: NewTransfusion) -> BloodBankResult<Transfusion> {
        let transfused_at = payload.transfused_at()?;

        let db = self.db.lock()?;
        let donor = db
            .get_donor(&payload.donor_id)?
            .ok_or_else(|| BloodBankError::NotFound("Donor or Recipient not found".into()))?;
        let recipient = db
            .get_recipient(&payload.recipient_id)?
            .ok_or_else(|| BloodBankError::NotFound("Donor or Recipient not found".into()))?;

        let donations = db.list_donations_for_donor(&donor.id)?;
        let status = self
            .settings
            .policy
            .evaluate(&donor, &recipient, &donations, Utc::now());

        let transfusion = Transfusion::new(&donor, &recipient, transfused_at, status);
        db.insert_transfusion(&transfusion)?;
        info!(
            transfusion_id = %transfusion.id,
            donor_group = %donor.blood_group,
            recipient_group = %recipient.blood_group,
            status = status.label(),
            "recorded transfusion"
        );
        Ok(transfusion)
    }

    pub fn list_transfusions(&self) -> BloodBankResult<Vec<Transfusion>> {
        let db = self.db.lock()?;
        Ok(db.list_transfusions()?)
    }

    pub fn transfusion_stats(&self) -> BloodBankResult<TransfusionStats> {
        let transfusions = self.list_transfusions()?;
        Ok(analytics::transfusion_stats(&transfusions))
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Build the dashboard report from a consistent snapshot.
    pub fn dashboard(&self, reference: DateTime<Utc>) -> BloodBankResult<DashboardReport> {
        let snapshot = {
            let db = self.db.lock()?;
            RecordSnapshot::load(&db)?
        };
        Ok(DashboardReport::build(&snapshot, reference))
    }

    /// Render the dashboard's charts into `registry`.
    pub fn dashboard_charts(
        &self,
        reference: DateTime<Utc>,
        registry: &mut ChartRegistry,
    ) -> BloodBankResult<()> {
        let report = self.dashboard(reference)?;
        dashboard::render_charts(&report, registry);
        Ok(())
    }
}
