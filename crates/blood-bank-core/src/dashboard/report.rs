//! Dashboard report assembled from a snapshot of every record kind.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{
    self, DailyCount, ExpiryReport, GenderCounts, RequestStats, ShortageAlert, TransfusionStats,
};
use crate::db::{Database, DbResult};
use crate::models::{
    BloodGroup, BloodRequest, Donation, Donor, Recipient, RequestStatus, Transfusion,
};

/// How many donations the "recent" panel shows.
pub const RECENT_DONATION_LIMIT: usize = 5;

/// Days covered by the donation heatmap.
pub const HEATMAP_DAYS: u32 = 30;

/// Every record in the store, read in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    pub donors: Vec<Donor>,
    pub recipients: Vec<Recipient>,
    pub donations: Vec<Donation>,
    pub requests: Vec<BloodRequest>,
    pub transfusions: Vec<Transfusion>,
}

impl RecordSnapshot {
    /// Read all records from the database.
    pub fn load(db: &Database) -> DbResult<Self> {
        Ok(Self {
            donors: db.list_donors()?,
            recipients: db.list_recipients()?,
            donations: db.list_donations()?,
            requests: db.list_requests()?,
            transfusions: db.list_transfusions()?,
        })
    }
}

/// Record totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub donors: usize,
    pub recipients: usize,
    pub donations: usize,
    pub requests: usize,
    pub transfusions: usize,
}

/// Everything the dashboard page displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Reference time the report was computed at
    pub generated_at: String,
    pub counters: Counters,
    pub donor_gender_count: GenderCounts,
    pub recipient_gender_count: GenderCounts,
    pub donor_blood_groups: BTreeMap<BloodGroup, usize>,
    pub donation_blood_groups: BTreeMap<BloodGroup, usize>,
    pub recipient_blood_groups: BTreeMap<BloodGroup, usize>,
    /// Only statuses that occur
    pub request_status_count: BTreeMap<RequestStatus, usize>,
    pub request_stats: RequestStats,
    pub transfusion_stats: TransfusionStats,
    pub expiry: ExpiryReport,
    pub average_monthly_donations: f64,
    pub shortages: Vec<ShortageAlert>,
    pub recent_donations: Vec<Donation>,
    pub donation_heatmap: Vec<DailyCount>,
}

impl DashboardReport {
    /// Compute the report for `snapshot` as seen at `reference`.
    ///
    /// Identical snapshots and reference times give identical reports.
    pub fn build(snapshot: &RecordSnapshot, reference: DateTime<Utc>) -> Self {
        let RecordSnapshot {
            donors,
            recipients,
            donations,
            requests,
            transfusions,
        } = snapshot;

        Self {
            generated_at: reference.to_rfc3339(),
            counters: Counters {
                donors: donors.len(),
                recipients: recipients.len(),
                donations: donations.len(),
                requests: requests.len(),
                transfusions: transfusions.len(),
            },
            donor_gender_count: analytics::count_by_gender(donors),
            recipient_gender_count: analytics::count_by_gender(recipients),
            donor_blood_groups: analytics::count_by_blood_group(donors),
            donation_blood_groups: analytics::count_by_blood_group(donations),
            recipient_blood_groups: analytics::count_by_blood_group(recipients),
            request_status_count: analytics::count_by_request_status(requests),
            request_stats: analytics::request_stats(requests),
            transfusion_stats: analytics::transfusion_stats(transfusions),
            expiry: analytics::classify(donations, reference),
            average_monthly_donations: analytics::average_monthly_donation_frequency(donations),
            shortages: analytics::shortage_alerts(requests, donations),
            recent_donations: analytics::recent_donations(donations, RECENT_DONATION_LIMIT),
            donation_heatmap: analytics::daily_donation_counts(donations, reference, HEATMAP_DAYS),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn snapshot() -> RecordSnapshot {
        let donor = Donor::new(
            "Bilal".into(),
            "bilal@example.com".into(),
            BloodGroup::APositive,
            Gender::Male,
            "Lahore".into(),
        );
        let recipient =
            Recipient::new("Hina".into(), BloodGroup::APositive, Gender::Female, "Lahore".into());

        let donations = vec![
            Donation::new(&donor, reference() - Duration::days(1)),
            Donation::new(&donor, reference() - Duration::days(38)),
            Donation::new(&donor, reference() - Duration::days(50)),
        ];

        let mut fulfilled = BloodRequest::new(&recipient, 1);
        fulfilled.status = RequestStatus::Fulfilled;
        let requests = vec![
            BloodRequest::new(&recipient, 2),
            fulfilled,
            BloodRequest::new(&recipient, 1),
            BloodRequest::new(&recipient, 1),
        ];

        let transfusions = vec![Transfusion::new(
            &donor,
            &recipient,
            reference(),
            crate::models::TransfusionStatus::Successful,
        )];

        RecordSnapshot {
            donors: vec![donor],
            recipients: vec![recipient],
            donations,
            requests,
            transfusions,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = DashboardReport::build(&RecordSnapshot::default(), reference());

        assert_eq!(report.counters, Counters::default());
        assert_eq!(report.donor_gender_count, GenderCounts::default());
        assert!(report.donor_blood_groups.is_empty());
        assert_eq!(report.request_stats.fulfillment_rate, 0.0);
        assert_eq!(report.average_monthly_donations, 0.0);
        assert_eq!(report.donation_heatmap.len(), HEATMAP_DAYS as usize);
        assert!(report.donation_heatmap.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_report_aggregates() {
        let report = DashboardReport::build(&snapshot(), reference());

        assert_eq!(report.counters.donations, 3);
        assert_eq!(report.counters.requests, 4);
        assert_eq!(report.donor_gender_count.male, 1);
        assert_eq!(report.recipient_gender_count.female, 1);
        assert_eq!(report.request_stats.fulfillment_rate, 25.0);
        assert_eq!(report.transfusion_stats.success, 1);
        assert_eq!(report.expiry.expiring.len(), 1);
        assert_eq!(report.expiry.expired.len(), 1);

        // 4 A+ requests against 3 A+ donations.
        assert_eq!(report.shortages.len(), 1);
        assert_eq!(report.shortages[0].requested, 4);
        assert_eq!(report.shortages[0].available, 3);

        assert_eq!(report.recent_donations.len(), 3);
        assert_eq!(report.donation_heatmap.last().unwrap().count, 0);
        assert_eq!(report.donation_heatmap[HEATMAP_DAYS as usize - 2].count, 1);
    }

    #[test]
    fn test_report_is_deterministic() {
        let snapshot = snapshot();
        let a = DashboardReport::build(&snapshot, reference()).to_json().unwrap();
        let b = DashboardReport::build(&snapshot, reference()).to_json().unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"donorGenderCount\""));
        assert!(a.contains("\"A+\": 1"));
    }

    #[test]
    fn test_load_snapshot() {
        let db = Database::open_in_memory().unwrap();
        let loaded = RecordSnapshot::load(&db).unwrap();
        assert_eq!(loaded, RecordSnapshot::default());
    }
}
