//! Count and rate reducers over record snapshots.
//!
//! Every reducer is total: empty input yields a zero-valued result, and
//! records with unparseable dates are left out of date-based figures only.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::round2;
use crate::models::{
    BloodGroup, BloodRequest, Donation, Donor, Gender, Recipient, RequestStatus, Transfusion,
    TransfusionStatus,
};

/// Records that carry a gender.
pub trait HasGender {
    fn gender(&self) -> Gender;
}

/// Records that carry a blood group.
pub trait HasBloodGroup {
    fn blood_group(&self) -> BloodGroup;
}

impl HasGender for Donor {
    fn gender(&self) -> Gender {
        self.gender
    }
}

impl HasGender for Recipient {
    fn gender(&self) -> Gender {
        self.gender
    }
}

macro_rules! impl_has_blood_group {
    ($($ty:ty),*) => {
        $(impl HasBloodGroup for $ty {
            fn blood_group(&self) -> BloodGroup {
                self.blood_group
            }
        })*
    };
}

impl_has_blood_group!(Donor, Recipient, Donation, BloodRequest, Transfusion);

// =========================================================================
// Categorical counts
// =========================================================================

/// Gender tally with every key present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

pub fn count_by_gender<T: HasGender>(people: &[T]) -> GenderCounts {
    people.iter().fold(GenderCounts::default(), |mut acc, person| {
        match person.gender() {
            Gender::Male => acc.male += 1,
            Gender::Female => acc.female += 1,
            Gender::Other => acc.other += 1,
        }
        acc
    })
}

/// Blood group tally; only groups that occur get a key.
pub fn count_by_blood_group<T: HasBloodGroup>(records: &[T]) -> BTreeMap<BloodGroup, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.blood_group()).or_insert(0) += 1;
    }
    counts
}

/// Request status tally; only statuses that occur get a key.
pub fn count_by_request_status(requests: &[BloodRequest]) -> BTreeMap<RequestStatus, usize> {
    let mut counts = BTreeMap::new();
    for request in requests {
        *counts.entry(request.status).or_insert(0) += 1;
    }
    counts
}

/// Recipient gender and blood-group breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientStats {
    pub gender_count: GenderCounts,
    pub blood_group_count: BTreeMap<BloodGroup, usize>,
}

pub fn recipient_stats(recipients: &[Recipient]) -> RecipientStats {
    RecipientStats {
        gender_count: count_by_gender(recipients),
        blood_group_count: count_by_blood_group(recipients),
    }
}

// =========================================================================
// Rates
// =========================================================================

/// Percentage of requests fulfilled, 2 decimals; 0 for no requests.
pub fn fulfillment_rate(requests: &[BloodRequest]) -> f64 {
    if requests.is_empty() {
        return 0.0;
    }
    let fulfilled = requests.iter().filter(|r| r.is_fulfilled()).count();
    round2(fulfilled as f64 / requests.len() as f64 * 100.0)
}

/// Donations per calendar month across the dated span, 2 decimals.
///
/// The span counts both end months, so donations within one month give a
/// span of 1. The numerator is the full donation count.
pub fn average_monthly_donation_frequency(donations: &[Donation]) -> f64 {
    let dates: Vec<DateTime<Utc>> = donations.iter().filter_map(|d| d.donated_at()).collect();

    let (Some(earliest), Some(latest)) = (dates.iter().min(), dates.iter().max()) else {
        return 0.0;
    };

    let months = (latest.year() - earliest.year()) * 12
        + (latest.month() as i32 - earliest.month() as i32)
        + 1;
    round2(donations.len() as f64 / f64::from(months.max(1)))
}

// =========================================================================
// Shortages
// =========================================================================

/// A blood group with more requests than donations on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageAlert {
    pub blood_group: BloodGroup,
    pub requested: usize,
    pub available: usize,
}

/// Groups whose request count exceeds their donation count, in the order
/// each group first appears among the requests.
pub fn shortage_alerts(requests: &[BloodRequest], donations: &[Donation]) -> Vec<ShortageAlert> {
    let requested = counts_in_first_seen_order(requests);

    let mut available: HashMap<BloodGroup, usize> = HashMap::new();
    for donation in donations {
        *available.entry(donation.blood_group).or_insert(0) += 1;
    }

    requested
        .into_iter()
        .filter_map(|(blood_group, requested)| {
            let available = available.get(&blood_group).copied().unwrap_or(0);
            (requested > available).then_some(ShortageAlert {
                blood_group,
                requested,
                available,
            })
        })
        .collect()
}

/// A blood group and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupCount {
    pub blood_group: BloodGroup,
    pub count: usize,
}

/// The `limit` most requested groups, most frequent first; ties keep
/// first-seen order.
pub fn top_requested_blood_groups(requests: &[BloodRequest], limit: usize) -> Vec<BloodGroupCount> {
    let mut counts = counts_in_first_seen_order(requests);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(blood_group, count)| BloodGroupCount { blood_group, count })
        .collect()
}

fn counts_in_first_seen_order<T: HasBloodGroup>(records: &[T]) -> Vec<(BloodGroup, usize)> {
    let mut counts: Vec<(BloodGroup, usize)> = Vec::new();
    for record in records {
        let group = record.blood_group();
        match counts.iter_mut().find(|(g, _)| *g == group) {
            Some((_, n)) => *n += 1,
            None => counts.push((group, 1)),
        }
    }
    counts
}

// =========================================================================
// Stats payloads
// =========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfusionStats {
    pub total_transfusions: usize,
    pub success: usize,
    pub failure: usize,
}

pub fn transfusion_stats(transfusions: &[Transfusion]) -> TransfusionStats {
    transfusions
        .iter()
        .fold(TransfusionStats::default(), |mut acc, t| {
            acc.total_transfusions += 1;
            match t.status {
                TransfusionStatus::Successful => acc.success += 1,
                TransfusionStatus::Failed => acc.failure += 1,
            }
            acc
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub total_requests: usize,
    /// Every status is present, zero when unseen
    pub status_count: BTreeMap<RequestStatus, usize>,
    pub fulfillment_rate: f64,
}

pub fn request_stats(requests: &[BloodRequest]) -> RequestStats {
    let mut status_count: BTreeMap<RequestStatus, usize> =
        RequestStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for (status, count) in count_by_request_status(requests) {
        status_count.insert(status, count);
    }

    RequestStats {
        total_requests: requests.len(),
        status_count,
        fulfillment_rate: fulfillment_rate(requests),
    }
}

// =========================================================================
// Donation timelines
// =========================================================================

/// The `limit` newest donations, newest first. Undated ones sort last.
pub fn recent_donations(donations: &[Donation], limit: usize) -> Vec<Donation> {
    let mut sorted: Vec<&Donation> = donations.iter().collect();
    sorted.sort_by(|a, b| b.donated_at().cmp(&a.donated_at()));
    sorted.into_iter().take(limit).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Donations per UTC day for the `days` days ending on `reference`'s date,
/// oldest first.
pub fn daily_donation_counts(
    donations: &[Donation],
    reference: DateTime<Utc>,
    days: u32,
) -> Vec<DailyCount> {
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for at in donations.iter().filter_map(|d| d.donated_at()) {
        *per_day.entry(at.date_naive()).or_insert(0) += 1;
    }

    let today = reference.date_naive();
    (0..i64::from(days))
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DailyCount {
                date,
                count: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn donor(group: BloodGroup, gender: Gender) -> Donor {
        Donor::new("D".into(), "d@example.com".into(), group, gender, "Lahore".into())
    }

    fn recipient(group: BloodGroup) -> Recipient {
        Recipient::new("R".into(), group, Gender::Other, "Lahore".into())
    }

    fn request(group: BloodGroup, status: RequestStatus) -> BloodRequest {
        let mut r = BloodRequest::new(&recipient(group), 1);
        r.status = status;
        r
    }

    fn donation_on(group: BloodGroup, date: &str) -> Donation {
        let at: DateTime<Utc> = date.parse().unwrap();
        Donation::new(&donor(group, Gender::Male), at)
    }

    #[test]
    fn test_count_by_gender() {
        let empty: Vec<Donor> = vec![];
        assert_eq!(count_by_gender(&empty), GenderCounts::default());
        assert_eq!(
            serde_json::to_string(&count_by_gender(&empty)).unwrap(),
            r#"{"Male":0,"Female":0,"Other":0}"#
        );

        let donors = vec![
            donor(BloodGroup::APositive, Gender::Male),
            donor(BloodGroup::APositive, Gender::Female),
            donor(BloodGroup::BPositive, Gender::Male),
        ];
        let counts = count_by_gender(&donors);
        assert_eq!(counts.male, 2);
        assert_eq!(counts.female, 1);
        assert_eq!(counts.other, 0);
    }

    #[test]
    fn test_count_by_blood_group_is_lazy() {
        let empty: Vec<Recipient> = vec![];
        assert!(count_by_blood_group(&empty).is_empty());

        let recipients = vec![
            recipient(BloodGroup::AbNegative),
            recipient(BloodGroup::ONegative),
            recipient(BloodGroup::AbNegative),
        ];
        let counts = count_by_blood_group(&recipients);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&BloodGroup::AbNegative], 2);
        assert_eq!(counts[&BloodGroup::ONegative], 1);
        assert!(!counts.contains_key(&BloodGroup::BPositive));

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"O-":1,"AB-":2}"#);
    }

    #[test]
    fn test_recipient_stats() {
        let stats = recipient_stats(&[recipient(BloodGroup::BNegative)]);
        assert_eq!(stats.gender_count.other, 1);
        assert_eq!(stats.blood_group_count[&BloodGroup::BNegative], 1);

        let json = serde_json::to_string(&recipient_stats(&[])).unwrap();
        assert_eq!(
            json,
            r#"{"genderCount":{"Male":0,"Female":0,"Other":0},"bloodGroupCount":{}}"#
        );
    }

    #[test]
    fn test_count_by_request_status() {
        let requests = vec![
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Cancelled),
        ];
        let counts = count_by_request_status(&requests);
        assert_eq!(counts[&RequestStatus::Pending], 2);
        assert_eq!(counts[&RequestStatus::Cancelled], 1);
        assert!(!counts.contains_key(&RequestStatus::Fulfilled));
    }

    #[test]
    fn test_fulfillment_rate() {
        assert_eq!(fulfillment_rate(&[]), 0.0);

        let requests = vec![
            request(BloodGroup::APositive, RequestStatus::Fulfilled),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Cancelled),
        ];
        assert_eq!(fulfillment_rate(&requests), 25.0);

        let thirds = vec![
            request(BloodGroup::APositive, RequestStatus::Fulfilled),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Pending),
        ];
        assert_eq!(fulfillment_rate(&thirds), 33.33);
    }

    #[test]
    fn test_average_monthly_frequency() {
        assert_eq!(average_monthly_donation_frequency(&[]), 0.0);

        let donations = vec![
            donation_on(BloodGroup::APositive, "2024-01-03T10:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-01-20T10:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-02-11T10:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-02-12T10:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-03-01T10:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-03-31T10:00:00Z"),
        ];
        assert_eq!(average_monthly_donation_frequency(&donations), 2.0);
    }

    #[test]
    fn test_average_monthly_frequency_single_month_and_year_wrap() {
        let one = vec![donation_on(BloodGroup::APositive, "2024-05-05T00:00:00Z")];
        assert_eq!(average_monthly_donation_frequency(&one), 1.0);

        let wrap = vec![
            donation_on(BloodGroup::APositive, "2023-12-30T00:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-01-02T00:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-01-03T00:00:00Z"),
        ];
        assert_eq!(average_monthly_donation_frequency(&wrap), 1.5);
    }

    #[test]
    fn test_average_monthly_frequency_invalid_dates() {
        let mut broken = donation_on(BloodGroup::APositive, "2024-05-05T00:00:00Z");
        broken.donation_date = "??".into();
        assert_eq!(average_monthly_donation_frequency(&[broken.clone()]), 0.0);

        // Undated donations still count toward the total.
        let dated = donation_on(BloodGroup::APositive, "2024-05-06T00:00:00Z");
        assert_eq!(average_monthly_donation_frequency(&[broken, dated]), 2.0);
    }

    #[test]
    fn test_shortage_alerts() {
        let requests = vec![
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::ONegative, RequestStatus::Pending),
        ];
        let donations = vec![donation_on(BloodGroup::APositive, "2024-05-05T00:00:00Z")];

        let shortages = shortage_alerts(&requests, &donations);
        assert_eq!(
            shortages,
            vec![
                ShortageAlert {
                    blood_group: BloodGroup::APositive,
                    requested: 2,
                    available: 1,
                },
                ShortageAlert {
                    blood_group: BloodGroup::ONegative,
                    requested: 1,
                    available: 0,
                },
            ]
        );
        assert!(shortages.iter().all(|s| s.blood_group != BloodGroup::BPositive));
    }

    #[test]
    fn test_shortage_alerts_excludes_covered_groups() {
        let requests = vec![request(BloodGroup::BNegative, RequestStatus::Pending)];
        let donations = vec![
            donation_on(BloodGroup::BNegative, "2024-05-05T00:00:00Z"),
            donation_on(BloodGroup::AbPositive, "2024-05-05T00:00:00Z"),
        ];
        assert!(shortage_alerts(&requests, &donations).is_empty());
        assert!(shortage_alerts(&[], &donations).is_empty());
    }

    #[test]
    fn test_shortage_alert_json() {
        let alert = ShortageAlert {
            blood_group: BloodGroup::APositive,
            requested: 2,
            available: 1,
        };
        assert_eq!(
            serde_json::to_string(&alert).unwrap(),
            r#"{"bloodGroup":"A+","requested":2,"available":1}"#
        );
    }

    #[test]
    fn test_top_requested_blood_groups() {
        let requests = vec![
            request(BloodGroup::BPositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::APositive, RequestStatus::Pending),
            request(BloodGroup::ONegative, RequestStatus::Pending),
        ];
        let top = top_requested_blood_groups(&requests, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].blood_group, BloodGroup::APositive);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[1].blood_group, BloodGroup::BPositive);
    }

    #[test]
    fn test_transfusion_stats() {
        assert_eq!(transfusion_stats(&[]), TransfusionStats::default());

        let d = donor(BloodGroup::ONegative, Gender::Male);
        let r = recipient(BloodGroup::APositive);
        let transfusions = vec![
            Transfusion::new(&d, &r, Utc::now(), TransfusionStatus::Successful),
            Transfusion::new(&d, &r, Utc::now(), TransfusionStatus::Failed),
            Transfusion::new(&d, &r, Utc::now(), TransfusionStatus::Successful),
        ];
        let stats = transfusion_stats(&transfusions);
        assert_eq!(stats.total_transfusions, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.failure, 1);
    }

    #[test]
    fn test_request_stats_preseeded() {
        let stats = request_stats(&[]);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.status_count.len(), 3);
        assert!(stats.status_count.values().all(|c| *c == 0));
        assert_eq!(stats.fulfillment_rate, 0.0);

        let stats = request_stats(&[request(BloodGroup::APositive, RequestStatus::Fulfilled)]);
        assert_eq!(stats.status_count[&RequestStatus::Fulfilled], 1);
        assert_eq!(stats.status_count[&RequestStatus::Pending], 0);
        assert_eq!(stats.fulfillment_rate, 100.0);
    }

    #[test]
    fn test_recent_donations() {
        let mut broken = donation_on(BloodGroup::APositive, "2024-05-05T00:00:00Z");
        broken.donation_date = "".into();
        let old = donation_on(BloodGroup::APositive, "2024-01-01T00:00:00Z");
        let mid = donation_on(BloodGroup::APositive, "2024-03-01T00:00:00Z");
        let new = donation_on(BloodGroup::APositive, "2024-05-01T00:00:00Z");

        let recent = recent_donations(&[old.clone(), broken, new.clone(), mid.clone()], 3);
        assert_eq!(recent, vec![new, mid, old]);
    }

    #[test]
    fn test_daily_donation_counts() {
        let reference: DateTime<Utc> = "2024-05-10T18:00:00Z".parse().unwrap();
        let donations = vec![
            donation_on(BloodGroup::APositive, "2024-05-10T01:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-05-10T09:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-05-08T09:00:00Z"),
            donation_on(BloodGroup::APositive, "2024-04-01T09:00:00Z"),
        ];

        let days = daily_donation_counts(&donations, reference, 3);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 5, 8).unwrap());
        assert_eq!(days[0].count, 1);
        assert_eq!(days[1].count, 0);
        assert_eq!(days[2].count, 2);
    }

    fn any_group() -> impl Strategy<Value = BloodGroup> {
        prop::sample::select(BloodGroup::ALL.to_vec())
    }

    fn any_status() -> impl Strategy<Value = RequestStatus> {
        prop::sample::select(RequestStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_shortages_are_real(
            requested in prop::collection::vec(any_group(), 0..30),
            donated in prop::collection::vec(any_group(), 0..30),
        ) {
            let requests: Vec<BloodRequest> = requested
                .iter()
                .map(|g| request(*g, RequestStatus::Pending))
                .collect();
            let donations: Vec<Donation> = donated
                .iter()
                .map(|g| donation_on(*g, "2024-05-05T00:00:00Z"))
                .collect();

            let shortages = shortage_alerts(&requests, &donations);
            for alert in &shortages {
                prop_assert!(alert.requested > alert.available);
                prop_assert_eq!(alert.requested, requested.iter().filter(|g| **g == alert.blood_group).count());
                prop_assert_eq!(alert.available, donated.iter().filter(|g| **g == alert.blood_group).count());
            }
            let again = shortage_alerts(&requests, &donations);
            prop_assert_eq!(
                serde_json::to_string(&shortages).unwrap(),
                serde_json::to_string(&again).unwrap()
            );
        }

        #[test]
        fn prop_fulfillment_rate_bounded(statuses in prop::collection::vec(any_status(), 0..50)) {
            let requests: Vec<BloodRequest> = statuses
                .iter()
                .map(|s| request(BloodGroup::APositive, *s))
                .collect();
            let rate = fulfillment_rate(&requests);
            prop_assert!((0.0..=100.0).contains(&rate));

            let counts = count_by_request_status(&requests);
            prop_assert_eq!(counts.values().sum::<usize>(), requests.len());
        }
    }
}
