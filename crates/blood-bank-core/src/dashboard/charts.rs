//! Chart datasets and the registry that owns the live chart per id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DashboardReport;
use crate::analytics::GenderCounts;
use crate::models::BloodGroup;

const PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#66FF66", "#FF6666",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// One series of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: Option<String>,
    pub data: Vec<usize>,
    pub background_color: Vec<String>,
}

/// Everything needed to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Single-series pie chart coloured from the shared palette.
    pub fn pie(title: &str, labels: Vec<String>, data: Vec<usize>) -> Self {
        let background_color = PALETTE
            .iter()
            .cycle()
            .take(data.len())
            .map(|c| c.to_string())
            .collect();
        Self {
            kind: ChartKind::Pie,
            title: title.to_string(),
            labels,
            datasets: vec![Dataset {
                label: None,
                data,
                background_color,
            }],
        }
    }

    pub fn bar(title: &str, labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            kind: ChartKind::Bar,
            title: title.to_string(),
            labels,
            datasets,
        }
    }
}

/// Live charts keyed by id. At most one chart exists per id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRegistry {
    charts: BTreeMap<String, ChartData>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `chart` under `id`, returning the chart it replaces.
    pub fn register(&mut self, id: &str, chart: ChartData) -> Option<ChartData> {
        let previous = self.charts.insert(id.to_string(), chart);
        if previous.is_some() {
            debug!(chart = id, "replaced chart");
        }
        previous
    }

    /// Destroy the chart under `id`.
    pub fn remove(&mut self, id: &str) -> Option<ChartData> {
        self.charts.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&ChartData> {
        self.charts.get(id)
    }

    /// Registered chart ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        self.charts.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChartData)> {
        self.charts.iter().map(|(id, chart)| (id.as_str(), chart))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

/// Render every dashboard chart from `report` into `registry`.
pub fn render_charts(report: &DashboardReport, registry: &mut ChartRegistry) {
    registry.register(
        "genderChart",
        ChartData::bar(
            "Gender Distribution of Donors & Recipients",
            gender_labels(),
            vec![
                gender_dataset("Donors", &report.donor_gender_count, "rgba(54, 162, 235, 0.7)"),
                gender_dataset(
                    "Recipients",
                    &report.recipient_gender_count,
                    "rgba(255, 99, 132, 0.7)",
                ),
            ],
        ),
    );
    registry.register(
        "recipientGenderChart",
        ChartData::bar(
            "Recipient Gender Distribution",
            gender_labels(),
            vec![gender_dataset(
                "Recipients",
                &report.recipient_gender_count,
                "rgba(54, 162, 235, 0.7)",
            )],
        ),
    );

    registry.register(
        "bloodGroupChart",
        blood_group_pie("Blood Group Distribution Among Donors", &report.donor_blood_groups),
    );
    registry.register(
        "donationBloodGroupChart",
        blood_group_pie("Donation Blood Group Distribution", &report.donation_blood_groups),
    );
    registry.register(
        "recipientBloodGroupChart",
        blood_group_pie(
            "Blood Group Distribution Among Recipients",
            &report.recipient_blood_groups,
        ),
    );

    let (labels, data) = report
        .request_status_count
        .iter()
        .map(|(status, count)| (status.label().to_string(), *count))
        .unzip();
    registry.register(
        "requestStatusChart",
        ChartData::pie("Request Status Distribution", labels, data),
    );

    let mut transfusions = ChartData::pie(
        "Transfusion: Successful vs Failed",
        vec!["Successful".into(), "Failed".into()],
        vec![report.transfusion_stats.success, report.transfusion_stats.failure],
    );
    transfusions.datasets[0].background_color = vec!["#28a745".into(), "#dc3545".into()];
    registry.register("transfusionChart", transfusions);

    let (labels, data) = report
        .donation_heatmap
        .iter()
        .map(|day| (day.date.to_string(), day.count))
        .unzip();
    registry.register(
        "donationHeatmap",
        ChartData::bar(
            "Donations per Day",
            labels,
            vec![Dataset {
                label: Some("Donations".into()),
                data,
                background_color: vec!["rgba(220, 53, 69, 0.7)".into()],
            }],
        ),
    );
}

fn gender_labels() -> Vec<String> {
    vec!["Male".into(), "Female".into(), "Other".into()]
}

fn gender_dataset(label: &str, counts: &GenderCounts, color: &str) -> Dataset {
    Dataset {
        label: Some(label.to_string()),
        data: vec![counts.male, counts.female, counts.other],
        background_color: vec![color.to_string()],
    }
}

fn blood_group_pie(title: &str, counts: &BTreeMap<BloodGroup, usize>) -> ChartData {
    let (labels, data) = counts
        .iter()
        .map(|(group, count)| (group.label().to_string(), *count))
        .unzip();
    ChartData::pie(title, labels, data)
}
