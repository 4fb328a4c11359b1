//! User-submitted safety incident reports.
//!
//! Reports live in memory only. Resolved reports are kept on the board but
//! never listed, and the proximity view sorts active reports by great-circle
//! distance from the user.

use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::geometry::haversine_km;
use crate::{Error, GeoPoint};

/// Radius of the "nearby reports" view
pub const NEARBY_REPORTS_KM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    BlockedRoad,
    Flooding,
    FacilityIssue,
    PowerOutage,
    Hazard,
}

impl ReportType {
    pub fn label(self) -> &'static str {
        match self {
            ReportType::BlockedRoad => "Blokkert vei",
            ReportType::Flooding => "Flom",
            ReportType::FacilityIssue => "Problem med fasilitet",
            ReportType::PowerOutage => "Strømbrudd",
            ReportType::Hazard => "Annen fare",
        }
    }
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blocked-road" => Ok(ReportType::BlockedRoad),
            "flooding" => Ok(ReportType::Flooding),
            "facility-issue" => Ok(ReportType::FacilityIssue),
            "power-outage" => Ok(ReportType::PowerOutage),
            "hazard" => Ok(ReportType::Hazard),
            other => Err(Error::InvalidData(format!("unknown report type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Lav",
            Severity::Medium => "Medium",
            Severity::High => "Høy",
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "lav" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" | "høy" => Ok(Severity::High),
            other => Err(Error::InvalidData(format!("unknown severity '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Active,
    Resolved,
}

/// An incident reported by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub severity: Severity,
    #[serde(default)]
    pub status: ReportStatus,
    pub description: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub has_photo: bool,
}

impl Report {
    pub fn is_active(&self) -> bool {
        self.status == ReportStatus::Active
    }
}

/// Report as submitted, before the board assigns an id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub severity: Severity,
    pub description: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub has_photo: bool,
}

/// Type and severity filter. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub report_type: Option<ReportType>,
    pub severity: Option<Severity>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.report_type.is_none_or(|t| t == report.report_type)
            && self.severity.is_none_or(|s| s == report.severity)
    }
}

/// An active report and its straight-line distance from the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearbyReport<'a> {
    #[serde(flatten)]
    pub report: &'a Report,
    pub distance_km: f64,
}

/// Active reports within `max_km` of `user`, closest first.
///
/// Reports at the same distance keep their input order.
pub fn nearby_reports<'a>(
    user: GeoPoint,
    reports: impl IntoIterator<Item = &'a Report>,
    max_km: f64,
) -> Vec<NearbyReport<'a>> {
    let mut nearby: Vec<NearbyReport<'a>> = reports
        .into_iter()
        .filter(|r| r.is_active())
        .map(|report| NearbyReport {
            report,
            distance_km: haversine_km(user, report.location),
        })
        .filter(|n| n.distance_km <= max_km)
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}

/// In-memory collection of submitted reports
#[derive(Debug, Default)]
pub struct ReportBoard {
    reports: Vec<Report>,
    next_id: u64,
}

impl ReportBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new active report and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when the description is blank.
    pub fn submit(&mut self, new: NewReport) -> Result<&Report, Error> {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(Error::InvalidData("report description is empty".to_string()));
        }

        self.next_id += 1;
        let report = Report {
            id: format!("SR-{}", self.next_id),
            report_type: new.report_type,
            severity: new.severity,
            status: ReportStatus::Active,
            description: description.to_string(),
            location: new.location,
            address: new.address.filter(|a| !a.trim().is_empty()),
            has_photo: new.has_photo,
        };
        info!(
            "Report {} ({}, {}) submitted",
            report.id,
            report.report_type.label(),
            report.severity.label()
        );

        self.reports.push(report);
        Ok(&self.reports[self.reports.len() - 1])
    }

    /// Marks a report as resolved so it drops out of every listing.
    /// `None` for an unknown id.
    pub fn resolve(&mut self, id: &str) -> Option<&Report> {
        let report = self.reports.iter_mut().find(|r| r.id == id)?;
        report.status = ReportStatus::Resolved;
        info!("Report {id} resolved");
        Some(&*report)
    }

    /// Active reports matching `filter`, newest first
    pub fn active(&self, filter: &ReportFilter) -> Vec<&Report> {
        self.reports
            .iter()
            .rev()
            .filter(|r| r.is_active() && filter.matches(r))
            .collect()
    }

    /// Active reports matching `filter` within `max_km` of `user`, closest first
    pub fn nearby(
        &self,
        user: GeoPoint,
        max_km: f64,
        filter: &ReportFilter,
    ) -> Vec<NearbyReport<'_>> {
        nearby_reports(user, self.reports.iter().filter(|r| filter.matches(r)), max_km)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Removes every stored report and returns how many there were
    pub fn clear(&mut self) -> usize {
        let removed = self.reports.len();
        self.reports.clear();
        info!("Cleared {removed} reports");
        removed
    }
}
