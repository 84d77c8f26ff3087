//! Alert extraction and filtering.
//!
//! Turns the heterogeneous per-packet event rows of a report into a flat,
//! severity-ranked alert list. All functions here are pure; the CLI decides
//! how to render the result and which exit code to return.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::report::{ReportMetadata, ReportRow};

/// Event severity, ordered from least to most severe.
///
/// Unrecognized event types rank as `Informational` and are suppressed
/// during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Severity {
    Informational = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Severity {
    /// Case-sensitive mapping from the wire `event_type` string.
    pub fn from_event_type(event_type: &str) -> Self {
        match event_type {
            "Low" => Severity::Low,
            "Medium" => Severity::Medium,
            "High" => Severity::High,
            _ => Severity::Informational,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Informational => "Informational",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A severity-ranked projection of one non-Informational event.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    pub packet_timestamp: Option<DateTime<Utc>>,
    /// Name of the analyzer that produced the event, resolved by the
    /// event's position in the row. Absent when the position is out of
    /// range of the metadata list or the descriptor has no name.
    pub analyzer: Option<String>,
}

/// Extract alerts from report rows.
///
/// Alerts come out in row order, then within-row event-position order;
/// nothing is re-sorted. `null` event slots and `Informational` events are
/// skipped.
pub fn extract_alerts(rows: &[ReportRow], metadata: &ReportMetadata) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for row in rows {
        for (position, slot) in row.events.iter().enumerate() {
            let event = match slot {
                Some(event) => event,
                None => continue,
            };

            let severity = Severity::from_event_type(&event.event_type);
            if severity.rank() == 0 {
                continue;
            }

            let analyzer = metadata
                .analyzers
                .get(position)
                .and_then(|info| info.name.clone());

            alerts.push(Alert {
                severity,
                message: event.message.clone(),
                packet_timestamp: row.packet_timestamp,
                analyzer,
            });
        }
    }

    alerts
}

/// Keep alerts strictly after `threshold`.
///
/// Alerts without a timestamp are always excluded once this filter applies.
pub fn filter_after(alerts: Vec<Alert>, threshold: DateTime<Utc>) -> Vec<Alert> {
    alerts
        .into_iter()
        .filter(|alert| matches!(alert.packet_timestamp, Some(ts) if ts > threshold))
        .collect()
}

/// Keep only alerts carrying the most recent timestamp.
///
/// The maximum is taken over all rows' timestamps, unless an `--after`
/// filter already ran; then it is taken over the filtered alerts' own
/// timestamps, so the two filters compose as narrow-then-maximize. Ties are
/// kept. When nothing carries a timestamp the result is empty.
pub fn latest_only(alerts: Vec<Alert>, rows: &[ReportRow], after_applied: bool) -> Vec<Alert> {
    let max_ts = if after_applied {
        alerts.iter().filter_map(|a| a.packet_timestamp).max()
    } else {
        rows.iter().filter_map(|r| r.packet_timestamp).max()
    };

    match max_ts {
        None => Vec::new(),
        Some(max) => alerts
            .into_iter()
            .filter(|alert| alert.packet_timestamp == Some(max))
            .collect(),
    }
}

/// The worst severity present, if any.
pub fn max_severity(alerts: &[Alert]) -> Option<Severity> {
    alerts.iter().map(|a| a.severity).max()
}
