//! Analysis report model and NDJSON parsing.
//!
//! The device serves analysis reports as newline-delimited JSON: the first
//! line is a metadata object, every following line is one per-packet row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// A parsed analysis report.
///
/// Invariant: `metadata.analyzers[i]` describes the analyzer that produced
/// `events[i]` in every row. The two arrays are correlated by position only;
/// no explicit key ties them together.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Rows in NDJSON line order.
    pub rows: Vec<ReportRow>,
}

/// First line of the report: device/runtime descriptors plus the ordered
/// analyzer list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportMetadata {
    #[serde(default)]
    pub analyzers: Vec<AnalyzerInfo>,

    /// Remaining descriptors (report version, device identity, ...) kept
    /// as-is for display.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A named detection module on the device.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

/// One per-packet record.
///
/// A row either carries `events` (one slot per analyzer, `null` when that
/// analyzer produced nothing) or names a reason the packet was skipped.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportRow {
    #[serde(default)]
    pub packet_timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub events: Vec<Option<Event>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_message_reason: Option<String>,
}

/// A single analyzer finding for one packet.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub message: String,
}

/// Parse an NDJSON report body.
///
/// Blank lines are dropped. An empty body is an error; a malformed line
/// fails with its row number so the operator can find it in the raw trace.
pub fn parse_ndjson(body: &str) -> Result<Report> {
    let mut lines = body.lines().map(str::trim).filter(|l| !l.is_empty());

    let first = lines
        .next()
        .ok_or_else(|| ClientError::Parse("No data received from server".to_string()))?;

    let metadata: ReportMetadata = serde_json::from_str(first)
        .map_err(|e| ClientError::Parse(format!("Invalid report metadata: {}", e)))?;

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let row: ReportRow = serde_json::from_str(line)
            .map_err(|e| ClientError::Parse(format!("Invalid report row {}: {}", idx + 1, e)))?;
        rows.push(row);
    }

    Ok(Report { metadata, rows })
}

/// Parse a whole-body JSON response.
pub fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Parse(format!("Invalid JSON response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_and_row() {
        let body = "{\"report_version\":2}\n{\"events\":[null]}";
        let report = parse_ndjson(body).unwrap();

        assert_eq!(report.metadata.extra["report_version"], 2);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].events.len(), 1);
        assert!(report.rows[0].events[0].is_none());
    }

    #[test]
    fn test_parse_empty_body() {
        let err = parse_ndjson("").unwrap_err();
        assert!(format!("{}", err).contains("No data"));

        let err = parse_ndjson("\n\n").unwrap_err();
        assert!(format!("{}", err).contains("No data"));
    }

    #[test]
    fn test_parse_blank_lines_dropped() {
        let body = "{\"analyzers\":[{\"name\":\"imsi\"}]}\n\n{\"events\":[null]}\n\n";
        let report = parse_ndjson(body).unwrap();

        assert_eq!(report.metadata.analyzers.len(), 1);
        assert_eq!(report.metadata.analyzers[0].name.as_deref(), Some("imsi"));
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_parse_names_failing_row() {
        let body = "{}\n{\"events\":[null]}\nnot json";
        let err = parse_ndjson(body).unwrap_err();
        let text = format!("{}", err);
        assert!(text.contains("row 2"), "unexpected message: {}", text);
    }

    #[test]
    fn test_parse_bad_metadata() {
        let err = parse_ndjson("[1,2,3]\n{}").unwrap_err();
        assert!(format!("{}", err).contains("metadata"));
    }

    #[test]
    fn test_parse_row_with_events_and_timestamp() {
        let body = concat!(
            "{\"analyzers\":[{\"name\":\"a\"},{\"name\":\"b\"}]}\n",
            "{\"packet_timestamp\":\"2024-03-01T12:00:00Z\",",
            "\"events\":[{\"event_type\":\"High\",\"message\":\"bad\"},null]}"
        );
        let report = parse_ndjson(body).unwrap();

        let row = &report.rows[0];
        assert!(row.packet_timestamp.is_some());
        let event = row.events[0].as_ref().unwrap();
        assert_eq!(event.event_type, "High");
        assert_eq!(event.message, "bad");
        assert!(row.events[1].is_none());
    }

    #[test]
    fn test_parse_skipped_row() {
        let body = "{}\n{\"packet_timestamp\":null,\"skipped_message_reason\":\"truncated\"}";
        let report = parse_ndjson(body).unwrap();

        let row = &report.rows[0];
        assert!(row.packet_timestamp.is_none());
        assert!(row.events.is_empty());
        assert_eq!(row.skipped_message_reason.as_deref(), Some("truncated"));
    }

    #[test]
    fn test_parse_json_whole_body() {
        let value: serde_json::Value = parse_json("{\"disk\": {\"used\": 1}}").unwrap();
        assert_eq!(value["disk"]["used"], 1);

        let err = parse_json::<serde_json::Value>("{nope").unwrap_err();
        assert!(format!("{}", err).contains("Invalid JSON response"));
    }
}
