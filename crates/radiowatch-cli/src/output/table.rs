//! Table-formatted output for CLI.

use std::path::Path;

use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use radiowatch_core::alerts::{Alert, Severity};
use radiowatch_core::manifest::{Manifest, RecordingEntry};

use super::OutputFormatter;
use crate::settings::Settings;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn severity_cell(severity: Severity) -> Cell {
        let cell = Cell::new(severity.as_str());
        match severity {
            Severity::High => cell.fg(Color::Red),
            Severity::Medium => cell.fg(Color::Yellow),
            Severity::Low => cell.fg(Color::Cyan),
            Severity::Informational => cell,
        }
    }

    fn format_size(bytes: u64) -> String {
        if bytes >= 1_048_576 {
            format!("{:.1} MiB", bytes as f64 / 1_048_576.0)
        } else if bytes >= 1024 {
            format!("{:.1} KiB", bytes as f64 / 1024.0)
        } else {
            format!("{} B", bytes)
        }
    }

    fn entry_row(entry: &RecordingEntry, marker: &str) -> Vec<Cell> {
        vec![
            Cell::new(&entry.name),
            Cell::new(
                entry
                    .start_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                entry
                    .last_message_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                entry
                    .qmdl_size_bytes
                    .map(Self::format_size)
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(marker),
        ]
    }

    /// Render arbitrary JSON as indented `key: value` lines.
    fn render_value(value: &serde_json::Value, indent: usize, lines: &mut Vec<String>) {
        let pad = "  ".repeat(indent);
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map {
                    match val {
                        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                            lines.push(format!("{}{}:", pad, key));
                            Self::render_value(val, indent + 1, lines);
                        }
                        _ => lines.push(format!("{}{}: {}", pad, key, Self::scalar(val))),
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    match item {
                        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                            lines.push(format!("{}-", pad));
                            Self::render_value(item, indent + 1, lines);
                        }
                        _ => lines.push(format!("{}- {}", pad, Self::scalar(item))),
                    }
                }
            }
            _ => lines.push(format!("{}{}", pad, Self::scalar(value))),
        }
    }

    fn scalar(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn render_lines(value: &serde_json::Value) -> String {
        let mut lines = Vec::new();
        Self::render_value(value, 0, &mut lines);
        if lines.is_empty() {
            "(empty)".to_string()
        } else {
            lines.join("\n")
        }
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_alerts(&self, alerts: &[Alert]) -> String {
        if alerts.is_empty() {
            return "No alerts.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Severity", "Timestamp", "Analyzer", "Message"]);

        for alert in alerts {
            table.add_row(vec![
                Self::severity_cell(alert.severity),
                Cell::new(
                    alert
                        .packet_timestamp
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(alert.analyzer.as_deref().unwrap_or("-")),
                Cell::new(&alert.message),
            ]);
        }

        format!("{}\n\n{} alert(s)", table, alerts.len())
    }

    fn format_manifest(&self, manifest: &Manifest) -> String {
        if manifest.entries.is_empty() && manifest.current_entry.is_none() {
            return "No recordings on device.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "Started", "Last Message", "Size", ""]);

        for entry in &manifest.entries {
            table.add_row(Self::entry_row(entry, ""));
        }
        if let Some(current) = &manifest.current_entry {
            table.add_row(Self::entry_row(current, "recording"));
        }

        let total = manifest.entries.len() + manifest.current_entry.is_some() as usize;
        let mut output = format!("{}\n\n{} recording(s)", table, total);
        if manifest.current_entry.is_some() {
            output.push_str(&format!(" ({})", "1 in progress".green()));
        }
        output
    }

    fn format_analysis_status(&self, status: &serde_json::Value) -> String {
        Self::render_lines(status)
    }

    fn format_stats(&self, stats: &serde_json::Value) -> String {
        Self::render_lines(stats)
    }

    fn format_settings(&self, settings: &Settings, path: &Path) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Config file: {}", path.display()));
        lines.push(format!(
            "  host:                {}",
            settings.host.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "  basic_auth_user:     {}",
            settings.basic_auth_user.as_deref().unwrap_or("-")
        ));
        // Value withheld; only whether one is stored.
        lines.push(format!(
            "  basic_auth_password: {}",
            if settings.basic_auth_password.is_some() {
                "(set)"
            } else {
                "-"
            }
        ));
        lines.push(format!(
            "  json:                {}",
            settings
                .json
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
        lines.push(format!(
            "  verbose:             {}",
            settings
                .verbose
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
        lines.join("\n")
    }

    fn format_download(&self, name: &str, path: &Path, bytes: u64) -> String {
        format!(
            "Saved {} ({}) to {}",
            name,
            Self::format_size(bytes),
            path.display()
        )
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}
