//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use std::path::Path;

use radiowatch_core::alerts::Alert;
use radiowatch_core::manifest::Manifest;

use crate::settings::Settings;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the alert list
    fn format_alerts(&self, alerts: &[Alert]) -> String;

    /// Format the recording manifest
    fn format_manifest(&self, manifest: &Manifest) -> String;

    /// Format the analysis queue status
    fn format_analysis_status(&self, status: &serde_json::Value) -> String;

    /// Format system stats
    fn format_stats(&self, stats: &serde_json::Value) -> String;

    /// Format the config file contents
    fn format_settings(&self, settings: &Settings, path: &Path) -> String;

    /// Format a completed download
    fn format_download(&self, name: &str, path: &Path, bytes: u64) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
