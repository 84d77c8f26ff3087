//! JSON-formatted output for CLI.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use radiowatch_core::alerts::Alert;
use radiowatch_core::manifest::Manifest;

use super::OutputFormatter;
use crate::settings::Settings;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_alerts(&self, alerts: &[Alert]) -> String {
        Self::to_json(&json!({
            "alerts": alerts,
            "count": alerts.len()
        }))
    }

    fn format_manifest(&self, manifest: &Manifest) -> String {
        Self::to_json(manifest)
    }

    fn format_analysis_status(&self, status: &Value) -> String {
        Self::to_json(status)
    }

    fn format_stats(&self, stats: &Value) -> String {
        Self::to_json(stats)
    }

    fn format_settings(&self, settings: &Settings, path: &Path) -> String {
        let mut value = serde_json::to_value(settings).unwrap_or(json!({}));
        if let Value::Object(ref mut map) = value {
            map.insert(
                "config_path".to_string(),
                json!(path.display().to_string()),
            );
        }
        Self::to_json(&value)
    }

    fn format_download(&self, name: &str, path: &Path, bytes: u64) -> String {
        Self::to_json(&json!({
            "name": name,
            "path": path.display().to_string(),
            "bytes": bytes
        }))
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiowatch_core::alerts::Severity;

    #[test]
    fn test_format_alerts_envelope() {
        let alerts = vec![Alert {
            severity: Severity::High,
            message: "IMSI requested".to_string(),
            packet_timestamp: None,
            analyzer: Some("imsi".to_string()),
        }];

        let output = JsonOutput::new().format_alerts(&alerts);
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["alerts"][0]["severity"], "High");
        assert_eq!(parsed["alerts"][0]["analyzer"], "imsi");
        assert_eq!(parsed["alerts"][0]["packet_timestamp"], Value::Null);
    }

    #[test]
    fn test_format_settings_includes_path() {
        let settings = Settings {
            host: Some("dev.local".to_string()),
            ..Default::default()
        };

        let output = JsonOutput::new().format_settings(&settings, Path::new("/tmp/c.yaml"));
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["host"], "dev.local");
        assert_eq!(parsed["config_path"], "/tmp/c.yaml");
    }

    #[test]
    fn test_format_message() {
        let output = JsonOutput::new().format_message("Recording stopped");
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["message"], "Recording stopped");
    }
}
