//! Recording manifest model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The device's recording manifest.
///
/// `current_entry`, when present, is the in-progress recording; it never
/// appears in `entries`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub entries: Vec<RecordingEntry>,

    #[serde(default)]
    pub current_entry: Option<RecordingEntry>,
}

/// One recording known to the device.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordingEntry {
    pub name: String,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_message_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub qmdl_size_bytes: Option<u64>,
}
