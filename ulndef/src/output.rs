// ulndef/src/output.rs

//! stdout envelopes for silent (JSON) mode.

use serde::Serialize;

use crate::actions::TagReport;
use crate::types::DeviceInfo;

/// JSON envelope for read and write: `{"chip_uuid":"…","url":"…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEnvelope {
    /// Tag UID as lowercase hex, or `NOT_FOUND`.
    pub chip_uuid: String,
    /// Decoded URI, or empty.
    pub url: String,
}

impl TagEnvelope {
    /// Envelope for a field with no tag in it. Emitted with exit success.
    pub fn not_found() -> Self {
        Self {
            chip_uuid: "NOT_FOUND".to_string(),
            url: String::new(),
        }
    }

    /// Envelope with a UID but no (or unreadable) URI record.
    pub fn without_url(chip_uuid: String) -> Self {
        Self {
            chip_uuid,
            url: String::new(),
        }
    }
}

impl From<TagReport> for TagEnvelope {
    fn from(report: TagReport) -> Self {
        Self {
            chip_uuid: report.chip_uuid,
            url: report.url,
        }
    }
}

/// One entry of the `l` action's JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    /// Human-readable reader name.
    pub name: String,
    /// Driver connection string.
    pub connection_string: String,
}

impl From<DeviceInfo> for DeviceEntry {
    fn from(info: DeviceInfo) -> Self {
        Self {
            name: info.name,
            connection_string: info.connstring,
        }
    }
}

/// Serialize a value to single-line JSON. These envelopes cannot fail to
/// serialize; an empty string would only surface a serde_json bug.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
