//! Scan models

use serde::{Deserialize, Serialize};

/// Outcome of a scan-start request.
///
/// This is the one operation with a structured result instead of
/// absence-on-failure: callers need the attempt outcome and the new scan
/// id at the same time, and an empty id must never double as the failure
/// signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Whether the scan-start request was accepted
    pub success: bool,

    /// Identifier of the new scan, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
}

impl ScanResult {
    /// A successful start carrying the new scan's id.
    pub fn started(scan_id: impl Into<String>) -> Self {
        Self {
            success: true,
            scan_id: Some(scan_id.into()),
        }
    }

    /// A failed start. Covers rejected requests, unknown config names
    /// and transport errors alike; the contract does not distinguish.
    pub fn failed() -> Self {
        Self {
            success: false,
            scan_id: None,
        }
    }
}
