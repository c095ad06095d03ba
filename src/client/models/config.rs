//! Scan configuration and engine group models

use serde::{Deserialize, Serialize};

/// A saved, reusable scan definition as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Config id (GUID)
    #[serde(rename = "Id")]
    pub id: String,

    /// Config name, unique per tenant
    #[serde(rename = "Name")]
    pub name: String,
}

/// Named pool of scan execution engines.
///
/// Looked up by name to obtain the id a config save needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineGroup {
    /// Engine group id (GUID)
    #[serde(rename = "Id")]
    pub id: String,

    /// Engine group name
    #[serde(rename = "Name")]
    pub name: String,
}
