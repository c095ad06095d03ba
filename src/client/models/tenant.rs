//! Tenant (client) models

use serde::{Deserialize, Serialize};

/// Id/name pair identifying a sub-client the authenticated identity can
/// access. Read-only; returned in the order the service lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdNamePair {
    /// Tenant id (GUID)
    #[serde(rename = "ClientId")]
    pub id: String,

    /// Tenant display name
    #[serde(rename = "ClientName")]
    pub name: String,
}
