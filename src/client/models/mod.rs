//! Enterprise API data models
//!
//! Domain types exchanged with the enterprise scanning service, organized
//! by resource type.

mod auth;
mod config;
mod scan;
mod tenant;

pub use auth::{AuthToken, AuthenticationModel};
pub use config::{EngineGroup, ScanConfig};
pub use scan::ScanResult;
pub use tenant::ClientIdNamePair;
