//! Enterprise scanning API client
//!
//! [`EnterpriseApi`] is the full catalog of operations a caller may
//! invoke against the enterprise scanning service, with the contract's
//! success/failure signaling: absence for "could not produce a value"
//! (cause undistinguished), `bool` for binary outcomes, and one
//! structured result for scan starts. Implementations must not let
//! transport errors escape these signatures.

use async_trait::async_trait;
use url::Url;

pub mod enterprise;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod report;

pub use enterprise::EnterpriseClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockEnterpriseClient;
#[allow(unused_imports)]
pub use models::{
    AuthToken, AuthenticationModel, ClientIdNamePair, EngineGroup, ScanConfig, ScanResult,
};
pub use report::ReportZip;

/// Enterprise scanning service client contract.
///
/// Stateless: every operation except `login` takes the caller-supplied
/// authorization token, so one client may serve concurrent callers with
/// independent sessions. Token refresh is out of scope; callers
/// re-authenticate when the service stops honoring a token.
#[async_trait]
pub trait EnterpriseApi: Send + Sync {
    /// The base endpoint URL this client targets. No failure mode.
    fn url(&self) -> &str;

    /// Authenticate and obtain an authorization token.
    ///
    /// Absent on any failure: bad credentials, transport error or a
    /// malformed response are indistinguishable here.
    async fn login(&self, auth: &AuthenticationModel) -> Option<AuthToken>;

    /// True iff `login` with these credentials would yield a token.
    async fn test_authentication(&self, auth: &AuthenticationModel) -> bool;

    /// Names of the engine groups visible to the authenticated identity.
    async fn get_engine_group_names_for_client(&self, token: &AuthToken) -> Option<Vec<String>>;

    /// Id of the engine group whose name matches exactly; absent when no
    /// such group exists (not-found and error are not distinguished).
    async fn get_engine_group_id_from_name(
        &self,
        token: &AuthToken,
        engine_group_name: &str,
    ) -> Option<String>;

    /// Start a new scan from the named configuration.
    ///
    /// Always returns a [`ScanResult`]; the success flag and optional
    /// scan id are needed simultaneously, so absence is never used here.
    async fn run_scan_by_config_name(&self, token: &AuthToken, config_name: &str) -> ScanResult;

    /// Current status string of the scan.
    async fn get_scan_status(&self, token: &AuthToken, scan_id: &str) -> Option<String>;

    /// True once the scan has reached any terminal state, regardless of
    /// whether it completed, failed or was cancelled.
    async fn is_scan_finished(&self, token: &AuthToken, scan_id: &str) -> bool;

    /// True iff a retrievable report artifact exists for the scan.
    async fn has_report(&self, token: &AuthToken, scan_id: &str) -> bool;

    /// Names of all scan configurations visible to the authenticated
    /// identity.
    async fn get_config_names(&self, token: &AuthToken) -> Option<Vec<String>>;

    /// Create or update the named configuration (upsert: callers need
    /// not know whether the name already exists). True on success.
    async fn save_config(
        &self,
        token: &AuthToken,
        name: &str,
        target: &Url,
        engine_group_id: &str,
    ) -> bool;

    /// Vulnerability summary for the scan as an XML document.
    async fn get_vulnerabilities_summary_xml(
        &self,
        token: &AuthToken,
        scan_id: &str,
    ) -> Option<String>;

    /// Report archive for the scan as a byte stream. The caller owns the
    /// returned stream and its scoped acquire/release lifecycle.
    async fn get_report_zip(&self, token: &AuthToken, scan_id: &str) -> Option<ReportZip>;

    /// Ordered id/name pairs of the tenants the authenticated identity
    /// may access.
    async fn get_client_name_id_pairs(&self, token: &AuthToken) -> Option<Vec<ClientIdNamePair>>;
}
