//! Mock enterprise API client for testing
//!
//! In-memory implementation of [`EnterpriseApi`] for unit testing without
//! a live service. Beyond canned responses it models the contract's
//! server-side semantics: tokens are only honored if this mock issued
//! them, config saves upsert by name, and scans move to a terminal state
//! via [`MockEnterpriseClient::complete_scan`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use url::Url;

use super::models::{AuthToken, AuthenticationModel, ClientIdNamePair, ScanResult};
use super::report::ReportZip;
use super::EnterpriseApi;

const MOCK_URL: &str = "https://scanner.mock.invalid/rest/v1";

/// Mock API client for testing.
///
/// Configure state via builder methods, then use anywhere an
/// `EnterpriseApi` is expected.
///
/// # Example
/// ```ignore
/// let mock = MockEnterpriseClient::new()
///     .with_credentials("admin", "s3cret").await
///     .with_config("c-1", "nightly").await;
///
/// let token = mock.login(&AuthenticationModel::new("admin", "s3cret")).await.unwrap();
/// let started = mock.run_scan_by_config_name(&token, "nightly").await;
/// assert!(started.success);
/// ```
pub struct MockEnterpriseClient {
    /// Credentials `login` accepts
    credentials: Arc<Mutex<Option<(String, String)>>>,
    /// Tokens issued by `login`; all other operations require one
    issued_tokens: Arc<Mutex<Vec<String>>>,
    /// Engine groups visible to the authenticated identity
    engine_groups: Arc<Mutex<Vec<(String, String)>>>,
    /// Scan configurations, insertion-ordered, unique by name
    configs: Arc<Mutex<Vec<MockConfig>>>,
    /// Scans started via run_scan_by_config_name
    scans: Arc<Mutex<HashMap<String, MockScan>>>,
    /// Report bytes by scan id
    reports: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    /// Tenants, in listing order
    clients: Arc<Mutex<Vec<ClientIdNamePair>>>,
    /// Monotonic counter for generated ids
    next_id: Arc<Mutex<usize>>,
    /// Track number of calls for verification
    call_counts: Arc<Mutex<CallCounts>>,
}

/// A stored scan configuration
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct MockConfig {
    id: String,
    name: String,
    target: Option<String>,
    engine_group_id: Option<String>,
}

/// A started scan
#[derive(Debug, Clone)]
struct MockScan {
    status: String,
    finished: bool,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub login: usize,
    pub engine_groups: usize,
    pub run_scan: usize,
    pub scan_status: usize,
    pub is_scan_finished: usize,
    pub has_report: usize,
    pub config_names: usize,
    pub save_config: usize,
    pub vulnerabilities_summary: usize,
    pub report_zip: usize,
    pub client_pairs: usize,
}

impl CallCounts {
    /// Total number of API calls made.
    pub fn total(&self) -> usize {
        self.login
            + self.engine_groups
            + self.run_scan
            + self.scan_status
            + self.is_scan_finished
            + self.has_report
            + self.config_names
            + self.save_config
            + self.vulnerabilities_summary
            + self.report_zip
            + self.client_pairs
    }
}

impl Default for MockEnterpriseClient {
    fn default() -> Self {
        Self {
            credentials: Arc::new(Mutex::new(None)),
            issued_tokens: Arc::new(Mutex::new(Vec::new())),
            engine_groups: Arc::new(Mutex::new(Vec::new())),
            configs: Arc::new(Mutex::new(Vec::new())),
            scans: Arc::new(Mutex::new(HashMap::new())),
            reports: Arc::new(Mutex::new(HashMap::new())),
            clients: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
            call_counts: Arc::new(Mutex::new(CallCounts::default())),
        }
    }
}

impl MockEnterpriseClient {
    /// Create a new mock with no accepted credentials or resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the credentials `login` will accept.
    pub async fn with_credentials(self, username: &str, password: &str) -> Self {
        *self.credentials.lock().await = Some((username.to_string(), password.to_string()));
        self
    }

    /// Configure the engine groups as (id, name) pairs.
    pub async fn with_engine_groups(self, groups: Vec<(&str, &str)>) -> Self {
        *self.engine_groups.lock().await = groups
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        self
    }

    /// Seed a scan configuration.
    pub async fn with_config(self, id: &str, name: &str) -> Self {
        self.configs.lock().await.push(MockConfig {
            id: id.to_string(),
            name: name.to_string(),
            target: None,
            engine_group_id: None,
        });
        self
    }

    /// Attach a report artifact to a scan id.
    pub async fn with_report(self, scan_id: &str, bytes: Vec<u8>) -> Self {
        self.reports.lock().await.insert(scan_id.to_string(), bytes);
        self
    }

    /// Configure the tenants as (id, name) pairs, in listing order.
    pub async fn with_clients(self, clients: Vec<(&str, &str)>) -> Self {
        *self.clients.lock().await = clients
            .into_iter()
            .map(|(id, name)| ClientIdNamePair {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        self
    }

    /// Move a started scan to its terminal state.
    pub async fn complete_scan(&self, scan_id: &str) {
        if let Some(scan) = self.scans.lock().await.get_mut(scan_id) {
            scan.status = "Completed".to_string();
            scan.finished = true;
        }
    }

    /// Snapshot of the call counters.
    #[allow(dead_code)]
    pub async fn call_counts(&self) -> CallCounts {
        self.call_counts.lock().await.clone()
    }

    async fn fresh_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().await;
        let id = format!("{}-{}", prefix, *next);
        *next += 1;
        id
    }

    async fn token_valid(&self, token: &AuthToken) -> bool {
        self.issued_tokens
            .lock()
            .await
            .iter()
            .any(|issued| issued == token.as_str())
    }
}

#[async_trait]
impl EnterpriseApi for MockEnterpriseClient {
    fn url(&self) -> &str {
        MOCK_URL
    }

    async fn login(&self, auth: &AuthenticationModel) -> Option<AuthToken> {
        self.call_counts.lock().await.login += 1;

        let accepted = self.credentials.lock().await.clone()?;
        if accepted != (auth.username.clone(), auth.password.clone()) {
            return None;
        }

        let token = self.fresh_id("mock-token").await;
        self.issued_tokens.lock().await.push(token.clone());
        Some(AuthToken::new(token))
    }

    async fn test_authentication(&self, auth: &AuthenticationModel) -> bool {
        self.login(auth).await.is_some()
    }

    async fn get_engine_group_names_for_client(&self, token: &AuthToken) -> Option<Vec<String>> {
        self.call_counts.lock().await.engine_groups += 1;
        if !self.token_valid(token).await {
            return None;
        }

        let groups = self.engine_groups.lock().await;
        Some(groups.iter().map(|(_, name)| name.clone()).collect())
    }

    async fn get_engine_group_id_from_name(
        &self,
        token: &AuthToken,
        engine_group_name: &str,
    ) -> Option<String> {
        self.call_counts.lock().await.engine_groups += 1;
        if !self.token_valid(token).await {
            return None;
        }

        let groups = self.engine_groups.lock().await;
        groups
            .iter()
            .find(|(_, name)| name == engine_group_name)
            .map(|(id, _)| id.clone())
    }

    async fn run_scan_by_config_name(&self, token: &AuthToken, config_name: &str) -> ScanResult {
        self.call_counts.lock().await.run_scan += 1;
        if !self.token_valid(token).await {
            return ScanResult::failed();
        }

        let known = self
            .configs
            .lock()
            .await
            .iter()
            .any(|config| config.name.eq_ignore_ascii_case(config_name));
        if !known {
            return ScanResult::failed();
        }

        let scan_id = self.fresh_id("scan").await;
        self.scans.lock().await.insert(
            scan_id.clone(),
            MockScan {
                status: "Running".to_string(),
                finished: false,
            },
        );
        ScanResult::started(scan_id)
    }

    async fn get_scan_status(&self, token: &AuthToken, scan_id: &str) -> Option<String> {
        self.call_counts.lock().await.scan_status += 1;
        if !self.token_valid(token).await {
            return None;
        }

        let scans = self.scans.lock().await;
        scans.get(scan_id).map(|scan| scan.status.clone())
    }

    async fn is_scan_finished(&self, token: &AuthToken, scan_id: &str) -> bool {
        self.call_counts.lock().await.is_scan_finished += 1;
        if !self.token_valid(token).await {
            return false;
        }

        let scans = self.scans.lock().await;
        scans.get(scan_id).map(|scan| scan.finished).unwrap_or(false)
    }

    async fn has_report(&self, token: &AuthToken, scan_id: &str) -> bool {
        self.call_counts.lock().await.has_report += 1;
        if !self.token_valid(token).await {
            return false;
        }

        self.reports.lock().await.contains_key(scan_id)
    }

    async fn get_config_names(&self, token: &AuthToken) -> Option<Vec<String>> {
        self.call_counts.lock().await.config_names += 1;
        if !self.token_valid(token).await {
            return None;
        }

        let configs = self.configs.lock().await;
        Some(configs.iter().map(|config| config.name.clone()).collect())
    }

    async fn save_config(
        &self,
        token: &AuthToken,
        name: &str,
        target: &Url,
        engine_group_id: &str,
    ) -> bool {
        self.call_counts.lock().await.save_config += 1;
        if !self.token_valid(token).await {
            return false;
        }

        let mut configs = self.configs.lock().await;
        if let Some(existing) = configs
            .iter_mut()
            .find(|config| config.name.eq_ignore_ascii_case(name))
        {
            existing.target = Some(target.to_string());
            existing.engine_group_id = Some(engine_group_id.to_string());
            return true;
        }
        drop(configs);

        let id = self.fresh_id("cfg").await;
        self.configs.lock().await.push(MockConfig {
            id,
            name: name.to_string(),
            target: Some(target.to_string()),
            engine_group_id: Some(engine_group_id.to_string()),
        });
        true
    }

    async fn get_vulnerabilities_summary_xml(
        &self,
        token: &AuthToken,
        scan_id: &str,
    ) -> Option<String> {
        self.call_counts.lock().await.vulnerabilities_summary += 1;
        if !self.token_valid(token).await {
            return None;
        }

        if !self.reports.lock().await.contains_key(scan_id) {
            return None;
        }
        Some(format!(
            "<VulnSummary scanId=\"{}\"><VulnList/></VulnSummary>",
            scan_id
        ))
    }

    async fn get_report_zip(&self, token: &AuthToken, scan_id: &str) -> Option<ReportZip> {
        self.call_counts.lock().await.report_zip += 1;
        if !self.token_valid(token).await {
            return None;
        }

        let reports = self.reports.lock().await;
        reports.get(scan_id).map(|bytes| ReportZip::from_bytes(bytes.clone()))
    }

    async fn get_client_name_id_pairs(&self, token: &AuthToken) -> Option<Vec<ClientIdNamePair>> {
        self.call_counts.lock().await.client_pairs += 1;
        if !self.token_valid(token).await {
            return None;
        }

        Some(self.clients.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_counts_accumulate() {
        let mock = MockEnterpriseClient::new()
            .with_credentials("admin", "s3cret")
            .await;

        let token = mock
            .login(&AuthenticationModel::new("admin", "s3cret"))
            .await
            .unwrap();
        mock.get_config_names(&token).await;
        mock.is_scan_finished(&token, "scan-1").await;

        let counts = mock.call_counts().await;
        assert_eq!(counts.login, 1);
        assert_eq!(counts.config_names, 1);
        assert_eq!(counts.is_scan_finished, 1);
        assert_eq!(counts.total(), 3);
    }

    #[tokio::test]
    async fn test_each_login_issues_distinct_token() {
        let mock = MockEnterpriseClient::new()
            .with_credentials("admin", "s3cret")
            .await;
        let auth = AuthenticationModel::new("admin", "s3cret");

        let first = mock.login(&auth).await.unwrap();
        let second = mock.login(&auth).await.unwrap();
        assert_ne!(first, second);

        // Both remain valid; the mock models no expiry
        assert!(mock.get_config_names(&first).await.is_some());
        assert!(mock.get_config_names(&second).await.is_some());
    }

    #[tokio::test]
    async fn test_url_is_stable() {
        let mock = MockEnterpriseClient::new();
        assert_eq!(mock.url(), MOCK_URL);
    }
}
