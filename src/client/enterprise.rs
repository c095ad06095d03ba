//! Enterprise API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::models::{
    AuthToken, AuthenticationModel, ClientIdNamePair, EngineGroup, ScanConfig, ScanResult,
};
use super::report::ReportZip;
use super::EnterpriseApi;
use crate::error::ApiError;

/// Request pacing so bulk CLI use stays polite to the service
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Request timeout for all calls except the streamed report download
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Id the SaveConfig endpoint treats as "create a new configuration"
const ZERO_GUID: &str = "00000000-0000-0000-0000-000000000000";

/// Minimal scan-config document; the crawler seed is the scan target.
const CONFIG_XML_TEMPLATE: &str = concat!(
    r#"<ScanConfig xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
    r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    "<Name>{name}</Name>",
    "<CrawlConfig><SeedUrlList><SeedUrl><Value>{url}</Value></SeedUrl></SeedUrlList></CrawlConfig>",
    "</ScanConfig>"
);

type Result<T> = std::result::Result<T, ApiError>;

/// Concrete client for the enterprise scanning REST service.
///
/// Holds no session state: tokens come in with every call, so a single
/// instance is safe to share across concurrent callers. Failures are
/// converted to the contract's absence/false signaling at the
/// [`EnterpriseApi`] boundary, with the cause logged at debug level.
pub struct EnterpriseClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl EnterpriseClient {
    /// Create a client targeting `base_url` (the service's rest root,
    /// e.g. `https://appspider.example.com/AppSpiderEnterprise/rest/v1`).
    pub fn new(base_url: impl Into<String>) -> crate::error::Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    /// Map a non-OK response to an [`ApiError`], consuming the body for
    /// the diagnostic where the service provides one.
    async fn status_error(status: StatusCode, response: Response) -> ApiError {
        async fn body_or(response: Response, fallback: &str) -> String {
            response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        }

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(body_or(response, "Resource not found").await)
            }
            status if status.is_client_error() => {
                ApiError::BadRequest(body_or(response, "Bad request").await)
            }
            status if status.is_server_error() => {
                let fallback = format!("Server error: {}", status);
                ApiError::ServerError(body_or(response, &fallback).await)
            }
            status => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
        }
    }

    /// Decode an OK response as JSON, or map the error status.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Self::status_error(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Authenticated GET returning the raw response (status checked).
    async fn get_raw(
        &self,
        token: &AuthToken,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Basic {}", token.as_str()))
            .query(query)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Self::status_error(status, response).await);
        }
        Ok(response)
    }

    /// Authenticated GET decoded as JSON.
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AuthToken,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.get_raw(token, path, query).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn try_login(&self, auth: &AuthenticationModel) -> Result<AuthToken> {
        self.rate_limiter.until_ready().await;

        #[derive(serde::Serialize)]
        struct LoginRequest<'a> {
            name: &'a str,
            password: &'a str,
            #[serde(rename = "clientId", skip_serializing_if = "Option::is_none")]
            client_id: Option<&'a str>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct LoginResponse {
            is_success: bool,
            #[serde(default)]
            token: Option<String>,
            #[serde(default)]
            reason: Option<String>,
        }

        let url = format!("{}/Authentication/Login", self.base_url);
        let body = LoginRequest {
            name: &auth.username,
            password: &auth.password,
            client_id: auth.client_id.as_deref(),
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)?;

        let login: LoginResponse = Self::decode(response).await?;
        if !login.is_success {
            debug!(
                "login rejected: {}",
                login.reason.as_deref().unwrap_or("no reason given")
            );
            return Err(ApiError::Unauthorized);
        }

        login
            .token
            .filter(|token| !token.is_empty())
            .map(AuthToken::new)
            .ok_or_else(|| ApiError::InvalidResponse("Login response missing token".to_string()))
    }

    async fn try_engine_groups(&self, token: &AuthToken) -> Result<Vec<EngineGroup>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct EngineGroupsResponse {
            is_success: bool,
            #[serde(default)]
            engine_groups: Vec<EngineGroup>,
            #[serde(default)]
            reason: Option<String>,
        }

        let response: EngineGroupsResponse = self
            .get_json(token, "/EngineGroup/GetEngineGroupsForClient", &[])
            .await?;
        if !response.is_success {
            return Err(unsuccessful(response.reason));
        }
        Ok(response.engine_groups)
    }

    async fn try_configs(&self, token: &AuthToken) -> Result<Vec<ScanConfig>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct ConfigsResponse {
            is_success: bool,
            #[serde(default)]
            configs: Vec<ScanConfig>,
            #[serde(default)]
            reason: Option<String>,
        }

        let response: ConfigsResponse = self.get_json(token, "/Config/GetConfigs", &[]).await?;
        if !response.is_success {
            return Err(unsuccessful(response.reason));
        }
        Ok(response.configs)
    }

    async fn try_run_scan(&self, token: &AuthToken, config_name: &str) -> Result<ScanResult> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct ScanIdHolder {
            id: String,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct RunScanResponse {
            is_success: bool,
            #[serde(default)]
            scan: Option<ScanIdHolder>,
            #[serde(default)]
            reason: Option<String>,
        }

        // The wire call takes a config id; resolve the name first.
        let config = self
            .try_configs(token)
            .await?
            .into_iter()
            .find(|config| config.name.eq_ignore_ascii_case(config_name))
            .ok_or_else(|| ApiError::NotFound(format!("Scan config '{}'", config_name)))?;

        self.rate_limiter.until_ready().await;

        let url = format!("{}/Scan/RunScan", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Basic {}", token.as_str()))
            .json(&serde_json::json!({ "configId": config.id }))
            .send()
            .await
            .map_err(ApiError::from)?;

        let run: RunScanResponse = Self::decode(response).await?;
        if !run.is_success {
            return Err(unsuccessful(run.reason));
        }

        let scan = run
            .scan
            .ok_or_else(|| ApiError::InvalidResponse("RunScan response missing scan".to_string()))?;
        Ok(ScanResult::started(scan.id))
    }

    async fn try_scan_status(&self, token: &AuthToken, scan_id: &str) -> Result<String> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct StatusResponse {
            is_success: bool,
            #[serde(default)]
            status: Option<String>,
            #[serde(default)]
            reason: Option<String>,
        }

        let response: StatusResponse = self
            .get_json(token, "/Scan/GetScanStatus", &[("scanId", scan_id)])
            .await?;
        if !response.is_success {
            return Err(unsuccessful(response.reason));
        }
        response
            .status
            .ok_or_else(|| ApiError::InvalidResponse("Status response missing status".to_string()))
    }

    /// Shared shape of the IsScanFinished / HasReport boolean endpoints.
    async fn try_scan_flag(&self, token: &AuthToken, path: &str, scan_id: &str) -> Result<bool> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct FlagResponse {
            is_success: bool,
            #[serde(default)]
            result: bool,
            #[serde(default)]
            reason: Option<String>,
        }

        let response: FlagResponse = self.get_json(token, path, &[("scanId", scan_id)]).await?;
        if !response.is_success {
            return Err(unsuccessful(response.reason));
        }
        Ok(response.result)
    }

    async fn try_save_config(
        &self,
        token: &AuthToken,
        name: &str,
        target: &Url,
        engine_group_id: &str,
    ) -> Result<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct SaveConfigResponse {
            is_success: bool,
            #[serde(default)]
            reason: Option<String>,
        }

        // Upsert: reuse the existing id when the name is already taken,
        // otherwise the zero GUID tells the service to create.
        let config_id = self
            .try_configs(token)
            .await?
            .into_iter()
            .find(|config| config.name.eq_ignore_ascii_case(name))
            .map(|config| config.id)
            .unwrap_or_else(|| ZERO_GUID.to_string());

        let xml = CONFIG_XML_TEMPLATE
            .replace("{name}", &xml_escape(name))
            .replace("{url}", &xml_escape(target.as_str()));

        let config = serde_json::json!({
            "Id": config_id,
            "Name": name,
            "EngineGroupId": engine_group_id,
            "Xml": xml,
        });

        self.rate_limiter.until_ready().await;

        let url = format!("{}/Config/SaveConfig", self.base_url);
        let form = Form::new().text("config", config.to_string());
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Basic {}", token.as_str()))
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let saved: SaveConfigResponse = Self::decode(response).await?;
        if !saved.is_success {
            return Err(unsuccessful(saved.reason));
        }
        Ok(())
    }

    async fn try_vulnerabilities_summary(
        &self,
        token: &AuthToken,
        scan_id: &str,
    ) -> Result<String> {
        let response = self
            .get_raw(
                token,
                "/Report/GetVulnerabilitiesSummaryXml",
                &[("scanId", scan_id)],
            )
            .await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read summary: {}", e)))
    }

    async fn try_report_zip(&self, token: &AuthToken, scan_id: &str) -> Result<ReportZip> {
        let response = self
            .get_raw(token, "/Report/GetReportZip", &[("scanId", scan_id)])
            .await?;
        Ok(ReportZip::from_response(response))
    }

    async fn try_clients(&self, token: &AuthToken) -> Result<Vec<ClientIdNamePair>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct ClientsResponse {
            is_success: bool,
            #[serde(default)]
            clients: Vec<ClientIdNamePair>,
            #[serde(default)]
            reason: Option<String>,
        }

        let response: ClientsResponse = self.get_json(token, "/Client/GetClients", &[]).await?;
        if !response.is_success {
            return Err(unsuccessful(response.reason));
        }
        Ok(response.clients)
    }
}

fn unsuccessful(reason: Option<String>) -> ApiError {
    ApiError::Unsuccessful(reason.unwrap_or_else(|| "no reason given".to_string()))
}

/// Escape the characters XML forbids in text content and attributes.
fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert an internal result to the contract's absence signaling,
/// keeping the cause visible under `--debug`.
fn absent_on_error<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("{} failed: {}", operation, err);
            None
        }
    }
}

#[async_trait]
impl EnterpriseApi for EnterpriseClient {
    fn url(&self) -> &str {
        &self.base_url
    }

    async fn login(&self, auth: &AuthenticationModel) -> Option<AuthToken> {
        absent_on_error("login", self.try_login(auth).await)
    }

    async fn test_authentication(&self, auth: &AuthenticationModel) -> bool {
        self.login(auth).await.is_some()
    }

    async fn get_engine_group_names_for_client(&self, token: &AuthToken) -> Option<Vec<String>> {
        let groups = absent_on_error("engine group listing", self.try_engine_groups(token).await)?;
        Some(groups.into_iter().map(|group| group.name).collect())
    }

    async fn get_engine_group_id_from_name(
        &self,
        token: &AuthToken,
        engine_group_name: &str,
    ) -> Option<String> {
        let groups = absent_on_error("engine group lookup", self.try_engine_groups(token).await)?;
        groups
            .into_iter()
            .find(|group| group.name == engine_group_name)
            .map(|group| group.id)
    }

    async fn run_scan_by_config_name(&self, token: &AuthToken, config_name: &str) -> ScanResult {
        match self.try_run_scan(token, config_name).await {
            Ok(result) => result,
            Err(err) => {
                debug!("run scan failed: {}", err);
                ScanResult::failed()
            }
        }
    }

    async fn get_scan_status(&self, token: &AuthToken, scan_id: &str) -> Option<String> {
        absent_on_error("scan status", self.try_scan_status(token, scan_id).await)
    }

    async fn is_scan_finished(&self, token: &AuthToken, scan_id: &str) -> bool {
        absent_on_error(
            "scan finished check",
            self.try_scan_flag(token, "/Scan/IsScanFinished", scan_id).await,
        )
        .unwrap_or(false)
    }

    async fn has_report(&self, token: &AuthToken, scan_id: &str) -> bool {
        absent_on_error(
            "report check",
            self.try_scan_flag(token, "/Scan/HasReport", scan_id).await,
        )
        .unwrap_or(false)
    }

    async fn get_config_names(&self, token: &AuthToken) -> Option<Vec<String>> {
        let configs = absent_on_error("config listing", self.try_configs(token).await)?;
        Some(configs.into_iter().map(|config| config.name).collect())
    }

    async fn save_config(
        &self,
        token: &AuthToken,
        name: &str,
        target: &Url,
        engine_group_id: &str,
    ) -> bool {
        absent_on_error(
            "config save",
            self.try_save_config(token, name, target, engine_group_id).await,
        )
        .is_some()
    }

    async fn get_vulnerabilities_summary_xml(
        &self,
        token: &AuthToken,
        scan_id: &str,
    ) -> Option<String> {
        absent_on_error(
            "vulnerability summary",
            self.try_vulnerabilities_summary(token, scan_id).await,
        )
    }

    async fn get_report_zip(&self, token: &AuthToken, scan_id: &str) -> Option<ReportZip> {
        absent_on_error("report download", self.try_report_zip(token, scan_id).await)
    }

    async fn get_client_name_id_pairs(&self, token: &AuthToken) -> Option<Vec<ClientIdNamePair>> {
        absent_on_error("client listing", self.try_clients(token).await)
    }
}
