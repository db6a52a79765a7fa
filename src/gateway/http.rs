use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, IntoUrl, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use crate::config::GatewayConfig;
use crate::errors::AlertDeskError;
use crate::models::{
    AlertQuery, AlertRecord, BulkActionRequest, BulkOutcome, ExceptionRequest, FilePolicyRecord,
    Page, PageRequest, Policy, PolicyMoveRequest, PolicyRemoveRequest, ServerAssignment,
    ServerRecord,
};
use super::AlertGateway;

/// Talks to the REST backend served by `alertdesk serve`.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AlertDeskError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertDeskError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, AlertDeskError> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            AlertDeskError::Config("gateway.base_url is required in http mode".into())
        })?;
        Self::new(base_url, Duration::from_secs(config.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `path` plus one percent-encoded trailing segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, AlertDeskError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| AlertDeskError::Config(format!("Invalid gateway URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AlertDeskError::Config(format!("Gateway URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &(impl Serialize + Sync),
    ) -> Result<T, AlertDeskError> {
        debug!(path, "GET");
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        decode(resp).await
    }

    async fn get_plain<T: DeserializeOwned>(&self, url: impl IntoUrl) -> Result<T, AlertDeskError> {
        let resp = self.client.get(url).send().await?;
        decode(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, AlertDeskError> {
        debug!(path, "POST");
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        decode(resp).await
    }
}

/// Map a response to `T`, turning `{"error": …}` bodies into typed errors.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AlertDeskError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let message = match resp.json::<Value>().await {
        Ok(body) => body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => status.to_string(),
    };

    Err(match status {
        StatusCode::NOT_FOUND => AlertDeskError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AlertDeskError::Validation(message),
        StatusCode::CONFLICT => AlertDeskError::InvalidTransition(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AlertDeskError::Timeout(message),
        s if s.is_server_error() => AlertDeskError::Gateway(format!("{}: {}", s, message)),
        _ => AlertDeskError::Gateway(message),
    })
}

#[derive(Serialize)]
struct PolicyListQuery {
    policy: Policy,
    current: usize,
    #[serde(rename = "pageSize")]
    page_size: usize,
}

#[async_trait]
impl AlertGateway for HttpGateway {
    async fn fetch_pending(&self, query: &AlertQuery) -> Result<Page<AlertRecord>, AlertDeskError> {
        self.get("/analysis/requests/pending", query).await
    }

    async fn fetch_completed(&self, query: &AlertQuery) -> Result<Page<AlertRecord>, AlertDeskError> {
        self.get("/analysis/requests/completed", query).await
    }

    async fn fetch_detection(&self, id: &str) -> Result<AlertRecord, AlertDeskError> {
        let url = self.url_with_segment("/analysis/detection", id)?;
        debug!(url = %url, "GET");
        self.get_plain(url).await
    }

    async fn bulk_process(&self, request: &BulkActionRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.post("/analysis/requests/bulk-action", request).await
    }

    async fn set_exception(
        &self,
        request: &ExceptionRequest,
    ) -> Result<Vec<FilePolicyRecord>, AlertDeskError> {
        request.validate()?;
        self.post("/analysis/requests/exception", request).await
    }

    async fn fetch_policies(
        &self,
        policy: Policy,
        page: PageRequest,
    ) -> Result<Page<FilePolicyRecord>, AlertDeskError> {
        let query = PolicyListQuery {
            policy,
            current: page.current,
            page_size: page.page_size,
        };
        self.get("/file-policies", &query).await
    }

    async fn bulk_move(&self, request: &PolicyMoveRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.post("/file-policies/bulk-move", request).await
    }

    async fn bulk_remove(&self, request: &PolicyRemoveRequest) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.post("/file-policies/bulk-remove", request).await
    }

    async fn list_servers(&self) -> Result<Vec<ServerRecord>, AlertDeskError> {
        debug!(path = "/policy/servers", "GET");
        self.get_plain(self.url("/policy/servers")).await
    }

    async fn assign_servers(&self, request: &ServerAssignment) -> Result<BulkOutcome, AlertDeskError> {
        request.validate()?;
        self.post("/policy/servers/assign", request).await
    }

    fn gateway_name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gw = HttpGateway::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(gw.url("/policy/servers"), "http://localhost:8080/policy/servers");
    }

    #[test]
    fn test_detection_id_is_one_path_segment() {
        let gw = HttpGateway::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        let url = gw.url_with_segment("/analysis/detection", "a?b#c/d").unwrap();
        assert_eq!(url.path(), "/analysis/detection/a%3Fb%23c%2Fd");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_http_mode_requires_base_url() {
        let config = GatewayConfig { base_url: None, ..Default::default() };
        assert!(matches!(HttpGateway::from_config(&config), Err(AlertDeskError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // port 9 (discard) is never served on loopback in CI
        let gw = HttpGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = gw.list_servers().await.unwrap_err();
        assert!(err.classify().transient, "unexpected error: {:?}", err);
    }
}
