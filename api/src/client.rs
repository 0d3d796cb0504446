use crate::FixtureId;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const SOFASCORE_API: &str = "https://www.sofascore.com/api/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where raw feeds come from. `Ok(None)` means the fixture has no feed, which
/// callers treat as zero incidents rather than an error.
pub trait FeedSource: Send + Sync {
    fn fetch_incidents(&self, fixture_id: FixtureId) -> impl Future<Output = ApiResult<Option<Value>>> + Send;

    fn fetch_shotmap(&self, fixture_id: FixtureId) -> impl Future<Output = ApiResult<Option<Value>>> + Send;
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, source) => write!(f, "Parse error for {source}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) => Some(e),
            _ => None,
        }
    }
}

/// Empty payloads (`null`, `{}`, `[]`) carry no incidents.
fn non_empty(value: Value) -> Option<Value> {
    let empty = match &value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    (!empty).then_some(value)
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// SofaScore event API client.
#[derive(Debug, Clone)]
pub struct SofascoreApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SofascoreApi {
    fn default() -> Self {
        Self::new(SOFASCORE_API, DEFAULT_TIMEOUT)
    }
}

impl SofascoreApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("matchstate/0.1 (incident normalizer)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout,
        }
    }

    /// GET a JSON document. Client errors (4xx) mean "no data for this
    /// fixture" and come back as `None`.
    async fn get(&self, url: &str) -> ApiResult<Option<Value>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => {
                let body = res
                    .text()
                    .await
                    .map_err(|e| ApiError::Network(e, url.to_owned()))?;
                let value: Value = serde_json::from_str(&body)
                    .map_err(|e| ApiError::Parsing(e.to_string(), url.to_owned()))?;
                Ok(non_empty(value))
            }
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(None)
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

impl FeedSource for SofascoreApi {
    async fn fetch_incidents(&self, fixture_id: FixtureId) -> ApiResult<Option<Value>> {
        let url = format!("{}/event/{fixture_id}/incidents", self.base_url);
        self.get(&url).await
    }

    async fn fetch_shotmap(&self, fixture_id: FixtureId) -> ApiResult<Option<Value>> {
        let url = format!("{}/event/{fixture_id}/shotmap", self.base_url);
        self.get(&url).await
    }
}

// ---------------------------------------------------------------------------
// Local snapshots
// ---------------------------------------------------------------------------

/// Feeds saved on disk as `{root}/{fixture_id}/incidents.json` and
/// `{root}/{fixture_id}/shotmap.json`.
#[derive(Debug, Clone)]
pub struct LocalFeed {
    root: PathBuf,
}

impl LocalFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, fixture_id: FixtureId, file: &str) -> ApiResult<Option<Value>> {
        let path = self.root.join(fixture_id.to_string()).join(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ApiError::Parsing(e.to_string(), path.display().to_string()))?;
        Ok(non_empty(value))
    }
}

impl FeedSource for LocalFeed {
    async fn fetch_incidents(&self, fixture_id: FixtureId) -> ApiResult<Option<Value>> {
        self.read(fixture_id, "incidents.json")
    }

    async fn fetch_shotmap(&self, fixture_id: FixtureId) -> ApiResult<Option<Value>> {
        self.read(fixture_id, "shotmap.json")
    }
}
