use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{CONTENT_TYPE, COOKIE};

use crate::{ApiError, FailureKind};

/// Reading time reported to the forum for each marked post, in milliseconds.
pub const POST_DWELL_MS: u32 = 3000;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub session_cookie: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://linux.do".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: "skimmer/0.1".to_string(),
            session_cookie: None,
        }
    }
}

/// Boundary to the forum. Implemented by [`ReqwestForum`] in production and
/// by fakes in orchestration tests.
#[async_trait::async_trait]
pub trait ForumApi: Send + Sync {
    /// Fetches a topic page; accepts absolute URLs or site-relative paths.
    async fn fetch_topic_html(&self, url: &str) -> Result<String, ApiError>;
    /// Fetches one listing page (page 0 is the first).
    async fn fetch_listing_html(&self, page: u32) -> Result<String, ApiError>;
    /// Replays the position-tracking call that marks one post as read.
    async fn mark_read(&self, topic_id: u64, position: u32) -> Result<(), ApiError>;
    /// Caches the CSRF token scraped from a fetched page.
    fn set_csrf_token(&self, token: String);
}

pub struct ReqwestForum {
    settings: ClientSettings,
    client: reqwest::Client,
    csrf_token: Mutex<Option<String>>,
}

impl ReqwestForum {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            csrf_token: Mutex::new(None),
        })
    }

    fn absolute(&self, path_or_url: &str) -> Result<reqwest::Url, ApiError> {
        if let Ok(url) = reqwest::Url::parse(path_or_url) {
            return Ok(url);
        }
        let base = reqwest::Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        base.join(path_or_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_html(&self, url: reqwest::Url) -> Result<String, ApiError> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.settings.session_cookie {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response.text().await.map_err(map_reqwest_error)
    }

    fn cached_csrf_token(&self) -> Option<String> {
        self.csrf_token.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait::async_trait]
impl ForumApi for ReqwestForum {
    async fn fetch_topic_html(&self, url: &str) -> Result<String, ApiError> {
        self.get_html(self.absolute(url)?).await
    }

    async fn fetch_listing_html(&self, page: u32) -> Result<String, ApiError> {
        let path = format!("/latest?no_definitions=true&page={page}");
        self.get_html(self.absolute(&path)?).await
    }

    async fn mark_read(&self, topic_id: u64, position: u32) -> Result<(), ApiError> {
        let token = self
            .cached_csrf_token()
            .ok_or_else(|| ApiError::new(FailureKind::MissingToken, "no csrf token cached"))?;

        let topic_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        // The forum keys timings by the stringified post position.
        let mut timings = serde_json::Map::new();
        timings.insert(position.to_string(), serde_json::Value::from(POST_DWELL_MS));
        let body = serde_json::json!({
            "topic_id": topic_id,
            "topic_time": topic_time,
            "timings": timings,
        });

        let mut request = self
            .client
            .post(self.absolute("/topics/timings")?)
            .header(CONTENT_TYPE, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .header("X-CSRF-Token", token)
            .body(body.to_string());
        if let Some(cookie) = &self.settings.session_cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }

    fn set_csrf_token(&self, token: String) {
        if let Ok(mut guard) = self.csrf_token.lock() {
            *guard = Some(token);
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
