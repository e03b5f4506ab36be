use crate::error::{Result, SyncError};
use crate::retry::{with_retry_if, RetryPolicy};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("refdata-sync/", env!("CARGO_PKG_VERSION"));

const UTF8_BOM: &str = "\u{feff}";

/// HTTP GET client with a fixed timeout, bounded retries and an HTTPS-only guard.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
    allow_insecure: bool,
}

impl Fetcher {
    /// HTTPS-only fetcher. Redirects to plain `http://` are refused as well.
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        Self::build(timeout, policy, false)
    }

    /// Fetcher that also accepts plain `http://` endpoints. Only for local mock servers.
    pub fn insecure(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        Self::build(timeout, policy, true)
    }

    fn build(timeout: Duration, policy: RetryPolicy, allow_insecure: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .https_only(!allow_insecure)
            .build()
            .map_err(|e| SyncError::transport("<client>", None, e.to_string()))?;

        Ok(Self {
            client,
            policy,
            allow_insecure,
        })
    }

    /// Reject anything that is not an absolute HTTPS URL.
    pub fn validate_url(&self, url: &str) -> Result<()> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| SyncError::Validation(format!("invalid URL {}: {}", url, e)))?;

        match parsed.scheme() {
            "https" => Ok(()),
            "http" if self.allow_insecure => Ok(()),
            scheme => Err(SyncError::Validation(format!(
                "refusing non-HTTPS URL ({} scheme): {}",
                scheme, url
            ))),
        }
    }

    /// GET `url` and return the raw body, retrying transient failures.
    pub async fn fetch(&self, url: &str, accept: Option<&str>) -> Result<Vec<u8>> {
        self.validate_url(url)?;

        let body = with_retry_if(
            &self.policy,
            &format!("GET {}", url),
            || self.get_once(url, accept),
            |e| self.policy.should_retry(e),
        )
        .await?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// GET `url` and decode the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch(url, Some("application/json")).await?;
        serde_json::from_slice(&body)
            .map_err(|e| SyncError::content(url, format!("invalid JSON: {}", e)))
    }

    /// GET `url` and decode the body as UTF-8 text with any leading BOM removed.
    pub async fn fetch_text(&self, url: &str, accept: Option<&str>) -> Result<String> {
        let body = self.fetch(url, accept).await?;
        let text = String::from_utf8(body)
            .map_err(|e| SyncError::content(url, format!("invalid UTF-8: {}", e)))?;

        Ok(match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    async fn get_once(&self, url: &str, accept: Option<&str>) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::transport(url, None, describe_request_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::transport(
                url,
                Some(status.as_u16()),
                format!("HTTP {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::transport(url, None, describe_request_error(&e)))?;

        Ok(body.to_vec())
    }
}

fn describe_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
