use async_trait::async_trait;
use std::time::Duration;

use crate::core::config::LinkCheckConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Request(String),
}

/// Outbound HTTP used by link health checks and preview fetching
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    /// Issue a HEAD request and return the final status code (after redirects)
    async fn head(&self, url: &str) -> Result<u16, FetchError>;

    /// GET an HTML document, truncated to the configured size cap
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    head_timeout: Duration,
    get_timeout: Duration,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &LinkCheckConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            head_timeout: config.health_check_timeout,
            get_timeout: config.preview_timeout,
            max_bytes: config.preview_max_bytes,
        })
    }

    fn map_error(e: reqwest::Error, timeout: Duration) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(timeout.as_secs())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Only absolute http(s) URLs are fetched
pub fn parse_http_url(url: &str) -> Result<reqwest::Url, FetchError> {
    let parsed =
        reqwest::Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

#[async_trait]
impl LinkFetcher for HttpFetcher {
    async fn head(&self, url: &str) -> Result<u16, FetchError> {
        let url = parse_http_url(url)?;
        let response = self
            .client
            .head(url)
            .timeout(self.head_timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(e, self.head_timeout))?;

        Ok(response.status().as_u16())
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_http_url(url)?;
        let mut response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .timeout(self.get_timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(e, self.get_timeout))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::map_error(e, self.get_timeout))?
        {
            let remaining = self.max_bytes.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
            if body.len() >= self.max_bytes {
                break;
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url_accepts_http_and_https() {
        assert!(parse_http_url("https://example.com/a").is_ok());
        assert!(parse_http_url(" http://example.com ").is_ok());
    }

    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(matches!(
            parse_http_url("file:///etc/passwd"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_http_url("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            FetchError::Timeout(5).to_string(),
            "Request timed out after 5 seconds"
        );
    }
}
