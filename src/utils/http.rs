// src/utils/http.rs

//! HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

/// Source of raw page bodies.
///
/// Implementations must return `NotFound` for HTTP 404 and `Network` for
/// every other failure. No retries.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(default_headers(config)?)
        .timeout(Duration::from_secs(config.timeout_secs));

    if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| AppError::config(format!("invalid proxy '{proxy}': {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}

/// Browser-like header profile. Accept-Encoding is left to the client's
/// decompression layer.
fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let value = |v: &str| {
        HeaderValue::from_str(v).map_err(|e| AppError::config(format!("invalid header '{v}': {e}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, value(&config.accept)?);
    headers.insert(header::ACCEPT_LANGUAGE, value(&config.accept_language)?);
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    Ok(headers)
}

/// [`PageFetcher`] backed by a pooled `reqwest` client.
///
/// Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::network(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("page does not exist: {url}")));
        }
        if !status.is_success() {
            return Err(AppError::status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| AppError::network(url, e))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn fetcher(timeout_secs: u64) -> HttpFetcher {
        let config = ClientConfig {
            timeout_secs,
            ..ClientConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_body_on_200() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/video/a")
                    .header_exists("user-agent")
                    .header("accept-language", "en-US,en;q=0.9");
                then.status(200).body("<html>ok</html>");
            })
            .await;

        let body = fetcher(5).fetch(&server.url("/video/a")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn fetch_maps_404_to_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404).body("gone");
            })
            .await;

        let err = fetcher(5).fetch(&server.url("/missing")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn fetch_maps_other_status_to_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/busy");
                then.status(503);
            })
            .await;

        let err = fetcher(5).fetch(&server.url("/busy")).await.unwrap_err();
        assert_eq!(err.http_status(), Some(503));
    }

    #[tokio::test]
    async fn fetch_timeout_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200).delay(Duration::from_secs(3)).body("late");
            })
            .await;

        let err = fetcher(1).fetch(&server.url("/slow")).await.unwrap_err();
        assert!(matches!(err, AppError::Network { status: None, .. }));
    }

    #[tokio::test]
    async fn fetch_connection_failure_is_network_error() {
        // Port 9 on loopback is not listening in the test environment.
        let err = fetcher(2).fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, AppError::Network { status: None, .. }));
    }

    #[test]
    fn invalid_proxy_is_config_error() {
        let config = ClientConfig {
            proxy: Some("http://bad host:99".to_string()),
            ..ClientConfig::default()
        };
        assert!(matches!(
            create_async_client(&config),
            Err(AppError::Config(_))
        ));
    }
}
