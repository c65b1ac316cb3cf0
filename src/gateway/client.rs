//! HTTP client for the persona gateway.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::types::{ChatReply, ChatRequest, EventSnapshot, QuickStartReply, StatusSnapshot};

/// Errors that can occur when talking to the gateway.
///
/// Each variant carries enough context to diagnose the failure without
/// needing to inspect the originating error directly. Errors are caught at
/// the call site, logged, and never re-thrown past the request boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway replied with a non-2xx HTTP status code.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },
    /// Response body could not be parsed as the expected JSON structure.
    #[error("JSON parse error from {url}: {detail}")]
    Json { url: String, detail: String },
    /// A TCP-level connection could not be established.
    #[error("connection failed to {url}: {detail}")]
    Connect { url: String, detail: String },
}

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the persona gateway (e.g. `http://localhost:5000`).
    pub base_url: String,
    /// How often the event poller fetches `/api/events/current`.
    pub poll_interval: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Per-request read timeout.
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Create a config with sensible defaults.
    ///
    /// - poll_interval: 1 h (the event schedule changes slowly)
    /// - connect_timeout: 3 s
    /// - request_timeout: 30 s
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            poll_interval: Duration::from_secs(60 * 60),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the gateway's five JSON endpoints.
///
/// Cheap to clone; clones share the underlying connection pool. Use
/// [`GatewayClientBuilder`] for construction.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl GatewayClient {
    /// Start building a client aimed at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> GatewayClientBuilder {
        GatewayClientBuilder::new(base_url)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// `GET /api/status` — full domain state snapshot.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, GatewayError> {
        self.get_json("/api/status").await
    }

    /// `POST /api/chat` — send one user message, receive the AI reply plus
    /// the post-turn status snapshot and evolution flag.
    pub async fn send_chat(&self, message: &str) -> Result<ChatReply, GatewayError> {
        let body = ChatRequest { message: message.to_string() };
        self.post_json("/api/chat", Some(&body)).await
    }

    /// `POST /api/reset` — discard all server-side memories and progress.
    /// Returns the fresh status snapshot.
    pub async fn reset(&self) -> Result<StatusSnapshot, GatewayError> {
        self.post_json::<ChatRequest, _>("/api/reset", None).await
    }

    /// `GET /api/events/current` — active events, themes, and bonuses.
    pub async fn fetch_events(&self) -> Result<EventSnapshot, GatewayError> {
        self.get_json("/api/events/current").await
    }

    /// `POST /api/demo/quick-start` — seed a near-evolution demo session.
    pub async fn quick_start(&self) -> Result<QuickStartReply, GatewayError> {
        self.post_json::<ChatRequest, _>("/api/demo/quick-start", None).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.config.base_url, path);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            GatewayError::Connect { url: url.clone(), detail: e.to_string() }
        })?;
        Self::decode(url, resp).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut req = self.client.post(&url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| {
            GatewayError::Connect { url: url.clone(), detail: e.to_string() }
        })?;
        Self::decode(url, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        url: String,
        resp: reqwest::Response,
    ) -> Result<T, GatewayError> {
        if !resp.status().is_success() {
            return Err(GatewayError::Http { status: resp.status().as_u16(), url });
        }
        let bytes = resp.bytes().await.map_err(|e| GatewayError::Json {
            url: url.clone(),
            detail: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Json {
            url,
            detail: e.to_string(),
        })
    }
}

/// Builder for [`GatewayClient`].
pub struct GatewayClientBuilder {
    config: GatewayConfig,
}

impl GatewayClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { config: GatewayConfig::new(base_url) }
    }

    /// Override the event poll interval (default 1 h).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Override the TCP connect timeout (default 3 s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Override the per-request read timeout (default 30 s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Consume the builder and construct a [`GatewayClient`].
    pub fn build(self) -> GatewayClient {
        // reqwest::Client::builder() can fail in extreme environments;
        // unwrap_or_default() falls back to a default client instead of
        // panicking.
        let client = reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.request_timeout)
            .build()
            .unwrap_or_default();

        GatewayClient { config: self.config, client }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_stores_base_url() {
        let cfg = GatewayConfig::new("http://example.com:5000");
        assert_eq!(cfg.base_url, "http://example.com:5000");
    }

    #[test]
    fn config_new_default_poll_interval_one_hour() {
        let cfg = GatewayConfig::new("http://localhost:5000");
        assert_eq!(cfg.poll_interval, Duration::from_secs(3600));
    }

    #[test]
    fn builder_defaults() {
        let client = GatewayClient::builder("http://localhost:5000").build();
        assert_eq!(client.config().base_url, "http://localhost:5000");
        assert_eq!(client.config().connect_timeout, Duration::from_secs(3));
        assert_eq!(client.config().request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides_all_options() {
        let client = GatewayClient::builder("http://127.0.0.1:8000")
            .poll_interval(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(1))
            .request_timeout(Duration::from_secs(5))
            .build();
        assert_eq!(client.config().base_url, "http://127.0.0.1:8000");
        assert_eq!(client.config().poll_interval, Duration::from_secs(60));
        assert_eq!(client.config().connect_timeout, Duration::from_secs(1));
        assert_eq!(client.config().request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn client_is_cloneable() {
        let client = GatewayClient::builder("http://localhost:5000").build();
        let clone = client.clone();
        assert_eq!(clone.config().base_url, client.config().base_url);
    }

    #[test]
    fn gateway_error_display_http() {
        let err = GatewayError::Http {
            status: 503,
            url: "http://localhost:5000/api/status".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("503"), "expected status in display: {s}");
        assert!(s.contains("/api/status"), "expected url in display: {s}");
    }

    #[test]
    fn gateway_error_display_json() {
        let err = GatewayError::Json {
            url: "http://localhost:5000/api/chat".to_string(),
            detail: "missing field `ai_response`".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("/api/chat"), "url in display: {s}");
        assert!(s.contains("missing field"), "detail in display: {s}");
    }

    #[test]
    fn gateway_error_display_connect() {
        let err = GatewayError::Connect {
            url: "http://localhost:5000".to_string(),
            detail: "connection refused".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("connection refused"), "detail in display: {s}");
    }

    #[test]
    fn gateway_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        let err = GatewayError::Http { status: 500, url: "x".to_string() };
        assert_error(&err);
    }

    #[tokio::test]
    async fn connect_failure_yields_connect_error() {
        // Port 1 on localhost is essentially guaranteed closed.
        let client = GatewayClient::builder("http://127.0.0.1:1")
            .connect_timeout(Duration::from_millis(200))
            .request_timeout(Duration::from_millis(500))
            .build();
        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(err, GatewayError::Connect { .. }), "got {err}");
    }
}
