//! reqwest-backed [`Transport`] shared by all remote clients.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::LlmError;
use super::traits::Transport;
use super::types::{HttpRequest, RawResponse};

/// Configuration for the underlying HTTP connection pool
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total time for a single request, connect included
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: None,
        }
    }
}

/// One pooled `reqwest::Client`, safe to share between concurrent calls.
///
/// Performs exactly one POST per [`Transport::send`]; retrying is the
/// caller's business.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: HttpClientConfig) -> Result<Self, LlmError> {
        let default_ua = format!("textgen-client/{}", env!("CARGO_PKG_VERSION"));
        let ua = config.user_agent.as_deref().unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| {
                LlmError::Configuration(format!("Failed to build reqwest client: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(
        name = "http_post_json",
        level = "debug",
        skip(self, request),
        fields(url = %request.url),
        err
    )]
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, LlmError> {
        let mut req_builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "Request timed out".to_string()
            } else {
                "Request failed".to_string()
            };
            LlmError::transport(message, e)
        })?;

        let status = res.status().as_u16();
        let body = res
            .bytes()
            .await
            .map_err(|e| LlmError::transport("Failed to read response body", e))?;

        debug!(status, bytes = body.len(), "received response");
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    #[tokio::test]
    async fn test_send_posts_json_and_returns_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({ "prompt": "hi" })))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(HttpClientConfig::default()).unwrap();
        let response = transport
            .send(&HttpRequest {
                url: format!("{}/v1/completions", server.uri()),
                headers: vec![("Authorization".into(), "Bearer secret".into())],
                body: json!({ "prompt": "hi" }),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(&response.body[..], b"overloaded");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(HttpClientConfig {
            timeout: Duration::from_millis(50),
            user_agent: None,
        })
        .unwrap();
        let err = transport
            .send(&HttpRequest {
                url: server.uri(),
                headers: Vec::new(),
                body: json!({}),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Transport { .. }));
        assert!(err.is_retryable());
    }
}
