//! The gateway client

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Request body for `POST /images/generate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub question_id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// Successful gateway response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    pub image_url: String,
    pub prompt: String,
    pub style: String,
    pub provider: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// HTTP client for the generation gateway.
pub struct GatewayClient {
    http: Client,
    config: ClientConfig,
    endpoint: Url,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;
        let endpoint = base
            .join("/images/generate")
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            http,
            config,
            endpoint,
        })
    }

    /// Single generation attempt, no retries.
    pub async fn generate(
        &self,
        params: &GenerateParams,
    ) -> Result<GenerationResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<GenerationResponse>()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => status.to_string(),
        };

        Err(match status.as_u16() {
            429 => ClientError::RateLimited,
            s if (500..600).contains(&s) => ClientError::ServerError { status: s },
            s => ClientError::Rejected { status: s, message },
        })
    }

    /// Generate with bounded retries over timeouts, transient network
    /// failures, and 5xx responses. Everything else returns immediately.
    pub async fn generate_with_retry(
        &self,
        params: &GenerateParams,
    ) -> Result<GenerationResponse, ClientError> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.generate(params).await {
                Ok(response) => {
                    debug!(attempt, question_id = %params.question_id, "generation succeeded");
                    return Ok(response);
                }
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = self.config.delay_for_attempt(attempt);
                    warn!(
                        attempt,
                        question_id = %params.question_id,
                        retry_in_ms = delay.as_millis() as u64,
                        "attempt failed, retrying: {err}"
                    );
                    last_error = Some(err);
                    tokio::time::sleep(delay).await;
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => last_error = Some(err),
            }
        }

        Err(ClientError::RetriesExhausted {
            attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempt recorded".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_json_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn params() -> GenerateParams {
        GenerateParams {
            question_id: "q1".into(),
            prompt: "a cube".into(),
            style: Some("minimal".into()),
            quality: None,
        }
    }

    fn success_body() -> serde_json::Value {
        serde_json::json!({
            "success": true,
            "imageUrl": "data:image/png;base64,aGk=",
            "prompt": "compiled",
            "style": "minimal",
            "provider": "stability"
        })
    }

    async fn client(server: &MockServer) -> GatewayClient {
        GatewayClient::new(
            ClientConfig::default()
                .with_base_url(server.uri())
                .with_base_delay(Duration::from_millis(1)),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = GatewayClient::new(ClientConfig::default().with_base_url("not a url"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_params_serialize_camel_case() {
        let json = serde_json::to_string(&params()).unwrap();
        assert!(json.contains("\"questionId\""));
        assert!(!json.contains("\"quality\""));
    }

    #[tokio::test]
    async fn test_first_try_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .await
            .generate_with_retry(&params())
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.provider, "stability");
    }

    #[tokio::test]
    async fn test_two_server_errors_then_success_makes_three_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generate"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/images/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .await
            .generate_with_retry(&params())
            .await
            .unwrap();
        assert_eq!(response.image_url, "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn test_bad_request_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generate"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "type": "validation", "message": "prompt is required" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .generate_with_retry(&params())
            .await
            .unwrap_err();
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "prompt is required");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .generate_with_retry(&params())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RateLimited));
    }

    #[tokio::test]
    async fn test_persistent_server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .generate_with_retry(&params())
            .await
            .unwrap_err();
        match err {
            ClientError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_attempt_request_body() {
        let server = MockServer::start().await;
        let expected = serde_json::to_string(&params()).unwrap();
        Mock::given(method("POST"))
            .and(path("/images/generate"))
            .and(body_json_string(&expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).await.generate(&params()).await.unwrap();
    }
}
