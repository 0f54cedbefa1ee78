//! ImagineAPI provider
//!
//! Asynchronous generation API: a submit call returns an image record id,
//! which the adapter polls until the record reaches a terminal status. The
//! poll loop is bounded so a stuck job surfaces as a timeout rather than
//! hanging forever.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::ProviderError;
use crate::models::{GenerationRequest, ImageContent, ModelInfo, ProviderDescriptor};
use crate::prompt::compile_prompt;
use crate::provider::ImageProvider;

const DEFAULT_BASE_URL: &str = "https://cl.imagineapi.dev";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: u32 = 12;

/// ImagineAPI adapter.
pub struct ImagineProvider {
    api_key: String,
    client: Client,
    base_url: String,
    poll_interval: Duration,
}

impl ImagineProvider {
    /// Create a new adapter. The key must be non-empty.
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create an adapter pointed at a custom base URL.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::ConfigError(
                "Imagine API key is required".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            client: Client::new(),
            base_url,
            poll_interval: POLL_INTERVAL,
        })
    }

    #[cfg(test)]
    fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn submit(&self, body: &SubmitRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/items/images/", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Imagine submit failed: {e}");
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(%status, "Imagine API error: {message}");
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(parsed.data.id)
    }

    async fn poll(&self, id: &str) -> Result<ImageRecord, ProviderError> {
        let response = self
            .client
            .get(format!("{}/items/images/{id}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        let parsed: PollResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(parsed.data)
    }
}

#[async_trait]
impl ImageProvider for ImagineProvider {
    fn id(&self) -> &str {
        "imagine"
    }

    fn name(&self) -> &str {
        "ImagineAPI"
    }

    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: self.id().to_string(),
            name: self.name().to_string(),
            models: vec![ModelInfo {
                id: "midjourney".to_string(),
                engine: "imagine".to_string(),
                max_resolution: 1024,
                cost_per_image: 0.05,
            }],
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ImageContent, ProviderError> {
        let prompt = compile_prompt(
            &request.description,
            request.resolved_category(),
            request.style,
        );
        let body = SubmitRequest {
            prompt: prompt.positive,
            negative_prompt: prompt.negative,
            aspect_ratio: "1:1",
            style: request.style.as_str().to_string(),
        };
        let id = self.submit(&body).await?;
        debug!(%id, question_id = %request.question_id, "Imagine job submitted");

        for _ in 0..MAX_POLLS {
            tokio::time::sleep(self.poll_interval).await;
            let record = self.poll(&id).await?;
            match record.status.as_str() {
                "completed" => {
                    let url = record.url.ok_or_else(|| {
                        ProviderError::InvalidResponse("completed record has no url".into())
                    })?;
                    return Ok(ImageContent::Url(url));
                }
                "failed" => {
                    return Err(ProviderError::Unexpected(format!(
                        "generation job {id} failed"
                    )));
                }
                "pending" | "processing" => continue,
                other => {
                    warn!(%id, status = other, "unknown Imagine job status");
                    continue;
                }
            }
        }

        Err(ProviderError::Timeout(
            self.poll_interval * MAX_POLLS,
        ))
    }
}

#[derive(Debug, Serialize)]
struct SubmitRequest {
    prompt: String,
    negative_prompt: String,
    aspect_ratio: &'static str,
    style: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: SubmitData,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PollResponse {
    data: ImageRecord,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    status: String,
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ErrorClass;
    use crate::models::{QualityTier, Style};

    fn request() -> GenerationRequest {
        GenerationRequest {
            question_id: "q1".into(),
            description: "folded paper shapes".into(),
            category: None,
            style: Style::Abstract,
            quality: QualityTier::Standard,
        }
    }

    fn provider(server: &MockServer) -> ImagineProvider {
        ImagineProvider::with_base_url("key".into(), server.uri())
            .unwrap()
            .with_poll_interval(Duration::from_millis(1))
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(ImagineProvider::new(String::new()).is_err());
    }

    #[tokio::test]
    async fn test_completed_job_returns_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items/images/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "job-1" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items/images/job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "status": "completed", "url": "https://img.example/1.png" }
            })))
            .mount(&server)
            .await;

        let content = provider(&server).generate(&request()).await.unwrap();
        assert_eq!(
            content,
            ImageContent::Url("https://img.example/1.png".into())
        );
    }

    #[tokio::test]
    async fn test_pending_then_completed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items/images/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "job-2" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items/images/job-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "status": "pending", "url": null }
            })))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items/images/job-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "status": "completed", "url": "https://img.example/2.png" }
            })))
            .mount(&server)
            .await;

        let content = provider(&server).generate(&request()).await.unwrap();
        assert_eq!(
            content,
            ImageContent::Url("https://img.example/2.png".into())
        );
    }

    #[tokio::test]
    async fn test_failed_job_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "job-3" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "status": "failed", "url": null }
            })))
            .mount(&server)
            .await;

        let err = provider(&server).generate(&request()).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unknown);
    }

    #[tokio::test]
    async fn test_stuck_job_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "job-4" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "status": "processing", "url": null }
            })))
            .mount(&server)
            .await;

        let err = provider(&server).generate(&request()).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Timeout);
    }

    #[tokio::test]
    async fn test_submit_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = provider(&server).generate(&request()).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::RateLimited);
    }
}
