use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{GenerationError, Result, CLIENT_FALLBACK_MESSAGE},
    models::{ErrorResponse, GenerationRequest, ImagesResponse},
};

/// What the form needs from the outside world: the generation endpoint and a
/// way to pull image bytes for download.
#[async_trait]
pub trait GenerateApi: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagesResponse>;

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

/// Talks to a running `POST /api/generate` endpoint over HTTP.
#[derive(Clone)]
pub struct EndpointClient {
    client: Client,
    endpoint: String,
}

impl EndpointClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerateApi for EndpointClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagesResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .map(|payload| payload.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| CLIENT_FALLBACK_MESSAGE.to_string());
            return Err(GenerationError::Rejected(message));
        }

        serde_json::from_slice(&body)
            .map_err(|e| GenerationError::ResponseError(format!("Invalid endpoint response: {}", e)))
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::DownloadError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::DownloadError(format!(
                "image host returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::DownloadError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
