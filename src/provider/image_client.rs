use crate::{
    config::ProviderConfig,
    error::{GenerationError, Result},
    models::ProviderImageRequest,
    provider::ImageProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Client for an OpenAI-compatible `/images/generations` route.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ImageClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let api_key = config
            .api_key
            .ok_or_else(|| GenerationError::ConfigError("Provider API key is required".into()))?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model,
        })
    }

    pub fn generations_url(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for ImageClient {
    async fn generate(&self, request: &ProviderImageRequest) -> Result<Value> {
        log::debug!("POST {} with model {}", self.generations_url(), request.model);

        let response = self
            .client
            .post(self.generations_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::RequestError(format!("Provider request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::ResponseError(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::ProviderError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            GenerationError::ResponseError(format!("Provider returned invalid JSON: {}", e))
        })?;

        if !payload.is_object() {
            return Err(GenerationError::ResponseError(
                "Provider returned a non-object payload".into(),
            ));
        }

        Ok(payload)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
