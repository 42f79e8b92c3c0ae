use std::env;
use std::path::PathBuf;

use crate::error::{GenerationError, Result};
use crate::provider::DEFAULT_MODEL;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/api/generate";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub download_dir: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var("IMAGE_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = env::var("IMAGE_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|key| !key.is_empty());
        let model = env::var("IMAGE_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        ProviderConfig {
            base_url,
            api_key,
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(GenerationError::ConfigError(
                "Provider base URL is required".into(),
            ));
        }
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(GenerationError::ConfigError(
                "Provider API key is required; set IMAGE_API_KEY or OPENAI_API_KEY".into(),
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Config {
            host,
            port,
            provider: ProviderConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint =
            env::var("GENERATE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let download_dir = env::var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        ClientConfig {
            endpoint,
            download_dir,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let config = ProviderConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "dall-e-3");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let err = ProviderConfig::new().validate().unwrap_err();
        assert!(matches!(err, GenerationError::ConfigError(_)));

        let blank = ProviderConfig::new().with_credentials("  ");
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_empty_base_url_fails_validation() {
        let config = ProviderConfig::new()
            .with_credentials("sk-test")
            .with_base_url("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_host("0.0.0.0")
            .with_port(9000)
            .with_provider(
                ProviderConfig::new()
                    .with_base_url("https://images.example/v1")
                    .with_credentials("sk-test")
                    .with_model("dall-e-2"),
            );
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 9000));
        assert_eq!(config.provider.model, "dall-e-2");
        assert!(config.provider.validate().is_ok());

        let client = ClientConfig::new()
            .with_endpoint("http://localhost:3000/api/generate")
            .with_download_dir("/tmp/images");
        assert_eq!(client.endpoint, "http://localhost:3000/api/generate");
        assert_eq!(client.download_dir, PathBuf::from("/tmp/images"));
    }
}
