pub mod image_client;

use crate::{error::Result, models::ProviderImageRequest};
use async_trait::async_trait;
use serde_json::Value;

pub use image_client::ImageClient;

pub const DEFAULT_MODEL: &str = "dall-e-3";
pub const IMAGE_COUNT: u32 = 1;
pub const IMAGE_SIZE: &str = "1024x1024";

/// Text-to-image backend the endpoint forwards to. Implementations return the
/// provider's JSON payload untouched.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, request: &ProviderImageRequest) -> Result<Value>;

    fn model(&self) -> &str;
}
