use crate::provider::{IMAGE_COUNT, IMAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering mode understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    Vivid,
    Natural,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Vivid => "vivid",
            ImageStyle::Natural => "natural",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vivid" => Ok(ImageStyle::Vivid),
            "natural" => Ok(ImageStyle::Natural),
            other => Err(format!(
                "unknown style '{}'; expected 'vivid' or 'natural'",
                other
            )),
        }
    }
}

/// Body accepted by `POST /api/generate`. `prompt` stays optional here so a
/// missing field and an empty string are rejected by the same check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ImageStyle>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            style: None,
        }
    }

    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// The prompt, if one was supplied and is not the empty string. It is
    /// forwarded exactly as typed, whitespace included.
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|prompt| !prompt.is_empty())
    }
}

/// Body sent to the provider's image generation route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ImageStyle>,
}

impl ProviderImageRequest {
    /// One 1024x1024 image; style only when the caller chose one.
    pub fn new(model: &str, prompt: &str, style: Option<ImageStyle>) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            n: IMAGE_COUNT,
            size: IMAGE_SIZE.to_string(),
            style,
        }
    }
}

/// Typed view of the provider payload the endpoint passes through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl ImagesResponse {
    /// Display target for the first generated image. Inline base64 payloads
    /// are turned into a `data:` URL so callers only deal with one shape.
    pub fn first_url(&self) -> Option<String> {
        let first = self.data.first()?;
        if let Some(url) = &first.url {
            return Some(url.clone());
        }
        first
            .b64_json
            .as_ref()
            .map(|b64| format!("data:image/png;base64,{}", b64))
    }
}
