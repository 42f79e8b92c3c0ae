use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

pub const MISSING_PROMPT_MESSAGE: &str = "Please provide an image description";
pub const GENERATION_FAILED_MESSAGE: &str =
    "An error occurred while generating the image, please try again later";
pub const CLIENT_FALLBACK_MESSAGE: &str = "Failed to generate image";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "An error occurred while downloading the image";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Provider returned {status}: {body}")]
    ProviderError { status: u16, body: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    /// The generation endpoint answered with a non-success status. The
    /// payload's message is shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("Download error: {0}")]
    DownloadError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GenerationError {
    /// Message safe to hand back to an endpoint caller. Only validation
    /// failures carry their own text; everything else is collapsed.
    pub fn public_message(&self) -> &str {
        match self {
            GenerationError::ValidationError(msg) => msg,
            _ => GENERATION_FAILED_MESSAGE,
        }
    }
}

impl ResponseError for GenerationError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerationError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.public_message()))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GenerationError::ResponseError(err.to_string())
        } else {
            GenerationError::RequestError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
