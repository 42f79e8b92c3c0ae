pub mod config;
pub mod error;
pub mod form;
pub mod logger;
pub mod models;
pub mod provider;
pub mod server;

pub use config::{ClientConfig, Config, ProviderConfig};
pub use error::{GenerationError, Result};
pub use form::{EndpointClient, FormState, GenerateApi, GenerationForm};
pub use models::{
    ErrorResponse, GenerationRequest, ImageData, ImageStyle, ImagesResponse, ProviderImageRequest,
};
pub use provider::{ImageClient, ImageProvider};
pub use server::AppState;
