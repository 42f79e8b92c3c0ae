use actix_web::{web, HttpResponse};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{GenerationError, Result, MISSING_PROMPT_MESSAGE},
    logger,
    models::{GenerationRequest, ProviderImageRequest},
    server::AppState,
};

/// POST /api/generate
///
/// Validates the body, forwards a single 1024x1024 generation to the
/// provider and hands its payload back unmodified. Provider failures are
/// logged here and surface to the caller only as the generic 500 message.
pub async fn generate(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4().to_string();
    logger::with_request_id(request_id, handle_generate(state, body)).await
}

async fn handle_generate(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let request = parse_request(&body).map_err(|e| {
        log::warn!("Rejected generation request: {}", e);
        e
    })?;

    log::info!(
        "🎨 Generation requested: prompt={:?} style={}",
        request.prompt.as_deref().unwrap_or_default(),
        request.style.map(|s| s.as_str()).unwrap_or("none")
    );

    let prompt = request.prompt_text().ok_or_else(|| {
        log::warn!("Rejected generation request: empty prompt");
        GenerationError::ValidationError(MISSING_PROMPT_MESSAGE.into())
    })?;

    let provider_request =
        ProviderImageRequest::new(state.provider.model(), prompt, request.style);

    let payload = {
        let _timer = logger::timer("provider image generation");
        state.provider.generate(&provider_request).await
    }
    .map_err(|e| {
        log::error!("❌ Image generation failed: {}", e);
        e
    })?;

    log::info!(
        "✅ Image generated: {}",
        first_image_url(&payload).unwrap_or("<no url in payload>")
    );

    Ok(HttpResponse::Ok().json(payload))
}

/// Malformed JSON, a non-string prompt or an unknown style all count as a
/// bad request rather than a provider failure.
fn parse_request(body: &[u8]) -> Result<GenerationRequest> {
    if body.is_empty() {
        return Err(GenerationError::ValidationError(MISSING_PROMPT_MESSAGE.into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| GenerationError::ValidationError(format!("Invalid request body: {}", e)))
}

fn first_image_url(payload: &Value) -> Option<&str> {
    payload.get("data")?.get(0)?.get("url")?.as_str()
}
