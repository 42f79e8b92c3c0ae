use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use rgen_studio::{
    error::{GENERATION_FAILED_MESSAGE, MISSING_PROMPT_MESSAGE},
    server, AppState, GenerationError, ImageProvider, ProviderImageRequest,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct RecordingProvider {
    calls: Mutex<Vec<ProviderImageRequest>>,
    outcome: fn() -> rgen_studio::Result<Value>,
}

impl RecordingProvider {
    fn new(outcome: fn() -> rgen_studio::Result<Value>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome,
        })
    }

    fn calls(&self) -> Vec<ProviderImageRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for RecordingProvider {
    async fn generate(&self, request: &ProviderImageRequest) -> rgen_studio::Result<Value> {
        self.calls.lock().unwrap().push(request.clone());
        (self.outcome)()
    }

    fn model(&self) -> &str {
        "dall-e-3"
    }
}

fn fox_payload() -> rgen_studio::Result<Value> {
    Ok(json!({
        "created": 1700000000,
        "data": [{"url": "https://cdn.example/fox.png", "revised_prompt": "a red fox in fresh snow"}]
    }))
}

fn provider_down() -> rgen_studio::Result<Value> {
    Err(GenerationError::ProviderError {
        status: 401,
        body: "Incorrect API key provided: sk-live-123".into(),
    })
}

async fn post(provider: Arc<RecordingProvider>, body: &[u8]) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(provider)))
            .configure(server::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(server::GENERATE_PATH)
        .insert_header(("content-type", "application/json"))
        .set_payload(body.to_vec())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn forwards_prompt_and_style_and_passes_payload_through() {
    let provider = RecordingProvider::new(fox_payload);

    let (status, body) = post(
        provider.clone(),
        br#"{"prompt":"a red fox in snow","style":"vivid"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, fox_payload().unwrap());

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        serde_json::to_value(&calls[0]).unwrap(),
        json!({
            "model": "dall-e-3",
            "prompt": "a red fox in snow",
            "n": 1,
            "size": "1024x1024",
            "style": "vivid"
        })
    );
}

#[actix_web::test]
async fn omits_style_when_not_provided() {
    let provider = RecordingProvider::new(fox_payload);

    let (status, _) = post(provider.clone(), br#"{"prompt":"a quiet harbor"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let sent = serde_json::to_value(&provider.calls()[0]).unwrap();
    assert!(sent.get("style").is_none());
    assert_eq!(sent["n"], 1);
    assert_eq!(sent["size"], "1024x1024");
}

#[actix_web::test]
async fn empty_or_missing_prompt_is_rejected_without_calling_provider() {
    for body in [
        &br#"{"prompt":""}"#[..],
        &br#"{"style":"natural"}"#[..],
        &br#"{}"#[..],
    ] {
        let provider = RecordingProvider::new(fox_payload);
        let (status, payload) = post(provider.clone(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload, json!({ "error": MISSING_PROMPT_MESSAGE }));
        assert!(provider.calls().is_empty());
    }
}

#[actix_web::test]
async fn whitespace_prompt_is_forwarded_as_typed() {
    let provider = RecordingProvider::new(fox_payload);

    let (status, body) = post(provider.clone(), br#"{"prompt":" "}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, fox_payload().unwrap());
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, " ");
}

#[actix_web::test]
async fn malformed_bodies_are_bad_requests() {
    for body in [&b"{not json"[..], &br#"{"prompt":"fox","style":"sepia"}"#[..]] {
        let provider = RecordingProvider::new(fox_payload);
        let (status, payload) = post(provider.clone(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].is_string());
        assert!(provider.calls().is_empty());
    }
}

#[actix_web::test]
async fn provider_failure_returns_generic_message() {
    let provider = RecordingProvider::new(provider_down);

    let (status, payload) = post(provider.clone(), br#"{"prompt":"a red fox in snow"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload, json!({ "error": GENERATION_FAILED_MESSAGE }));
    assert!(!payload.to_string().contains("sk-live"));
    assert_eq!(provider.calls().len(), 1);
}
