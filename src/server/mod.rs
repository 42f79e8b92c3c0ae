pub mod handlers;

use crate::{config::Config, error::Result, provider::ImageClient, provider::ImageProvider};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

pub const GENERATE_PATH: &str = "/api/generate";

/// Shared, read-only handler state. Requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(GENERATE_PATH, web::post().to(handlers::generate));
}

/// Build the provider client from `config` and serve until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let provider = ImageClient::new(config.provider.clone())?;
    let state = AppState::new(Arc::new(provider));

    log::info!("🖼️  Serving POST {} on {}:{}", GENERATE_PATH, config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    Ok(())
}
