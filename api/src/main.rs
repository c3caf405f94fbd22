use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;

use gm_api::{create_app, telemetry, AppState};
use gm_infra::{mail::create_mail_service, Backend};
use gm_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging)?;

    info!(
        environment = ?config.environment,
        storage = ?config.storage,
        "Starting Gurmania API server"
    );

    let backend = Backend::connect(&config)
        .await
        .context("failed to initialise storage backend")?;
    let mailer = create_mail_service(&config.mail).context("failed to initialise mail service")?;

    let state = web::Data::new(AppState::build(&config, backend.clone(), mailer));
    state.cleanup.clone().start_background_task();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped, closing connections");
    backend.close().await;
    Ok(())
}
