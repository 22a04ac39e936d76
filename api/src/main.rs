use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use sh_api::{create_app, telemetry, AppState};
use sh_core::clock::SystemClock;
use sh_core::repositories::StaffDirectory;
use sh_core::services::{SweeperConfig, TokenService, TokenServiceConfig};
use sh_infra::{create_revocation_repository, create_staff_directory};
use sh_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    telemetry::init_tracing(&config.logging).context("failed to initialize tracing")?;
    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting StaffHub API server"
    );

    let repository = create_revocation_repository(&config)
        .await
        .context("failed to open revocation store")?;
    let directory: Arc<dyn StaffDirectory> = Arc::new(
        create_staff_directory(&config.auth).context("failed to load staff accounts")?,
    );
    if config.auth.accounts.is_empty() {
        warn!("No staff accounts configured, every login will be rejected");
    }

    let token_service = Arc::new(
        TokenService::new(
            repository,
            TokenServiceConfig::from_auth_config(&config.auth),
            Arc::new(SystemClock),
        )
        .context("failed to build token service")?,
    );

    let sweeper = Arc::new(token_service.sweeper(SweeperConfig::from(&config.auth.revocation)));
    let sweep_task = sweeper.start_background_task();

    let state = web::Data::new(AppState::new(directory, token_service));
    let cors = config.cors.clone();
    let environment = config.environment;

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, environment))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server error")?;

    if let Some(task) = sweep_task {
        task.abort();
    }
    info!("Server stopped");

    Ok(())
}
