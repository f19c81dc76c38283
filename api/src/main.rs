use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use kt_api::app::create_app;
use kt_api::routes::auth::AppState;
use kt_api::telemetry::init_tracing;
use kt_core::repositories::{InMemoryTokenRepository, TokenRepository};
use kt_core::services::token::{TokenService, TokenServiceConfig};
use kt_infra::database::{DatabasePool, MySqlTokenRepository};
use kt_shared::config::{AppConfig, DatabaseConfig, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting Keyturn API server");
    if config.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set, signing with the development key");
    }

    let (repository, pool) = connect_store(&config.database).await?;

    let token_config = TokenServiceConfig::from_jwt_config(&config.jwt)?;
    let token_service = Arc::new(TokenService::new(repository, token_config)?);
    let app_state = web::Data::new(AppState::new(token_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()))
        .client_request_timeout(Duration::from_secs(config.server.request_timeout))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .shutdown_timeout(config.server.shutdown_timeout);

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    // SIGINT and SIGTERM trigger a graceful stop
    server.bind(&bind_address)?.run().await?;

    if let Some(pool) = pool {
        pool.close().await;
    }

    info!("Server stopped");
    Ok(())
}

/// Build the configured credential store, plus the pool to close on shutdown
async fn connect_store(
    config: &DatabaseConfig,
) -> anyhow::Result<(Arc<dyn TokenRepository>, Option<DatabasePool>)> {
    match config.backend {
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(config.clone()).await?;
            pool.ping().await?;
            pool.ensure_schema().await?;
            info!("Using MySQL credential store");
            let repository = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));
            Ok((repository, Some(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory credential store, records are lost on restart");
            Ok((Arc::new(InMemoryTokenRepository::new()), None))
        }
    }
}
