use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wd_api::routes::{register_builtin, RouteRegistry};
use wd_api::{create_app, AppState};
use wd_core::{
    InMemorySessionAuthority, InMemorySettingsStore, SessionAuthority, TokenService,
    TokenServiceConfig,
};
use wd_infra::{with_timing, LogFacility, LogFacilityConfig};
use wd_shared::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting Warden API server");
    if config.auth.jwt.is_using_default_secret() {
        warn!("JWT secret is the built-in default; set JWT_SECRET before deploying");
    }

    let logs = Arc::new(LogFacility::new(LogFacilityConfig::from_logging(&config.logging)?));

    let settings = InMemorySettingsStore::from_map(config.settings.clone());
    let token_config = TokenServiceConfig::from_jwt_config(&config.auth.jwt)?.with_settings(&settings);
    let tokens = Arc::new(TokenService::new(token_config));
    let sessions: Arc<dyn SessionAuthority> = Arc::new(InMemorySessionAuthority::new());

    let state = web::Data::new(AppState::new(tokens, sessions, Arc::clone(&logs))?);

    let mut registry = RouteRegistry::new(config.server.route_prefixes.clone());
    register_builtin(&mut registry);
    info!(extensions = ?registry.extensions(), "Route extensions registered");
    let registry = Arc::new(registry);

    let scheduler = logs.scheduler()?;
    let removed = with_timing(
        &scheduler,
        "prune_log_directories",
        json!({ "root": logs.root().display().to_string() }),
        || logs.prune_cached(),
    )?;
    info!(removed, "Pruned expired log files");

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), Arc::clone(&registry)));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}

/// Installs the process-wide `tracing` subscriber
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
