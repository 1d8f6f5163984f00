use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stratus::{
    api::{shutdown_signal, start_api_server, ApiState},
    config::{AppConfig, HostEnvironment, LoadOptions, ENVIRONMENT_VAR},
    observability::{init_logging, log_config_info},
    secrets::ProviderFactory,
    services::SecretsDemoService,
    storage::create_pool,
    APP_NAME, VERSION,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Stratus demo web service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Host environment (Development, Staging, Production, ...)
    #[arg(long, env = ENVIRONMENT_VAR)]
    environment: Option<HostEnvironment>,

    /// Directory containing appsettings*.json
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();
    let environment = cli.environment.unwrap_or_default();

    let config = AppConfig::load(&LoadOptions::new(cli.config_dir, environment))
        .context("Failed to load configuration")?;

    let mut logging = config.settings.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    init_logging(&logging);

    info!(app_name = APP_NAME, version = VERSION, "Starting stratus");
    log_config_info(&config);

    let provider = ProviderFactory::create(config.provider_mode(), &config)
        .context("Failed to build secret provider")?;
    provider.health_check().await.context("Secret backend is unreachable")?;

    let demo = SecretsDemoService::new(Arc::new(provider));

    let connection = demo
        .get_db_connection()
        .await
        .context("Failed to resolve the DefaultConnection connection string")?;
    let pool = create_pool(&connection, &config.settings.database)
        .context("Failed to create database pool")?;

    match demo.get_api_settings().await {
        Ok(settings) => info!(base_url = %settings.base_url, "Resolved API settings"),
        Err(e) if e.is_not_found() => info!("No API settings configured"),
        Err(e) => warn!(error = %e, "API settings could not be resolved"),
    }

    let state = ApiState::new(config.environment.clone(), pool);
    start_api_server(&config.settings.server, state, shutdown_signal())
        .await
        .context("API server failed")?;

    Ok(())
}
