//! # Back Office API Main Entry Point

use backoffice::config::ConfigLoader;
use backoffice::repositories::GuaranteeCatalog;
use backoffice::server::run_server;
use backoffice::{db, seeds, telemetry};
use migration::MigratorTrait;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config)?;

    println!("Loaded configuration for profile: {}", config.profile);
    if let Ok(redacted_json) = config.redacted_json() {
        println!("Configuration: {}", redacted_json);
    }

    let db = db::init_pool(&config).await?;
    migration::Migrator::up(&db, None).await?;
    seeds::seed_database(&db).await?;

    // Entries past the listing window lose their catalogue flag on boot.
    let expired = GuaranteeCatalog::new(&db, config.guarantee_expiry_days)
        .expire_stale()
        .await?;
    if expired > 0 {
        tracing::info!(expired, "stale guarantee entries demoted at startup");
    }

    run_server(config, db).await
}
