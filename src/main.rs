use settlement_core::{bootstrap, config::Config, wallet::WalletRegistry};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,settlement_core=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("🚀 Starting settlement node");

    let config = Config::from_env()?;

    // Chain wallets are provided by the embedding node; standalone runs
    // without any and only clears resync flags.
    let wallets = WalletRegistry::new();

    let services = bootstrap::initialize_services(&config, wallets).await?;
    info!("🌐 Settlement node running, waiting for shutdown signal");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    services.shutdown().await;

    info!("✓ Settlement node stopped");
    Ok(())
}
