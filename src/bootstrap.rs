use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn};

use crate::{
    config::Config,
    error::AppResult,
    resync::{FundingResyncCoordinator, PgSaleOrderStore, SaleOrderStore},
    wallet::WalletRegistry,
};

/// Running background services of the node
pub struct NodeServices {
    pub wallets: Arc<WalletRegistry>,
    pub shutdown: CancellationToken,
    resync: Option<JoinHandle<()>>,
}

impl NodeServices {
    /// Stop future resync ticks and wait for an in-flight cycle to finish
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.resync.take() {
            if let Err(e) = handle.await {
                warn!("Funding resync task ended abnormally: {:?}", e);
            }
        }
    }
}

pub async fn initialize_services(config: &Config, wallets: WalletRegistry) -> AppResult<NodeServices> {
    info!("Initializing settlement services ...");

    let pool = initialize_database(&config.database_url).await?;
    let store: Arc<dyn SaleOrderStore> = Arc::new(PgSaleOrderStore::new(pool));

    Ok(start_services(config, store, wallets))
}

/// Wire the funding resync coordinator over `store`
pub fn start_services(
    config: &Config,
    store: Arc<dyn SaleOrderStore>,
    wallets: WalletRegistry,
) -> NodeServices {
    let wallets = Arc::new(wallets);
    let shutdown = CancellationToken::new();

    if !config.resync_enabled {
        warn!("⚠️  Funding resync disabled");
        return NodeServices {
            wallets,
            shutdown,
            resync: None,
        };
    }

    let mut coordinator = FundingResyncCoordinator::new(config.resync(), store);

    if wallets.is_empty() {
        warn!("⚠️  No wallets registered - funding resync will only clear flags");
    } else {
        let coins: Vec<String> = wallets.registered_coins().iter().map(|c| c.to_string()).collect();
        info!("✅ Funding resync will rescan wallets: {}", coins.join(", "));
        coordinator = coordinator
            .with_wallets(wallets.clone())
            .with_span(info_span!("funding_resync", coins = %coins.join(",")));
    }

    let handle = coordinator.start(shutdown.clone());
    info!("✅ Funding resync task started");

    NodeServices {
        wallets,
        shutdown,
        resync: Some(handle),
    }
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("📊 Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    info!("✓ Database pool configured: 10 max connections");

    info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("✓ Database initialized");
    Ok(pool)
}
