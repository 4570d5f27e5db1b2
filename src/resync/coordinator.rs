// Funding Resync Coordinator - rescans the chain for missed order payments
//
// Cycle:
// - List sale orders flagged "needs resync"
// - Group them by payment coin, tracking each coin's rollback horizon
//   (oldest order - margin)
// - Clear each flag; orders whose coin has no wallet stay flagged
// - Ask each coin's wallet for one historical rescan from its horizon
//
// Failures are logged and retried on the next tick. Nothing leaves the task.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::clock::{Clock, SystemClock};
use crate::error::ResyncError;
use crate::resync::horizon::HorizonTracker;
use crate::resync::models::{CoinRescan, CycleReport, RescanOutcome, ResyncConfig, UnfundedOrderRecord};
use crate::resync::store::SaleOrderStore;
use crate::wallet::{Coin, Wallet, WalletRegistry};

/// Periodic funding resync over a sale-order store
pub struct FundingResyncCoordinator {
    config: ResyncConfig,
    store: Arc<dyn SaleOrderStore>,
    wallets: Option<Arc<WalletRegistry>>,
    clock: Arc<dyn Clock>,
    span: Span,
}

/// Orders of one payment coin seen in a cycle
struct CoinBatch {
    wallet: Option<Arc<dyn Wallet>>,
    tracker: HorizonTracker,
}

impl FundingResyncCoordinator {
    pub fn new(config: ResyncConfig, store: Arc<dyn SaleOrderStore>) -> Self {
        Self {
            config,
            store,
            wallets: None,
            clock: Arc::new(SystemClock),
            span: info_span!("funding_resync"),
        }
    }

    /// Rescan each order's payment coin through `wallets`.
    ///
    /// Without a registry the coordinator only clears flags.
    pub fn with_wallets(mut self, wallets: Arc<WalletRegistry>) -> Self {
        self.wallets = Some(wallets);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Span every cycle is recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &ResyncConfig {
        &self.config
    }

    /// Start the periodic loop (runs in background until `shutdown` fires)
    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately
        if !self.config.run_on_start {
            ticker.tick().await;
        }

        info!(
            parent: &self.span,
            "⏰ Funding resync started (every {:?}, rollback {}h)",
            self.config.interval,
            self.config.rollback_margin.num_hours()
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // Not raced against shutdown: a started cycle finishes its bookkeeping
            self.check_unfunded().await;
        }

        info!(parent: &self.span, "✓ Funding resync stopped");
    }

    /// Run one resync cycle now
    pub async fn check_unfunded(&self) -> CycleReport {
        let span = self.span.clone();
        self.run_cycle().instrument(span).await
    }

    async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::new(self.clock.now());

        let flagged = match self.store.list_needing_resync().await {
            Ok(flagged) => flagged,
            Err(e) => {
                let e = ResyncError::StoreUnavailable(e);
                error!(cycle_id = %report.cycle_id, "❌ {}", e);
                report.store_error = Some(e.to_string());
                return report;
            }
        };

        if flagged.is_empty() {
            debug!(cycle_id = %report.cycle_id, "✓ No unfunded orders need resync");
            return report;
        }

        report.flagged = flagged.len();
        info!(cycle_id = %report.cycle_id, "🔄 Resyncing {} unfunded orders", flagged.len());

        let mut batches: BTreeMap<Coin, CoinBatch> = BTreeMap::new();
        for order in &flagged {
            let wallet = match self.wallet_for(order) {
                Ok(wallet) => wallet,
                Err(e) => {
                    warn!(
                        cycle_id = %report.cycle_id,
                        order_id = %order.order_id,
                        "⚠️ Leaving order flagged: {}",
                        e
                    );
                    report.left_flagged.push(order.order_id.clone());
                    continue;
                }
            };

            batches
                .entry(order.payment_coin)
                .or_insert_with(|| CoinBatch {
                    wallet,
                    tracker: HorizonTracker::new(self.config.rollback_margin),
                })
                .tracker
                .observe(order.timestamp);

            match self.store.set_needs_resync(&order.order_id, false).await {
                Ok(()) => report.cleared += 1,
                Err(e) => {
                    warn!(
                        cycle_id = %report.cycle_id,
                        order_id = %order.order_id,
                        "⚠️ Failed to clear resync flag: {}",
                        ResyncError::StoreUnavailable(e)
                    );
                    report.failed_clears.push(order.order_id.clone());
                }
            }
        }

        let now = self.clock.now();
        for (coin, batch) in batches {
            let Some(horizon) = batch.tracker.finish(now) else {
                continue;
            };
            report.horizon = Some(report.horizon.map_or(horizon, |h| h.min(horizon)));

            let outcome = match batch.wallet {
                Some(wallet) => match wallet.rescan_from(horizon).await {
                    Ok(()) => {
                        info!(
                            cycle_id = %report.cycle_id,
                            coin = %coin,
                            "✓ Wallet rescan requested from {}",
                            horizon
                        );
                        RescanOutcome::Requested
                    }
                    Err(e) => {
                        error!(
                            cycle_id = %report.cycle_id,
                            coin = %coin,
                            "❌ {}",
                            ResyncError::WalletUnavailable(e)
                        );
                        RescanOutcome::Failed
                    }
                },
                None => {
                    warn!(
                        cycle_id = %report.cycle_id,
                        coin = %coin,
                        "⚠️ No wallets configured, cleared flags without rescan (horizon {})",
                        horizon
                    );
                    RescanOutcome::Skipped
                }
            };

            report.rescans.push(CoinRescan {
                coin,
                horizon,
                outcome,
            });
        }

        report
    }

    /// Wallet for the order's payment coin. `Ok(None)` when no registry is configured.
    fn wallet_for(&self, order: &UnfundedOrderRecord) -> Result<Option<Arc<dyn Wallet>>, ResyncError> {
        match &self.wallets {
            Some(wallets) => wallets
                .wallet_for(order.payment_coin)
                .map(Some)
                .map_err(ResyncError::WalletUnavailable),
            None => Ok(None),
        }
    }
}
