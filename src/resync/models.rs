use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::time::Duration;
use uuid::Uuid;

use crate::wallet::Coin;

/// Sale order whose funding has not been observed yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UnfundedOrderRecord {
    pub order_id: String,
    /// Coin the buyer pays in; picks the wallet that rescans
    #[sqlx(try_from = "String")]
    pub payment_coin: Coin,
    pub timestamp: DateTime<Utc>,
    #[sqlx(rename = "needs_sync")]
    pub needs_resync: bool,
}

impl UnfundedOrderRecord {
    pub fn flagged(order_id: impl Into<String>, payment_coin: Coin, timestamp: DateTime<Utc>) -> Self {
        Self {
            order_id: order_id.into(),
            payment_coin,
            timestamp,
            needs_resync: true,
        }
    }
}

/// Funding resync configuration
#[derive(Debug, Clone)]
pub struct ResyncConfig {
    /// Time between resync cycles
    pub interval: Duration,
    /// How far before the oldest flagged order the rescan starts
    pub rollback_margin: chrono::Duration,
    /// Run a cycle as soon as the coordinator starts
    pub run_on_start: bool,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            rollback_margin: chrono::Duration::hours(24),
            run_on_start: true,
        }
    }
}

/// What happened to a coin's wallet rescan in a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanOutcome {
    /// No wallets configured, flags were only cleared
    Skipped,
    Requested,
    Failed,
}

/// Rescan issued for one payment coin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRescan {
    pub coin: Coin,
    pub horizon: DateTime<Utc>,
    pub outcome: RescanOutcome,
}

/// Summary of one resync cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub flagged: usize,
    pub cleared: usize,
    pub failed_clears: Vec<String>,
    /// Orders left flagged because no wallet handles their coin
    pub left_flagged: Vec<String>,
    /// Earliest horizon across all coins
    pub horizon: Option<DateTime<Utc>>,
    pub rescans: Vec<CoinRescan>,
    /// Set when the flagged orders could not be listed
    pub store_error: Option<String>,
}

impl CycleReport {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            started_at,
            flagged: 0,
            cleared: 0,
            failed_clears: Vec::new(),
            left_flagged: Vec::new(),
            horizon: None,
            rescans: Vec::new(),
            store_error: None,
        }
    }

    /// Rescan outcome for `coin`, if one was attempted
    pub fn rescan_for(&self, coin: Coin) -> Option<RescanOutcome> {
        self.rescans
            .iter()
            .find(|r| r.coin == coin)
            .map(|r| r.outcome)
    }
}
