pub mod models;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

pub use models::{Address, Coin};
pub use registry::WalletRegistry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::WalletError;

/// Wallet capability consumed by payout resolution and funding resync.
///
/// Implemented by the node's chain wallets; signing, broadcasting and chain
/// indexing live behind this trait and never in this crate.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Coin this wallet handles
    fn coin(&self) -> Coin;

    /// Decode a chain-native address string
    fn decode_address(&self, address: &str) -> Result<Address, WalletError>;

    /// Derive the address paid by an output/redeem script
    fn script_to_address(&self, script: &[u8]) -> Result<Address, WalletError>;

    /// Whether the wallet holds the key for `address`
    fn has_key(&self, address: &Address) -> bool;

    /// Request a historical rescan of the chain starting at `from`.
    ///
    /// Returns once the rescan has been requested. Completion and any
    /// failure during the scan itself are reported by the wallet.
    async fn rescan_from(&self, from: DateTime<Utc>) -> Result<(), WalletError>;
}
