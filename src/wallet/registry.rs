use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::WalletError;
use crate::wallet::{Coin, Wallet};

/// One wallet per payment coin
pub struct WalletRegistry {
    wallets: HashMap<Coin, Arc<dyn Wallet>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
        }
    }

    pub fn register(&mut self, wallet: Arc<dyn Wallet>) {
        let coin = wallet.coin();
        info!("Registering wallet for coin: {}", coin);
        self.wallets.insert(coin, wallet);
    }

    /// Wallet handling `coin`
    pub fn wallet_for(&self, coin: Coin) -> Result<Arc<dyn Wallet>, WalletError> {
        self.wallets
            .get(&coin)
            .cloned()
            .ok_or_else(|| WalletError::UnknownCoin(coin.to_string()))
    }

    /// Registered coins in code order
    pub fn registered_coins(&self) -> Vec<Coin> {
        let mut coins: Vec<Coin> = self.wallets.keys().copied().collect();
        coins.sort();
        coins
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}
