use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::WalletError;
use crate::wallet::{Address, Coin, Wallet};

/// Recording wallet for unit tests
#[derive(Default)]
pub struct MockWallet {
    coin: Option<Coin>,
    owned: Mutex<HashSet<Address>>,
    rescans: Mutex<Vec<DateTime<Utc>>>,
    fail_rescan: bool,
    decode_calls: AtomicUsize,
    script_calls: AtomicUsize,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_coin(coin: Coin) -> Self {
        Self {
            coin: Some(coin),
            ..Self::default()
        }
    }

    pub fn failing_rescan() -> Self {
        Self {
            fail_rescan: true,
            ..Self::default()
        }
    }

    pub fn own(&self, address: &str) {
        self.owned.lock().insert(Address::new(address));
    }

    pub fn rescans(&self) -> Vec<DateTime<Utc>> {
        self.rescans.lock().clone()
    }

    pub fn capability_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst) + self.script_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Wallet for MockWallet {
    fn coin(&self) -> Coin {
        self.coin.unwrap_or(Coin::Bitcoin)
    }

    fn decode_address(&self, address: &str) -> Result<Address, WalletError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        if address.is_empty() || address.starts_with("bad") {
            return Err(WalletError::InvalidAddress {
                coin: self.coin(),
                address: address.to_string(),
            });
        }
        Ok(Address::new(address))
    }

    fn script_to_address(&self, script: &[u8]) -> Result<Address, WalletError> {
        self.script_calls.fetch_add(1, Ordering::SeqCst);
        if script.is_empty() {
            return Err(WalletError::InvalidScript {
                coin: self.coin(),
                reason: "empty script".to_string(),
            });
        }
        Ok(Address::new(format!("script-{}", hex::encode(script))))
    }

    fn has_key(&self, address: &Address) -> bool {
        self.owned.lock().contains(address)
    }

    async fn rescan_from(&self, from: DateTime<Utc>) -> Result<(), WalletError> {
        self.rescans.lock().push(from);
        if self.fail_rescan {
            return Err(WalletError::Unavailable("rescan rejected".to_string()));
        }
        Ok(())
    }
}
