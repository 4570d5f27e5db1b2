use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WalletError;

/// Payment coins a node can hold a wallet for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Coin {
    #[serde(rename = "BTC")]
    Bitcoin,
    #[serde(rename = "BCH")]
    BitcoinCash,
    #[serde(rename = "LTC")]
    Litecoin,
    #[serde(rename = "ZEC")]
    Zcash,
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Coin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "BTC",
            Coin::BitcoinCash => "BCH",
            Coin::Litecoin => "LTC",
            Coin::Zcash => "ZEC",
        }
    }

    pub fn all() -> Vec<Coin> {
        vec![Coin::Bitcoin, Coin::BitcoinCash, Coin::Litecoin, Coin::Zcash]
    }
}

impl FromStr for Coin {
    type Err = WalletError;

    /// Accepts plain codes and testnet codes ("TBTC")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let code = code.strip_prefix('T').filter(|c| c.len() == 3).unwrap_or(&code);
        match code {
            "BTC" => Ok(Coin::Bitcoin),
            "BCH" => Ok(Coin::BitcoinCash),
            "LTC" => Ok(Coin::Litecoin),
            "ZEC" => Ok(Coin::Zcash),
            _ => Err(WalletError::UnknownCoin(s.to_string())),
        }
    }
}

impl TryFrom<String> for Coin {
    type Error = WalletError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// Chain address as produced by a wallet
///
/// Opaque to this crate: it is only ever created by a wallet's decoding
/// capabilities and handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_codes() {
        assert_eq!("btc".parse::<Coin>().unwrap(), Coin::Bitcoin);
        assert_eq!("TBCH".parse::<Coin>().unwrap(), Coin::BitcoinCash);
        assert_eq!("ZEC".parse::<Coin>().unwrap(), Coin::Zcash);
        assert!(matches!(
            "ETH".parse::<Coin>(),
            Err(WalletError::UnknownCoin(code)) if code == "ETH"
        ));
    }

    #[test]
    fn test_coin_serde_uses_codes() {
        let json = serde_json::to_string(&Coin::Litecoin).unwrap();
        assert_eq!(json, "\"LTC\"");
        let coin: Coin = serde_json::from_str("\"BTC\"").unwrap();
        assert_eq!(coin, Coin::Bitcoin);
    }
}
