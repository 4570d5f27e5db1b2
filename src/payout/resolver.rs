use tracing::debug;

use crate::error::PayoutError;
use crate::payout::models::PayoutInstruction;
use crate::wallet::{Address, Wallet};

/// Resolve a dispute payout instruction into the address funds are sent to.
///
/// Stateless: the only collaborator is the wallet's address decoding.
/// `Unset` is always an error so a settlement never guesses a destination.
pub fn resolve(wallet: &dyn Wallet, instruction: &PayoutInstruction) -> Result<Address, PayoutError> {
    match instruction {
        PayoutInstruction::Script(script_hex) => {
            let script = hex::decode(script_hex.trim()).map_err(|e| {
                PayoutError::MalformedInput(format!("payout script is not valid hex: {}", e))
            })?;
            let address = wallet.script_to_address(&script)?;
            debug!("Resolved payout script to {} address {}", wallet.coin(), address);
            Ok(address)
        }
        PayoutInstruction::Address(encoded) => wallet
            .decode_address(encoded)
            .map_err(|source| PayoutError::AddressDecode { source }),
        PayoutInstruction::Unset => Err(PayoutError::MissingDestination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;
    use crate::wallet::mock::MockWallet;

    #[test]
    fn test_address_variant_returns_decoded_address() {
        let wallet = MockWallet::new();
        let instruction =
            PayoutInstruction::Address("1BoatSLRHtKNngkdXEeobR76b53LETtpyT".to_string());

        let address = resolve(&wallet, &instruction).unwrap();
        assert_eq!(address.as_str(), "1BoatSLRHtKNngkdXEeobR76b53LETtpyT");
    }

    #[test]
    fn test_address_decode_failure_is_wrapped() {
        let wallet = MockWallet::new();
        let instruction = PayoutInstruction::Address("bad-address".to_string());

        let err = resolve(&wallet, &instruction).unwrap_err();
        match err {
            PayoutError::AddressDecode { source } => assert_eq!(
                source,
                WalletError::InvalidAddress {
                    coin: crate::wallet::Coin::Bitcoin,
                    address: "bad-address".to_string(),
                }
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_script_variant_uses_decoded_bytes() {
        let wallet = MockWallet::new();
        let instruction = PayoutInstruction::Script("a914deadbeef87".to_string());

        let address = resolve(&wallet, &instruction).unwrap();
        assert_eq!(address.as_str(), "script-a914deadbeef87");
    }

    #[test]
    fn test_invalid_script_hex_never_reaches_wallet() {
        let wallet = MockWallet::new();
        let instruction = PayoutInstruction::Script("zz-not-hex".to_string());

        let err = resolve(&wallet, &instruction).unwrap_err();
        assert!(matches!(err, PayoutError::MalformedInput(_)));
        assert_eq!(wallet.capability_calls(), 0);
    }

    #[test]
    fn test_script_to_address_error_propagates_unchanged() {
        let wallet = MockWallet::new();
        let instruction = PayoutInstruction::Script(String::new());

        let err = resolve(&wallet, &instruction).unwrap_err();
        assert!(matches!(
            err,
            PayoutError::Wallet(WalletError::InvalidScript { .. })
        ));
    }

    #[test]
    fn test_unset_is_missing_destination() {
        let wallet = MockWallet::new();

        for _ in 0..3 {
            let err = resolve(&wallet, &PayoutInstruction::Unset).unwrap_err();
            assert!(matches!(err, PayoutError::MissingDestination));
        }
        assert_eq!(wallet.capability_calls(), 0);
    }
}
