// Escrow release outputs for a closed dispute
//
// Each payout output the moderator assigned is resolved through the wallet
// for the order's coin. A single bad output fails the whole release so a
// partially built transaction is never signed.

use tracing::{info, instrument, warn};

use crate::error::PayoutError;
use crate::payout::models::{DisputePayout, PayoutOutput, TransactionOutput};
use crate::payout::resolver::resolve;
use crate::wallet::Wallet;

/// Build the outputs of the escrow release transaction
#[instrument(skip(wallet, payout), fields(coin = %wallet.coin()))]
pub fn build_settlement_outputs(
    wallet: &dyn Wallet,
    payout: &DisputePayout,
    order_id: &str,
) -> Result<Vec<TransactionOutput>, PayoutError> {
    if payout.is_empty() {
        return Err(PayoutError::EmptyPayout);
    }

    let outputs = payout
        .outputs()
        .map(|output| {
            Ok(TransactionOutput {
                address: resolve(wallet, &output.destination)?,
                value: output.amount,
                order_id: order_id.to_string(),
            })
        })
        .collect::<Result<Vec<_>, PayoutError>>()?;

    info!(
        "Built {} settlement outputs for order {}",
        outputs.len(),
        order_id
    );
    Ok(outputs)
}

/// Check that the payout output addressed to this node lands in our wallet
pub fn verify_destination_in_wallet(
    wallet: &dyn Wallet,
    output: &PayoutOutput,
) -> Result<(), PayoutError> {
    let address = resolve(wallet, &output.destination)?;

    if !wallet.has_key(&address) {
        warn!("Dispute payout address {} is not in the {} wallet", address, wallet.coin());
        return Err(PayoutError::DestinationNotInWallet(address.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::models::PayoutInstruction;
    use crate::wallet::mock::MockWallet;
    use rust_decimal_macros::dec;

    fn address_output(address: &str, amount: rust_decimal::Decimal) -> PayoutOutput {
        PayoutOutput::new(PayoutInstruction::Address(address.to_string()), amount)
    }

    #[test]
    fn test_outputs_in_buyer_vendor_moderator_order() {
        let wallet = MockWallet::new();
        let payout = DisputePayout {
            buyer_output: Some(address_output("buyer", dec!(60000))),
            vendor_output: Some(address_output("vendor", dec!(35000))),
            moderator_output: Some(PayoutOutput::new(
                PayoutInstruction::Script("0014ab".to_string()),
                dec!(5000),
            )),
        };

        let outputs = build_settlement_outputs(&wallet, &payout, "QmOrder").unwrap();

        let addresses: Vec<&str> = outputs.iter().map(|o| o.address.as_str()).collect();
        assert_eq!(addresses, vec!["buyer", "vendor", "script-0014ab"]);
        assert_eq!(outputs[1].value, dec!(35000));
        assert!(outputs.iter().all(|o| o.order_id == "QmOrder"));
    }

    #[test]
    fn test_missing_outputs_are_skipped() {
        let wallet = MockWallet::new();
        let payout = DisputePayout {
            vendor_output: Some(address_output("vendor", dec!(100000))),
            ..Default::default()
        };

        let outputs = build_settlement_outputs(&wallet, &payout, "QmOrder").unwrap();
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn test_one_unresolvable_output_fails_release() {
        let wallet = MockWallet::new();
        let payout = DisputePayout {
            buyer_output: Some(address_output("buyer", dec!(1))),
            vendor_output: Some(PayoutOutput::new(PayoutInstruction::Unset, dec!(2))),
            moderator_output: None,
        };

        let err = build_settlement_outputs(&wallet, &payout, "QmOrder").unwrap_err();
        assert!(matches!(err, PayoutError::MissingDestination));
    }

    #[test]
    fn test_empty_payout_rejected() {
        let wallet = MockWallet::new();
        let err = build_settlement_outputs(&wallet, &DisputePayout::default(), "QmOrder")
            .unwrap_err();
        assert!(matches!(err, PayoutError::EmptyPayout));
    }

    #[test]
    fn test_destination_must_be_held_by_wallet() {
        let wallet = MockWallet::new();
        wallet.own("mine");

        assert!(verify_destination_in_wallet(&wallet, &address_output("mine", dec!(1))).is_ok());

        let err = verify_destination_in_wallet(&wallet, &address_output("theirs", dec!(1)))
            .unwrap_err();
        assert!(matches!(err, PayoutError::DestinationNotInWallet(ref a) if a == "theirs"));
    }
}
