use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::PayoutError;
use crate::wallet::Address;

/// Where a moderator's ruling sends one payout output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutInstruction {
    /// Hex-encoded output/redeem script
    Script(String),
    /// Chain-native address string
    Address(String),
    /// No destination chosen. Valid on the wire, rejected by the resolver.
    Unset,
}

impl PayoutInstruction {
    /// Decode the destination fields of a stored payout output.
    ///
    /// Dispute records keep the destination as a single `script` or
    /// `address` key next to the amount.
    pub fn from_wire(fields: &Map<String, Value>) -> Result<Self, PayoutError> {
        let present: Vec<(&String, &Value)> =
            fields.iter().filter(|(_, value)| !value.is_null()).collect();

        match present.as_slice() {
            [] => Ok(PayoutInstruction::Unset),
            [(key, value)] => {
                let text = || {
                    value.as_str().map(str::to_string).ok_or_else(|| {
                        PayoutError::MalformedInput(format!("payout {} must be a string", key))
                    })
                };
                match key.as_str() {
                    "script" => Ok(PayoutInstruction::Script(text()?)),
                    "address" => Ok(PayoutInstruction::Address(text()?)),
                    other => Err(PayoutError::UnsupportedVariant(other.to_string())),
                }
            }
            many => Err(PayoutError::MalformedInput(format!(
                "payout output has {} destinations: {}",
                many.len(),
                many.iter()
                    .map(|(key, _)| key.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PayoutInstruction::Script(_) => "script",
            PayoutInstruction::Address(_) => "address",
            PayoutInstruction::Unset => "unset",
        }
    }
}

/// One output of a dispute payout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutOutput {
    pub destination: PayoutInstruction,
    /// Amount in the coin's base units
    pub amount: Decimal,
}

impl PayoutOutput {
    pub fn new(destination: PayoutInstruction, amount: Decimal) -> Self {
        Self { destination, amount }
    }
}

/// Payout outputs directed by a dispute resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisputePayout {
    pub buyer_output: Option<PayoutOutput>,
    pub vendor_output: Option<PayoutOutput>,
    pub moderator_output: Option<PayoutOutput>,
}

impl DisputePayout {
    /// Outputs in settlement order: buyer, vendor, moderator
    pub fn outputs(&self) -> impl Iterator<Item = &PayoutOutput> {
        [&self.buyer_output, &self.vendor_output, &self.moderator_output]
            .into_iter()
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs().next().is_none()
    }
}

/// Stored form of a payout output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutOutputRecord {
    pub big_amount: String,
    #[serde(flatten)]
    pub destination: Map<String, Value>,
}

/// Stored form of a dispute payout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputePayoutRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_output: Option<PayoutOutputRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_output: Option<PayoutOutputRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderator_output: Option<PayoutOutputRecord>,
}

/// Parse a base-unit amount. Fractions and negatives are rejected.
pub fn parse_amount(raw: &str) -> Result<Decimal, PayoutError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|e| PayoutError::InvalidAmount(format!("{}: {}", raw, e)))?;

    if amount.is_sign_negative() || !amount.fract().is_zero() {
        return Err(PayoutError::InvalidAmount(raw.to_string()));
    }

    Ok(amount.normalize())
}

impl TryFrom<PayoutOutputRecord> for PayoutOutput {
    type Error = PayoutError;

    fn try_from(record: PayoutOutputRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            destination: PayoutInstruction::from_wire(&record.destination)?,
            amount: parse_amount(&record.big_amount)?,
        })
    }
}

impl TryFrom<DisputePayoutRecord> for DisputePayout {
    type Error = PayoutError;

    fn try_from(record: DisputePayoutRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            buyer_output: record.buyer_output.map(PayoutOutput::try_from).transpose()?,
            vendor_output: record.vendor_output.map(PayoutOutput::try_from).transpose()?,
            moderator_output: record.moderator_output.map(PayoutOutput::try_from).transpose()?,
        })
    }
}

/// Output of the escrow release transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionOutput {
    pub address: Address,
    pub value: Decimal,
    pub order_id: String,
}
