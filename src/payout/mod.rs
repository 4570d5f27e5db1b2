// Dispute payout resolution
pub mod models;
pub mod resolver;
pub mod settlement;

pub use models::{DisputePayout, DisputePayoutRecord, PayoutInstruction, PayoutOutput, TransactionOutput};
pub use resolver::resolve;
pub use settlement::{build_settlement_outputs, verify_destination_in_wallet};
