//! Settlement and funding recovery for a moderated peer-to-peer trade node.
//!
//! - [`payout`] turns a moderator's dispute payout into concrete chain
//!   destinations and escrow release outputs.
//! - [`resync`] periodically rescans the chain for sale orders whose
//!   payment was missed.
//! - [`offline`] is the storage contract for messages to offline peers.

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod error;
pub mod offline;
pub mod payout;
pub mod resync;
pub mod wallet;

pub use error::{AppError, AppResult};
