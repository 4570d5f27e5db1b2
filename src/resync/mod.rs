// Funding resync for sale orders whose payment was missed
pub mod coordinator;
pub mod horizon;
pub mod models;
pub mod repository;
pub mod store;

pub use coordinator::FundingResyncCoordinator;
pub use models::{CoinRescan, CycleReport, RescanOutcome, ResyncConfig, UnfundedOrderRecord};
pub use repository::PgSaleOrderStore;
pub use store::{InMemorySaleOrderStore, SaleOrderStore};
