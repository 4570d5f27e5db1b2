use thiserror::Error;

use crate::wallet::models::Coin;

/// Top-level error type for the settlement core
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Payout error: {0}")]
    Payout(#[from] PayoutError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Resync error: {0}")]
    Resync(#[from] ResyncError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Offline storage error: {0}")]
    OfflineStorage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Dispute payout resolution errors
///
/// Every variant reaches the caller synchronously. A payout that cannot be
/// resolved blocks the settlement; nothing here is ever defaulted.
#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("Malformed payout input: {0}")]
    MalformedInput(String),

    #[error("Dispute payout has no destination")]
    MissingDestination,

    #[error("Unsupported payout destination type: {0}")]
    UnsupportedVariant(String),

    #[error("Failed to decode dispute payout address: {source}")]
    AddressDecode {
        #[source]
        source: WalletError,
    },

    /// Script-to-address failures already carry their own context
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Invalid payout amount: {0}")]
    InvalidAmount(String),

    #[error("Dispute payout contains no outputs")]
    EmptyPayout,

    #[error("Dispute payout address {0} is not held by this wallet")]
    DestinationNotInWallet(String),
}

/// Wallet capability errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Invalid address for {coin}: {address}")]
    InvalidAddress { coin: Coin, address: String },

    #[error("Script does not map to a {coin} address: {reason}")]
    InvalidScript { coin: Coin, reason: String },

    #[error("No wallet registered for coin {0}")]
    UnknownCoin(String),

    #[error("Wallet unavailable: {0}")]
    Unavailable(String),
}

/// Sale-order store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Order not found: {0}")]
    NotFound(String),
}

/// Funding resync failures. Logged inside the coordinator, never
/// propagated out of its background task.
#[derive(Error, Debug)]
pub enum ResyncError {
    #[error("Sale-order store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("Wallet rescan could not be issued: {0}")]
    WalletUnavailable(#[source] WalletError),
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        AppError::Store(StoreError::Database(error))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration error: {:?}", error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(format!("Error converting: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
