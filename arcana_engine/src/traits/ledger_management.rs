use arcana_common::Cents;
use thiserror::Error;

use crate::db_types::{LedgerEntry, Wallet};

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Could not complete the database request. {0}")]
    DatabaseError(String),
    #[error("Withdrawal amounts must be positive")]
    InvalidAmount,
    #[error("Requested {requested} but only {available} is available")]
    InsufficientBalance { requested: Cents, available: Cents },
    #[error("A PIX key must be registered before requesting a withdrawal")]
    MissingPixKey,
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}

/// Storage operations for wallets and their ledgers.
#[allow(async_fn_in_trait)]
pub trait LedgerManagement: Send + Sync {
    async fn fetch_wallet_for_user(&self, user_id: &str) -> Result<Option<Wallet>, LedgerError>;

    /// Every ledger entry for the wallet, newest first.
    async fn fetch_entries_for_wallet(&self, wallet_id: &str) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Inserts a pending withdrawal (a negative ledger entry) after re-deriving the available
    /// balance inside the same transaction. A user without a wallet has an available balance of
    /// zero. The PIX key is snapshotted on the entry, so later profile edits do not redirect a
    /// payout that was already requested.
    async fn insert_withdrawal(&self, user_id: &str, amount: Cents, pix_key: &str)
        -> Result<LedgerEntry, LedgerError>;
}
