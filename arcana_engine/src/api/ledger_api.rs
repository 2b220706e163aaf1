//! Read and write access to the wallet ledger.

use arcana_common::Cents;

use crate::{
    db_types::{LedgerEntry, Profile, WalletBalances},
    traits::{LedgerError, LedgerManagement},
};

pub struct LedgerApi<B> {
    db: B,
}

impl<B: std::fmt::Debug> std::fmt::Debug for LedgerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LedgerApi ({:?})", self.db)
    }
}

impl<B> LedgerApi<B>
where B: LedgerManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The derived balances for a user. A user who has never been credited simply has a zero
    /// balance; there is no error case for a missing wallet.
    pub async fn balances_for_user(&self, user_id: &str) -> Result<WalletBalances, LedgerError> {
        match self.db.fetch_wallet_for_user(user_id).await? {
            Some(wallet) => {
                let entries = self.db.fetch_entries_for_wallet(&wallet.id).await?;
                Ok(WalletBalances::from_entries(&entries))
            },
            None => Ok(WalletBalances::default()),
        }
    }

    /// The full ledger for a user, newest entries first.
    pub async fn entries_for_user(&self, user_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        match self.db.fetch_wallet_for_user(user_id).await? {
            Some(wallet) => self.db.fetch_entries_for_wallet(&wallet.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Requests a withdrawal for the given profile. The amount must be positive, the profile
    /// must have a PIX key registered, and the available balance must cover the amount. The
    /// balance check happens atomically with the ledger insert.
    pub async fn request_withdrawal(&self, profile: &Profile, amount: Cents) -> Result<LedgerEntry, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount);
        }
        let Some(pix_key) = profile.pix_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) else {
            return Err(LedgerError::MissingPixKey);
        };
        self.db.insert_withdrawal(&profile.id, amount, pix_key).await
    }
}
