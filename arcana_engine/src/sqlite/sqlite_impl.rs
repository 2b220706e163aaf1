//! `SqliteDatabase` is a concrete implementation of an Arcana engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use arcana_common::Cents;
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, gigs, new_pool, orders, profiles, sessions, transactions, wallets};
use crate::{
    db_types::{
        Addon,
        DeliveryContent,
        Gig,
        LedgerEntry,
        NewOrder,
        Order,
        OrderId,
        OrderStatus,
        Profile,
        SettlementOutcome,
        Wallet,
        WalletBalances,
    },
    traits::{
        AuthApiError,
        AuthManagement,
        LedgerError,
        LedgerManagement,
        OrderFlowError,
        OrderManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database pool using the value of the `ARC_DATABASE_URL` environment
    /// variable, or the default if it is not set.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_gig(&self, gig_id: &str) -> Result<Option<Gig>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let gig = gigs::fetch_gig(gig_id, &mut conn).await?;
        Ok(gig)
    }

    async fn fetch_addons_for_gig(&self, gig_id: &str) -> Result<Vec<Addon>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let addons = gigs::fetch_addons_for_gig(gig_id, &mut conn).await?;
        Ok(addons)
    }

    async fn fetch_profile(&self, profile_id: &str) -> Result<Option<Profile>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let profile = profiles::fetch_profile(profile_id, &mut conn).await?;
        Ok(profile)
    }

    async fn count_orders_today(&self, reader_id: &str) -> Result<i64, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::count_orders_today(reader_id, &mut conn).await?;
        Ok(count)
    }

    async fn count_orders_in_progress(&self, reader_id: &str) -> Result<i64, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::count_orders_in_progress(reader_id, &mut conn).await?;
        Ok(count)
    }

    async fn insert_order(
        &self,
        order: NewOrder,
        max_orders_per_day: i64,
        max_simultaneous_orders: i64,
    ) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        // The insert comes first so the write lock serializes concurrent checkouts. The counts
        // that follow include the new row and anything a competing checkout already committed.
        let order = orders::insert_order(order, &mut tx).await?;
        if orders::count_orders_today(&order.reader_id, &mut tx).await? > max_orders_per_day {
            tx.rollback().await?;
            return Err(OrderFlowError::DailyLimitReached);
        }
        if orders::count_orders_in_progress(&order.reader_id, &mut tx).await? >= max_simultaneous_orders {
            tx.rollback().await?;
            return Err(OrderFlowError::SimultaneousLimitReached);
        }
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_payment_id(payment_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_profile(&self, profile_id: &str) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_profile(profile_id, &mut conn).await?;
        Ok(orders)
    }

    async fn attach_payment_id(&self, order_id: &OrderId, payment_id: &str) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::attach_payment_id(order_id, payment_id, &mut conn)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        Ok(order)
    }

    async fn settle_order(&self, order_id: &OrderId) -> Result<SettlementOutcome, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        // The conditional update is the first statement of the transaction, so the write lock is
        // taken before anything is read and a concurrent settlement cannot interleave between
        // the status check and the status write.
        match orders::mark_paid(order_id, &mut tx).await? {
            Some(order) => {
                let wallet = wallets::fetch_or_create_wallet(&order.reader_id, &mut tx).await?;
                let credit =
                    transactions::insert_sale_credit(&wallet.id, order.amount_reader_net, &order.id, &mut tx).await?;
                tx.commit().await?;
                info!(
                    "💰️ Order {} settled. {} credited to reader {}",
                    order.id, order.amount_reader_net, order.reader_id
                );
                Ok(SettlementOutcome::Settled { order, credit })
            },
            None => {
                let order = orders::fetch_order(order_id, &mut tx)
                    .await?
                    .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
                tx.commit().await?;
                debug!("💰️ Order {} is already {}. Nothing to settle.", order.id, order.status);
                Ok(SettlementOutcome::AlreadySettled(order))
            },
        }
    }

    async fn deliver_order(
        &self,
        order_id: &OrderId,
        reader_id: &str,
        content: DeliveryContent,
    ) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        match orders::mark_delivered(order_id, reader_id, content, &mut conn).await? {
            Some(order) => {
                info!("📦️ Order {} delivered by reader {reader_id}", order.id);
                Ok(order)
            },
            None => {
                let order = orders::fetch_order(order_id, &mut conn)
                    .await?
                    .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
                if order.reader_id != reader_id {
                    return Err(OrderFlowError::NotYourOrder(order_id.clone()));
                }
                Err(OrderFlowError::InvalidTransition {
                    order_id: order_id.clone(),
                    from: order.status,
                    to: OrderStatus::Delivered,
                })
            },
        }
    }

    async fn complete_order(&self, order_id: &OrderId, client_id: &str) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        match orders::mark_completed(order_id, client_id, &mut tx).await? {
            Some(order) => {
                let released = transactions::release_credit_for_order(&order.id, &mut tx).await?;
                tx.commit().await?;
                if released == 0 {
                    warn!("💰️ Order {} completed, but no pending credit was found to release", order.id);
                }
                info!("📦️ Order {} completed by client {client_id}", order.id);
                Ok(order)
            },
            None => {
                let order = orders::fetch_order(order_id, &mut tx)
                    .await?
                    .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
                tx.commit().await?;
                if order.client_id != client_id {
                    return Err(OrderFlowError::NotYourOrder(order_id.clone()));
                }
                Err(OrderFlowError::InvalidTransition {
                    order_id: order_id.clone(),
                    from: order.status,
                    to: OrderStatus::Completed,
                })
            },
        }
    }

    async fn cancel_order(&self, order_id: &OrderId, caller_id: &str) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        match orders::mark_cancelled(order_id, caller_id, &mut conn).await? {
            Some(order) => {
                info!("📦️ Order {} cancelled by {caller_id}", order.id);
                Ok(order)
            },
            None => {
                let order = orders::fetch_order(order_id, &mut conn)
                    .await?
                    .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
                if order.client_id != caller_id && order.reader_id != caller_id {
                    return Err(OrderFlowError::NotYourOrder(order_id.clone()));
                }
                Err(OrderFlowError::InvalidTransition {
                    order_id: order_id.clone(),
                    from: order.status,
                    to: OrderStatus::Cancelled,
                })
            },
        }
    }
}

impl LedgerManagement for SqliteDatabase {
    async fn fetch_wallet_for_user(&self, user_id: &str) -> Result<Option<Wallet>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let wallet = wallets::fetch_wallet_for_user(user_id, &mut conn).await?;
        Ok(wallet)
    }

    async fn fetch_entries_for_wallet(&self, wallet_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let entries = transactions::fetch_entries_for_wallet(wallet_id, &mut conn).await?;
        Ok(entries)
    }

    async fn insert_withdrawal(
        &self,
        user_id: &str,
        amount: Cents,
        pix_key: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let Some(wallet) = wallets::fetch_wallet_for_user(user_id, &mut tx).await? else {
            return Err(LedgerError::InsufficientBalance { requested: amount, available: Cents::default() });
        };
        // The balance is re-derived inside the transaction, so a racing withdrawal cannot spend
        // the same funds twice.
        let entries = transactions::fetch_entries_for_wallet(&wallet.id, &mut tx).await?;
        let available = WalletBalances::from_entries(&entries).available_balance;
        if amount > available {
            return Err(LedgerError::InsufficientBalance { requested: amount, available });
        }
        let entry = transactions::insert_withdrawal_entry(&wallet.id, -amount, pix_key, &mut tx).await?;
        tx.commit().await?;
        info!("💸️ Withdrawal of {amount} requested for user {user_id}");
        Ok(entry)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn profile_for_session(&self, token: &str) -> Result<Profile, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let profile = sessions::profile_for_session(token, &mut conn).await?.ok_or(AuthApiError::SessionNotFound)?;
        Ok(profile)
    }
}
