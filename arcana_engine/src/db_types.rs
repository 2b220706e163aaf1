//! The set of types that mirror the database tables, plus the enumerations stored in them.
//!
//! Statuses are stored as their variant names in TEXT columns, so every status enum carries the
//! usual `Display`/`FromStr` pair alongside the sqlx derive.

use std::fmt::Display;
use std::str::FromStr;

use arcana_common::Cents;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

// Re-exported so that downstream crates can build and destructure the JSON columns without
// depending on sqlx directly.
pub use sqlx::types::Json;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

//--------------------------------------     OrderId       ---------------------------------------

/// The unique identifier of an order, e.g. `ord_9f82ab31c0de44aa`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   OrderStatus     ---------------------------------------

/// The lifecycle of an order.
///
/// ```text
/// PendingPayment ──> Paid ──> Delivered ──> Completed
///        │
///        └────> Cancelled
/// ```
///
/// `Paid` is only ever set by payment settlement, and settlement is the only transition that
/// writes to the wallet ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Orders in these states count against a reader's simultaneous-order cap.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Delivered)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::PendingPayment => write!(f, "PendingPayment"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Completed => write!(f, "Completed"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PendingPayment" => Ok(OrderStatus::PendingPayment),
            "Paid" => Ok(OrderStatus::Paid),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------       Role        ---------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum Role {
    Client,
    Reader,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "Client"),
            Role::Reader => write!(f, "Reader"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Client" => Ok(Role::Client),
            "Reader" => Ok(Role::Reader),
            "Admin" => Ok(Role::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------  Ledger entries   ---------------------------------------

/// The kind of a ledger entry. Credits from sales are positive amounts; withdrawals are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum EntryType {
    SaleCredit,
    Withdrawal,
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::SaleCredit => write!(f, "SaleCredit"),
            EntryType::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

impl FromStr for EntryType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SaleCredit" => Ok(EntryType::SaleCredit),
            "Withdrawal" => Ok(EntryType::Withdrawal),
            s => Err(ConversionError(format!("Invalid entry type: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "Pending"),
            EntryStatus::Completed => write!(f, "Completed"),
            EntryStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for EntryStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(EntryStatus::Pending),
            "Completed" => Ok(EntryStatus::Completed),
            "Failed" => Ok(EntryStatus::Failed),
            s => Err(ConversionError(format!("Invalid entry status: {s}"))),
        }
    }
}

//--------------------------------------     Profile       ---------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub role: Role,
    pub display_name: String,
    pub email: String,
    /// PIX key used for payouts. Required before a reader can request a withdrawal.
    pub pix_key: Option<String>,
    /// CPF, digits only. Must pass check-digit validation before checkout.
    pub tax_id: Option<String>,
    pub cellphone: Option<String>,
    pub max_orders_per_day: i64,
    pub max_simultaneous_orders: i64,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_reader(&self) -> bool {
        matches!(self.role, Role::Reader)
    }
}

//--------------------------------------   Gig / Addon     ---------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Gig {
    pub id: String,
    pub reader_id: String,
    pub title: String,
    pub price: Cents,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    pub gig_id: String,
    pub title: String,
    pub price: Cents,
}

//--------------------------------------      Order        ---------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: String,
    pub reader_id: String,
    pub gig_id: String,
    pub status: OrderStatus,
    pub amount_total: Cents,
    pub amount_platform_fee: Cents,
    pub amount_reader_net: Cents,
    pub selected_addons: Json<Vec<String>>,
    pub requirements_answers: Json<serde_json::Value>,
    pub delivery_content: Option<Json<DeliveryContent>>,
    /// The gateway charge id, once a payment has been requested for this order.
    pub external_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order as it is built by the intake checks, before it has been written to the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub id: OrderId,
    pub client_id: String,
    pub reader_id: String,
    pub gig_id: String,
    pub amount_total: Cents,
    pub amount_platform_fee: Cents,
    pub amount_reader_net: Cents,
    pub selected_addons: Vec<String>,
    pub requirements_answers: serde_json::Value,
}

/// What a reader hands over when marking an order delivered. The two modes carry different
/// payloads, and a delivery is always exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeliveryContent {
    Physical {
        tracking_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        carrier: Option<String>,
    },
    Digital {
        cards: Vec<String>,
        interpretation: String,
    },
}

//-------------------------------------- Wallet / Ledger   ---------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub wallet_id: String,
    /// Positive for credits, negative for withdrawals.
    pub amount: Cents,
    pub entry_type: EntryType,
    pub status: EntryStatus,
    pub order_id: Option<OrderId>,
    /// Gateway transfer id for withdrawals that have been submitted for payout.
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Balances are never stored. They are derived from the full ledger on every read, so the ledger
/// remains the single source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalances {
    pub total_earnings: Cents,
    pub pending_balance: Cents,
    pub available_balance: Cents,
}

impl WalletBalances {
    /// Folds a set of ledger entries into the three derived balances.
    ///
    /// * `total_earnings`: sum of all `SaleCredit` amounts, regardless of status.
    /// * `pending_balance`: sum of `Pending` `SaleCredit` amounts.
    /// * `available_balance`: `Completed` credits plus every non-`Failed` withdrawal. Pending
    ///   withdrawals reduce the available balance immediately so funds cannot be requested twice.
    pub fn from_entries<'a, I: IntoIterator<Item = &'a LedgerEntry>>(entries: I) -> Self {
        let mut balances = WalletBalances::default();
        for entry in entries {
            match (entry.entry_type, entry.status) {
                (EntryType::SaleCredit, EntryStatus::Pending) => {
                    balances.total_earnings += entry.amount;
                    balances.pending_balance += entry.amount;
                },
                (EntryType::SaleCredit, EntryStatus::Completed) => {
                    balances.total_earnings += entry.amount;
                    balances.available_balance += entry.amount;
                },
                (EntryType::SaleCredit, EntryStatus::Failed) => {
                    balances.total_earnings += entry.amount;
                },
                (EntryType::Withdrawal, EntryStatus::Failed) => {},
                (EntryType::Withdrawal, _) => {
                    balances.available_balance += entry.amount;
                },
            }
        }
        balances
    }
}

//--------------------------------------    Settlement     ---------------------------------------

/// The result of settling a payment against an order.
#[derive(Debug, Clone)]
pub enum SettlementOutcome {
    /// The order moved from `PendingPayment` to `Paid` and the reader was credited.
    Settled { order: Order, credit: LedgerEntry },
    /// The order had already left `PendingPayment`; nothing was written.
    AlreadySettled(Order),
}

impl SettlementOutcome {
    pub fn order(&self) -> &Order {
        match self {
            SettlementOutcome::Settled { order, .. } => order,
            SettlementOutcome::AlreadySettled(order) => order,
        }
    }
}
