use thiserror::Error;

use crate::db_types::{
    Addon,
    DeliveryContent,
    Gig,
    NewOrder,
    Order,
    OrderId,
    OrderStatus,
    Profile,
    SettlementOutcome,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Could not complete the database request. {0}")]
    DatabaseError(String),
    #[error("The requested gig does not exist or is not active")]
    GigNotAvailable,
    #[error("A reader cannot purchase their own gig")]
    SelfPurchase,
    #[error("The reader has reached their daily order limit")]
    DailyLimitReached,
    #[error("The reader has reached their limit of orders in progress")]
    SimultaneousLimitReached,
    #[error("The buyer profile is missing or has invalid fields: {0}")]
    IncompleteBuyerProfile(String),
    #[error("Add-on {0} does not belong to the selected gig")]
    UnknownAddon(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("No order is linked to payment {0}")]
    PaymentNotFound(String),
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition { order_id: OrderId, from: OrderStatus, to: OrderStatus },
    #[error("Order {0} does not belong to the caller")]
    NotYourOrder(OrderId),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

/// The storage operations behind order intake, settlement and fulfilment.
///
/// The mutating status operations (`settle_order`, `deliver_order`, `complete_order`,
/// `cancel_order`) must be atomic: the status check and the write happen in one transaction, so
/// two concurrent calls can never both succeed.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Send + Sync {
    /// Fetches a gig by id, whether active or not.
    async fn fetch_gig(&self, gig_id: &str) -> Result<Option<Gig>, OrderFlowError>;

    async fn fetch_addons_for_gig(&self, gig_id: &str) -> Result<Vec<Addon>, OrderFlowError>;

    async fn fetch_profile(&self, profile_id: &str) -> Result<Option<Profile>, OrderFlowError>;

    /// Counts the reader's non-cancelled orders created on the current UTC calendar day.
    async fn count_orders_today(&self, reader_id: &str) -> Result<i64, OrderFlowError>;

    /// Counts the reader's orders that are currently in progress (`Paid` or `Delivered`).
    async fn count_orders_in_progress(&self, reader_id: &str) -> Result<i64, OrderFlowError>;

    /// Creates a `PendingPayment` order and re-checks the reader's caps in the same transaction.
    /// The caller may check the caps up front to report them in a deterministic sequence, but
    /// only this re-check holds when two checkouts race for the last slot.
    async fn insert_order(
        &self,
        order: NewOrder,
        max_orders_per_day: i64,
        max_simultaneous_orders: i64,
    ) -> Result<Order, OrderFlowError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError>;

    async fn fetch_order_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, OrderFlowError>;

    /// All orders where the given profile is the client or the reader, newest first.
    async fn fetch_orders_for_profile(&self, profile_id: &str) -> Result<Vec<Order>, OrderFlowError>;

    /// Records the gateway charge id against the order.
    async fn attach_payment_id(&self, order_id: &OrderId, payment_id: &str) -> Result<Order, OrderFlowError>;

    /// Moves the order from `PendingPayment` to `Paid` and credits the reader's wallet with the
    /// net amount, in a single transaction. If the order has already left `PendingPayment` the
    /// call is a no-op and reports [`SettlementOutcome::AlreadySettled`].
    async fn settle_order(&self, order_id: &OrderId) -> Result<SettlementOutcome, OrderFlowError>;

    /// Moves a `Paid` order to `Delivered`, storing the delivery content. Only the order's reader
    /// may deliver.
    async fn deliver_order(
        &self,
        order_id: &OrderId,
        reader_id: &str,
        content: DeliveryContent,
    ) -> Result<Order, OrderFlowError>;

    /// Moves a `Delivered` order to `Completed` and releases the matching pending sale credit.
    /// Only the order's client may complete.
    async fn complete_order(&self, order_id: &OrderId, client_id: &str) -> Result<Order, OrderFlowError>;

    /// Cancels a `PendingPayment` order. Either party to the order may cancel.
    async fn cancel_order(&self, order_id: &OrderId, caller_id: &str) -> Result<Order, OrderFlowError>;
}
