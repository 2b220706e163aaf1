use arcana_engine::{
    db_types::{Addon, DeliveryContent, Gig, NewOrder, Order, OrderId, Profile, SettlementOutcome},
    traits::{OrderFlowError, OrderManagement},
};
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn fetch_gig(&self, gig_id: &str) -> Result<Option<Gig>, OrderFlowError>;
        async fn fetch_addons_for_gig(&self, gig_id: &str) -> Result<Vec<Addon>, OrderFlowError>;
        async fn fetch_profile(&self, profile_id: &str) -> Result<Option<Profile>, OrderFlowError>;
        async fn count_orders_today(&self, reader_id: &str) -> Result<i64, OrderFlowError>;
        async fn count_orders_in_progress(&self, reader_id: &str) -> Result<i64, OrderFlowError>;
        async fn insert_order(&self, order: NewOrder, max_orders_per_day: i64, max_simultaneous_orders: i64) -> Result<Order, OrderFlowError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_order_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_orders_for_profile(&self, profile_id: &str) -> Result<Vec<Order>, OrderFlowError>;
        async fn attach_payment_id(&self, order_id: &OrderId, payment_id: &str) -> Result<Order, OrderFlowError>;
        async fn settle_order(&self, order_id: &OrderId) -> Result<SettlementOutcome, OrderFlowError>;
        async fn deliver_order(&self, order_id: &OrderId, reader_id: &str, content: DeliveryContent) -> Result<Order, OrderFlowError>;
        async fn complete_order(&self, order_id: &OrderId, client_id: &str) -> Result<Order, OrderFlowError>;
        async fn cancel_order(&self, order_id: &OrderId, caller_id: &str) -> Result<Order, OrderFlowError>;
    }
}
