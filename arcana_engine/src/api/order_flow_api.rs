//! The order flow API holds the business rules for checkout, settlement and fulfilment. The
//! storage backend only guarantees atomicity; everything about *whether* an order may be placed
//! or moved lives here.

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{DeliveryContent, NewOrder, Order, OrderId, Profile, Role, SettlementOutcome},
    helpers::{cpf::is_valid_cpf, fees::platform_fee_split, ids},
    traits::{OrderFlowError, OrderManagement},
};

/// What a client submits at checkout. Amounts are never part of the request; they are always
/// computed server-side from the gig and add-on prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub gig_id: String,
    #[serde(default)]
    pub selected_addons: Vec<String>,
    #[serde(default)]
    pub requirements_answers: serde_json::Value,
}

pub struct OrderFlowApi<B> {
    db: B,
}

impl<B: std::fmt::Debug> std::fmt::Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.db)
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Runs the intake checks and creates a `PendingPayment` order.
    ///
    /// The checks run in a fixed sequence and the first failure is the one reported:
    /// 1. The gig exists and is active.
    /// 2. The buyer is not the gig's reader.
    /// 3. The reader has room under their daily order cap (UTC calendar day).
    /// 4. The reader has room under their in-progress cap.
    /// 5. The buyer has a valid CPF and a cellphone on file.
    ///
    /// All pricing is computed here from the stored gig and add-on prices. Whatever the client
    /// claims about amounts never enters the flow.
    ///
    /// The cap checks (3 and 4) run again inside the insert transaction, so two concurrent
    /// checkouts cannot both take a reader's last open slot.
    pub async fn place_order(&self, buyer: &Profile, request: NewOrderRequest) -> Result<Order, OrderFlowError> {
        let gig = self
            .db
            .fetch_gig(&request.gig_id)
            .await?
            .filter(|g| g.active)
            .ok_or(OrderFlowError::GigNotAvailable)?;
        if gig.reader_id == buyer.id {
            return Err(OrderFlowError::SelfPurchase);
        }
        let reader = self.db.fetch_profile(&gig.reader_id).await?.ok_or_else(|| {
            OrderFlowError::DatabaseError(format!("Gig {} references a reader that does not exist", gig.id))
        })?;
        let today = self.db.count_orders_today(&reader.id).await?;
        if today >= reader.max_orders_per_day {
            debug!("📝️ Reader {} is at their daily cap ({today} orders)", reader.id);
            return Err(OrderFlowError::DailyLimitReached);
        }
        let in_progress = self.db.count_orders_in_progress(&reader.id).await?;
        if in_progress >= reader.max_simultaneous_orders {
            debug!("📝️ Reader {} has {in_progress} orders in progress. Rejecting.", reader.id);
            return Err(OrderFlowError::SimultaneousLimitReached);
        }
        check_buyer_details(buyer)?;
        let addons = self.db.fetch_addons_for_gig(&gig.id).await?;
        let mut total = gig.price;
        for addon_id in &request.selected_addons {
            let addon = addons
                .iter()
                .find(|a| &a.id == addon_id)
                .ok_or_else(|| OrderFlowError::UnknownAddon(addon_id.clone()))?;
            total = total + addon.price;
        }
        let (fee, net) = platform_fee_split(total);
        let order = NewOrder {
            id: OrderId::new(ids::object_id("ord")),
            client_id: buyer.id.clone(),
            reader_id: reader.id.clone(),
            gig_id: gig.id.clone(),
            amount_total: total,
            amount_platform_fee: fee,
            amount_reader_net: net,
            selected_addons: request.selected_addons,
            requirements_answers: request.requirements_answers,
        };
        let order =
            self.db.insert_order(order, reader.max_orders_per_day, reader.max_simultaneous_orders).await?;
        info!("📝️ Order {} placed by {} for gig {} at {}", order.id, buyer.id, order.gig_id, order.amount_total);
        Ok(order)
    }

    /// Records the gateway charge id against the order so that webhook and polling callbacks can
    /// find it again.
    pub async fn attach_payment_id(&self, order_id: &OrderId, payment_id: &str) -> Result<Order, OrderFlowError> {
        self.db.attach_payment_id(order_id, payment_id).await
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        self.db.fetch_order(order_id).await
    }

    /// Fetches an order on behalf of a profile. Admins see everything; everyone else only sees
    /// orders they are a party to.
    pub async fn fetch_order_for(&self, profile: &Profile, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        let order =
            self.db.fetch_order(order_id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        let is_party = order.client_id == profile.id || order.reader_id == profile.id;
        if !is_party && profile.role != Role::Admin {
            return Err(OrderFlowError::NotYourOrder(order_id.clone()));
        }
        Ok(order)
    }

    pub async fn orders_for_profile(&self, profile: &Profile) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_orders_for_profile(&profile.id).await
    }

    /// Settles the payment identified by the gateway charge id. This is the entry point for both
    /// the webhook and the polling reconciliation path; whichever arrives second becomes a no-op.
    pub async fn settle_by_payment_id(&self, payment_id: &str) -> Result<SettlementOutcome, OrderFlowError> {
        let order = self
            .db
            .fetch_order_by_payment_id(payment_id)
            .await?
            .ok_or_else(|| OrderFlowError::PaymentNotFound(payment_id.to_string()))?;
        let outcome = self.db.settle_order(&order.id).await?;
        if let SettlementOutcome::AlreadySettled(order) = &outcome {
            debug!("💰️ Payment {payment_id} for order {} was already settled", order.id);
        }
        Ok(outcome)
    }

    pub async fn settle_order(&self, order_id: &OrderId) -> Result<SettlementOutcome, OrderFlowError> {
        self.db.settle_order(order_id).await
    }

    pub async fn deliver_order(
        &self,
        reader: &Profile,
        order_id: &OrderId,
        content: DeliveryContent,
    ) -> Result<Order, OrderFlowError> {
        self.db.deliver_order(order_id, &reader.id, content).await
    }

    pub async fn complete_order(&self, client: &Profile, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        self.db.complete_order(order_id, &client.id).await
    }

    pub async fn cancel_order(&self, caller: &Profile, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        self.db.cancel_order(order_id, &caller.id).await
    }
}

/// A buyer needs a valid CPF and a cellphone on file before a charge can be created for them.
fn check_buyer_details(buyer: &Profile) -> Result<(), OrderFlowError> {
    let mut missing = Vec::new();
    match buyer.tax_id.as_deref() {
        Some(cpf) if is_valid_cpf(cpf) => {},
        _ => missing.push("tax_id"),
    }
    if buyer.cellphone.as_deref().map(str::trim).filter(|c| !c.is_empty()).is_none() {
        missing.push("cellphone");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(OrderFlowError::IncompleteBuyerProfile(missing.join(", ")))
    }
}
