//! Order service: one method per lifecycle operation.

use common::{OrderId, OrderState, PartnerId};
use order_store::{OrderRecord, OrderStore, OrderUpdate};

use crate::error::DomainError;

use super::{
    ConfirmOrder, CreateOrder, MarkDelivered, OrderError, PartnerCancelOrder, ReceiveOrder,
    ShipOrder, UserCancelOrder,
};

impl From<OrderError> for DomainError {
    fn from(e: OrderError) -> Self {
        DomainError::Order(e)
    }
}

/// Service for driving orders through their lifecycle.
///
/// Each operation performs one store read, validates the command against
/// the transition table, and issues one conditional store write. The write
/// is keyed on the state the validation saw, so a concurrent transition
/// surfaces as a store-level state conflict instead of a silent overwrite.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Places a new order.
    ///
    /// Checks, in order: the item exists, the offered price matches the
    /// listed price, the item has an assigned partner. The order starts in
    /// `receiving` state, owned by the buyer and the item's partner.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<OrderRecord, DomainError> {
        let item = self
            .store
            .find_item(cmd.item_id)
            .await?
            .ok_or_else(|| DomainError::from(OrderError::item_not_found(cmd.item_id)))?;

        if item.price != cmd.price {
            return Err(OrderError::PriceMismatch {
                offered: cmd.price,
                listed: item.price,
            }
            .into());
        }

        let partner_id = item.partner_id.ok_or(OrderError::MissingPartner {
            item_id: cmd.item_id,
        })?;

        let record = OrderRecord::new(
            cmd.order_id,
            cmd.buyer_id,
            partner_id,
            cmd.item_id,
            cmd.price,
        );
        let record = self.store.insert_order(record).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %record.id, partner_id = %record.partner_id, "order created");

        Ok(record)
    }

    /// Buyer cancels an order the partner has not yet acknowledged.
    #[tracing::instrument(skip(self))]
    pub async fn user_cancel(&self, cmd: UserCancelOrder) -> Result<OrderRecord, DomainError> {
        let order = self.load(cmd.order_id).await?;

        if order.buyer_id != cmd.buyer_id {
            return Err(OrderError::forbidden(cmd.order_id, cmd.buyer_id, "cancel").into());
        }
        if !order.state.can_user_cancel() {
            return Err(OrderError::InvalidState {
                action: "cancel",
                current: order.state,
            }
            .into());
        }

        self.transition(order, OrderUpdate::to_state(OrderState::Canceled), "user_cancel")
            .await
    }

    /// Partner cancels an order at any non-terminal point in its life.
    #[tracing::instrument(skip(self))]
    pub async fn partner_cancel(
        &self,
        cmd: PartnerCancelOrder,
    ) -> Result<OrderRecord, DomainError> {
        let order = self.load(cmd.order_id).await?;

        if order.partner_id != cmd.partner_id {
            return Err(OrderError::forbidden(cmd.order_id, cmd.partner_id, "cancel").into());
        }
        if !order.state.can_partner_cancel() {
            return Err(OrderError::InvalidState {
                action: "cancel",
                current: order.state,
            }
            .into());
        }

        self.transition(
            order,
            OrderUpdate::to_state(OrderState::Canceled),
            "partner_cancel",
        )
        .await
    }

    /// Partner acknowledges a freshly placed order.
    #[tracing::instrument(skip(self))]
    pub async fn receive_order(&self, cmd: ReceiveOrder) -> Result<OrderRecord, DomainError> {
        let order = self.load(cmd.order_id).await?;

        if order.partner_id != cmd.partner_id {
            return Err(OrderError::forbidden(cmd.order_id, cmd.partner_id, "receive").into());
        }
        if !order.state.can_receive() {
            return Err(OrderError::InvalidState {
                action: "receive",
                current: order.state,
            }
            .into());
        }

        self.transition(
            order,
            OrderUpdate::to_state(OrderState::ReceiptCompleted),
            "receive",
        )
        .await
    }

    /// Partner ships an acknowledged order. The state change and the
    /// waybill number land in the same persistence write.
    #[tracing::instrument(skip(self))]
    pub async fn ship_order(&self, cmd: ShipOrder) -> Result<OrderRecord, DomainError> {
        let order = self.load(cmd.order_id).await?;

        if order.partner_id != cmd.partner_id {
            return Err(OrderError::forbidden(cmd.order_id, cmd.partner_id, "ship").into());
        }
        if !order.state.can_ship() {
            return Err(OrderError::InvalidState {
                action: "ship",
                current: order.state,
            }
            .into());
        }

        self.transition(order, OrderUpdate::shipped(cmd.waybill_number), "ship")
            .await
    }

    /// Partner marks the shipment delivered.
    #[tracing::instrument(skip(self))]
    pub async fn mark_delivered(&self, cmd: MarkDelivered) -> Result<OrderRecord, DomainError> {
        let order = self.load(cmd.order_id).await?;

        if order.partner_id != cmd.partner_id {
            return Err(
                OrderError::forbidden(cmd.order_id, cmd.partner_id, "mark delivered").into(),
            );
        }
        if !order.state.can_mark_delivered() {
            return Err(OrderError::InvalidState {
                action: "mark delivered",
                current: order.state,
            }
            .into());
        }

        self.transition(
            order,
            OrderUpdate::to_state(OrderState::DeliveryCompleted),
            "mark_delivered",
        )
        .await
    }

    /// Buyer confirms a delivered order, closing it out.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_order(&self, cmd: ConfirmOrder) -> Result<OrderRecord, DomainError> {
        let order = self.load(cmd.order_id).await?;

        if order.buyer_id != cmd.buyer_id {
            return Err(OrderError::forbidden(cmd.order_id, cmd.buyer_id, "confirm").into());
        }
        if !order.state.can_confirm() {
            return Err(OrderError::InvalidState {
                action: "confirm",
                current: order.state,
            }
            .into());
        }

        self.transition(
            order,
            OrderUpdate::to_state(OrderState::Confirmation),
            "confirm",
        )
        .await
    }

    /// Loads an order by ID.
    ///
    /// Returns None if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>, DomainError> {
        Ok(self.store.find_order(order_id).await?)
    }

    /// Lists a partner's orders still waiting to be acknowledged.
    #[tracing::instrument(skip(self))]
    pub async fn orders_awaiting_receipt(
        &self,
        partner_id: PartnerId,
    ) -> Result<Vec<OrderRecord>, DomainError> {
        Ok(self.store.find_orders_awaiting_receipt(partner_id).await?)
    }

    async fn load(&self, order_id: OrderId) -> Result<OrderRecord, DomainError> {
        self.store
            .find_order(order_id)
            .await?
            .ok_or_else(|| OrderError::order_not_found(order_id).into())
    }

    async fn transition(
        &self,
        order: OrderRecord,
        update: OrderUpdate,
        action: &'static str,
    ) -> Result<OrderRecord, DomainError> {
        // Conditional write keyed on the state the validation ran against.
        let updated = self
            .store
            .transition_order(order.id, order.state, update)
            .await?;

        metrics::counter!("order_transitions_total", "action" => action).increment(1);
        tracing::info!(
            order_id = %updated.id,
            from = %order.state,
            to = %updated.state,
            "order transitioned"
        );

        Ok(updated)
    }
}
