//! Order lifecycle commands.
//!
//! Every command carries the acting identity explicitly. There is no
//! ambient "current user"; the caller resolves identity and passes it in.

use common::{BuyerId, ItemId, Money, OrderId, PartnerId};

/// Command to place a new order for a catalog item.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// The order ID to create.
    pub order_id: OrderId,

    /// The buyer placing the order.
    pub buyer_id: BuyerId,

    /// The item being ordered.
    pub item_id: ItemId,

    /// The price the buyer saw; must match the item's listed price.
    pub price: Money,
}

impl CreateOrder {
    /// Creates a new CreateOrder command.
    pub fn new(order_id: OrderId, buyer_id: BuyerId, item_id: ItemId, price: Money) -> Self {
        Self {
            order_id,
            buyer_id,
            item_id,
            price,
        }
    }

    /// Creates a new CreateOrder command with a generated order ID.
    pub fn for_buyer(buyer_id: BuyerId, item_id: ItemId, price: Money) -> Self {
        Self {
            order_id: OrderId::new(),
            buyer_id,
            item_id,
            price,
        }
    }
}

/// Command for the buyer to cancel an order not yet acknowledged.
#[derive(Debug, Clone)]
pub struct UserCancelOrder {
    pub order_id: OrderId,
    pub buyer_id: BuyerId,
}

impl UserCancelOrder {
    pub fn new(order_id: OrderId, buyer_id: BuyerId) -> Self {
        Self { order_id, buyer_id }
    }
}

/// Command for the partner to cancel an order at any non-terminal point.
#[derive(Debug, Clone)]
pub struct PartnerCancelOrder {
    pub order_id: OrderId,
    pub partner_id: PartnerId,
}

impl PartnerCancelOrder {
    pub fn new(order_id: OrderId, partner_id: PartnerId) -> Self {
        Self {
            order_id,
            partner_id,
        }
    }
}

/// Command for the partner to acknowledge receipt of an order.
#[derive(Debug, Clone)]
pub struct ReceiveOrder {
    pub order_id: OrderId,
    pub partner_id: PartnerId,
}

impl ReceiveOrder {
    pub fn new(order_id: OrderId, partner_id: PartnerId) -> Self {
        Self {
            order_id,
            partner_id,
        }
    }
}

/// Command for the partner to ship an order, recording the waybill number.
#[derive(Debug, Clone)]
pub struct ShipOrder {
    pub order_id: OrderId,
    pub partner_id: PartnerId,
    pub waybill_number: String,
}

impl ShipOrder {
    pub fn new(
        order_id: OrderId,
        partner_id: PartnerId,
        waybill_number: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            partner_id,
            waybill_number: waybill_number.into(),
        }
    }
}

/// Command for the partner to mark a shipment delivered.
#[derive(Debug, Clone)]
pub struct MarkDelivered {
    pub order_id: OrderId,
    pub partner_id: PartnerId,
}

impl MarkDelivered {
    pub fn new(order_id: OrderId, partner_id: PartnerId) -> Self {
        Self {
            order_id,
            partner_id,
        }
    }
}

/// Command for the buyer to confirm a delivered order.
#[derive(Debug, Clone)]
pub struct ConfirmOrder {
    pub order_id: OrderId,
    pub buyer_id: BuyerId,
}

impl ConfirmOrder {
    pub fn new(order_id: OrderId, buyer_id: BuyerId) -> Self {
        Self { order_id, buyer_id }
    }
}
