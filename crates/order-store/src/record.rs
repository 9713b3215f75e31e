//! Stored record types.

use chrono::{DateTime, Utc};
use common::{BuyerId, ItemId, Money, OrderId, OrderState, PartnerId};
use serde::{Deserialize, Serialize};

/// A stored order.
///
/// Created once by the buyer's create operation and mutated exclusively
/// through [`crate::OrderStore::transition_order`]. Orders are never
/// deleted; cancellation is a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Unique order identifier.
    pub id: OrderId,

    /// Buyer who placed the order.
    pub buyer_id: BuyerId,

    /// Partner fulfilling the order, taken from the item at create time.
    pub partner_id: PartnerId,

    /// The ordered catalog item.
    pub item_id: ItemId,

    /// Price agreed at create time, matching the item price.
    pub price: Money,

    /// Current lifecycle state.
    pub state: OrderState,

    /// Shipment tracking identifier, set when the order ships.
    pub waybill_number: Option<String>,

    /// When the order was placed.
    pub created_at: DateTime<Utc>,

    /// When the order last changed state.
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Creates a new order record in the initial `receiving` state.
    pub fn new(
        id: OrderId,
        buyer_id: BuyerId,
        partner_id: PartnerId,
        item_id: ItemId,
        price: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            buyer_id,
            partner_id,
            item_id,
            price,
            state: OrderState::Receiving,
            waybill_number: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A catalog item, read-only from the lifecycle manager's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Unique item identifier.
    pub id: ItemId,

    /// Display name of the item.
    pub name: String,

    /// Listed price.
    pub price: Money,

    /// The partner selling this item. A listing without an assigned
    /// partner cannot be ordered.
    pub partner_id: Option<PartnerId>,
}

impl ItemRecord {
    /// Creates a new item record.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        price: Money,
        partner_id: Option<PartnerId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            partner_id,
        }
    }
}
