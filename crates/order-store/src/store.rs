use async_trait::async_trait;
use common::{ItemId, OrderId, OrderState, PartnerId};

use crate::{ItemRecord, OrderRecord, Result};

/// The fields written by a state transition.
///
/// Every transition writes the new state; `ship` additionally records the
/// waybill number. Both land in the same persistence update.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    /// The state the order moves to.
    pub state: OrderState,

    /// Waybill number to record alongside the transition, if any. `None`
    /// leaves any previously stored value untouched.
    pub waybill_number: Option<String>,
}

impl OrderUpdate {
    /// Creates an update that only changes the state.
    pub fn to_state(state: OrderState) -> Self {
        Self {
            state,
            waybill_number: None,
        }
    }

    /// Creates the shipping update: moves to `deliveryProgress` and
    /// records the waybill number.
    pub fn shipped(waybill_number: impl Into<String>) -> Self {
        Self {
            state: OrderState::DeliveryProgress,
            waybill_number: Some(waybill_number.into()),
        }
    }
}

/// Core trait for order store implementations.
///
/// All operations are atomic at the single-record level. Race safety for
/// concurrent transitions against the same order comes from
/// [`transition_order`](OrderStore::transition_order)'s conditional write,
/// not from any coordination in the caller.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a newly created order.
    ///
    /// Fails with `DuplicateOrder` if an order with the same ID exists.
    async fn insert_order(&self, record: OrderRecord) -> Result<OrderRecord>;

    /// Retrieves an order by ID.
    async fn find_order(&self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Atomically transitions an order from `expected` state to the state
    /// carried by `update`.
    ///
    /// The write applies only if the stored state still equals `expected`;
    /// otherwise it fails with `StateConflict` and writes nothing. Returns
    /// the updated record.
    async fn transition_order(
        &self,
        id: OrderId,
        expected: OrderState,
        update: OrderUpdate,
    ) -> Result<OrderRecord>;

    /// Retrieves a catalog item by ID.
    async fn find_item(&self, id: ItemId) -> Result<Option<ItemRecord>>;

    /// Retrieves a partner's orders still waiting to be acknowledged,
    /// oldest first.
    async fn find_orders_awaiting_receipt(
        &self,
        partner_id: PartnerId,
    ) -> Result<Vec<OrderRecord>>;
}
