use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{ItemId, OrderId, OrderState, PartnerId};
use tokio::sync::RwLock;

use crate::{
    ItemRecord, OrderRecord, Result, StoreError,
    store::{OrderStore, OrderUpdate},
};

/// In-memory order store implementation for tests and local development.
///
/// Provides the same interface and the same conditional-transition
/// semantics as the PostgreSQL implementation. The compare-and-swap runs
/// under the write lock, so concurrent transitions against the same order
/// serialize here just as they do against the database.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
    items: Arc<RwLock<HashMap<ItemId, ItemRecord>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a catalog item. Items are read-only through the store trait;
    /// this helper stands in for the external catalog.
    pub async fn put_item(&self, item: ItemRecord) {
        self.items.write().await.insert(item.id, item);
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders and items.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
        self.items.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order(&self, record: OrderRecord) -> Result<OrderRecord> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&record.id) {
            return Err(StoreError::DuplicateOrder(record.id));
        }
        orders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn transition_order(
        &self,
        id: OrderId,
        expected: OrderState,
        update: OrderUpdate,
    ) -> Result<OrderRecord> {
        let mut orders = self.orders.write().await;
        let record = orders.get_mut(&id).ok_or(StoreError::OrderNotFound(id))?;

        if record.state != expected {
            return Err(StoreError::StateConflict {
                order_id: id,
                expected,
                actual: record.state,
            });
        }

        record.state = update.state;
        if let Some(waybill) = update.waybill_number {
            record.waybill_number = Some(waybill);
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn find_orders_awaiting_receipt(
        &self,
        partner_id: PartnerId,
    ) -> Result<Vec<OrderRecord>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<_> = orders
            .values()
            .filter(|o| o.partner_id == partner_id && o.state == OrderState::Receiving)
            .cloned()
            .collect();
        matching.sort_by_key(|o| o.created_at);
        Ok(matching)
    }
}
