use common::{OrderId, OrderState};
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional transition found the order in a different state than
    /// expected. This is the concurrent double-transition case; the caller
    /// validated against a state that is no longer current.
    #[error("state conflict for order {order_id}: expected {expected}, found {actual}")]
    StateConflict {
        order_id: OrderId,
        expected: OrderState,
        actual: OrderState,
    },

    /// The order was not found in the store.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// An order with this ID already exists.
    #[error("order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// A persisted state tag falls outside the closed state set.
    #[error("unknown order state tag: {0:?}")]
    UnknownState(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
