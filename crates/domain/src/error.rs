//! Domain error types.

use order_store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during lifecycle operations.
///
/// Business-rule rejections (`Order`) are terminal and non-retryable;
/// store errors are infrastructure faults propagated as-is.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A business rule rejected the operation.
    #[error("order error: {0}")]
    Order(OrderError),

    /// An error occurred in the order store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
