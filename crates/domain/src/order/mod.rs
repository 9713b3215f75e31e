//! Order lifecycle operations and related types.

mod commands;
mod service;

pub use commands::{
    ConfirmOrder, CreateOrder, MarkDelivered, PartnerCancelOrder, ReceiveOrder, ShipOrder,
    UserCancelOrder,
};
pub use service::OrderService;

use common::{ItemId, Money, OrderId, OrderState};
use thiserror::Error;

/// Business-rule rejections for order operations.
///
/// Each operation evaluates its checks in a fixed order (existence,
/// authorization, state guard, domain checks) and returns the first
/// failure. All variants are terminal; none warrant a retry.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order or item does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The acting buyer or partner does not own this order.
    #[error("actor {actor} may not {action} order {order_id}")]
    Forbidden {
        order_id: OrderId,
        actor: String,
        action: &'static str,
    },

    /// The order's current state does not permit this action.
    #[error("cannot {action} an order in {current} state")]
    InvalidState {
        action: &'static str,
        current: OrderState,
    },

    /// The offered price does not match the item's listed price.
    #[error("offered price {offered} does not match item price {listed}")]
    PriceMismatch { offered: Money, listed: Money },

    /// The item has no assigned partner and cannot be ordered.
    #[error("item {item_id} has no assigned partner")]
    MissingPartner { item_id: ItemId },
}

impl OrderError {
    pub(crate) fn order_not_found(id: OrderId) -> Self {
        OrderError::NotFound {
            entity: "order",
            id: id.to_string(),
        }
    }

    pub(crate) fn item_not_found(id: ItemId) -> Self {
        OrderError::NotFound {
            entity: "item",
            id: id.to_string(),
        }
    }

    pub(crate) fn forbidden(
        order_id: OrderId,
        actor: impl std::fmt::Display,
        action: &'static str,
    ) -> Self {
        OrderError::Forbidden {
            order_id,
            actor: actor.to_string(),
            action,
        }
    }
}
