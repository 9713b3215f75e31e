//! Order lifecycle manager.
//!
//! This crate provides the decision core of the order service:
//! - Command structs carrying explicit actor identity for every operation
//! - The five-kind business error taxonomy
//! - `OrderService`, which validates each command against the transition
//!   table and performs the single conditional persistence write
//!
//! Authorization is pure id comparison: buyers act on orders they placed,
//! partners on orders assigned to them. Every check runs in a fixed order
//! (existence, authorization, state guard, domain checks) and the first
//! failure wins.

pub mod error;
pub mod order;

pub use error::DomainError;
pub use order::{
    ConfirmOrder, CreateOrder, MarkDelivered, OrderError, OrderService, PartnerCancelOrder,
    ReceiveOrder, ShipOrder, UserCancelOrder,
};
