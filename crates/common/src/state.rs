//! Order state machine.

use serde::{Deserialize, Serialize};

/// The state of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Receiving ──► ReceiptCompleted ──► DeliveryProgress ──► DeliveryCompleted ──► Confirmation
///     │                │                    │                    │
///     └────────────────┴────────────────────┴────────────────────┴──► Canceled
/// ```
///
/// The buyer may only cancel while the order is still `Receiving`; the
/// partner may cancel from any non-terminal state. The serialized tags are
/// the persisted representation, so renaming a variant is a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum OrderState {
    /// Order placed, waiting for the partner to acknowledge it.
    #[default]
    Receiving,

    /// Order was cancelled by the buyer or the partner (terminal state).
    Canceled,

    /// Partner has acknowledged the order and is preparing it.
    ReceiptCompleted,

    /// Shipment is underway; a waybill number has been recorded.
    DeliveryProgress,

    /// Carrier reports the shipment delivered.
    DeliveryCompleted,

    /// Buyer has confirmed receipt (terminal state).
    Confirmation,
}

impl OrderState {
    /// Returns true if the buyer can cancel the order in this state.
    pub fn can_user_cancel(&self) -> bool {
        matches!(self, OrderState::Receiving)
    }

    /// Returns true if the partner can cancel the order in this state.
    pub fn can_partner_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the partner can acknowledge receipt in this state.
    pub fn can_receive(&self) -> bool {
        matches!(self, OrderState::Receiving)
    }

    /// Returns true if the partner can ship the order in this state.
    pub fn can_ship(&self) -> bool {
        matches!(self, OrderState::ReceiptCompleted)
    }

    /// Returns true if the shipment can be marked delivered in this state.
    pub fn can_mark_delivered(&self) -> bool {
        matches!(self, OrderState::DeliveryProgress)
    }

    /// Returns true if the buyer can confirm the order in this state.
    pub fn can_confirm(&self) -> bool {
        matches!(self, OrderState::DeliveryCompleted)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Canceled | OrderState::Confirmation)
    }

    /// Returns the persisted state tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Receiving => "receiving",
            OrderState::Canceled => "canceled",
            OrderState::ReceiptCompleted => "receiptCompleted",
            OrderState::DeliveryProgress => "deliveryProgress",
            OrderState::DeliveryCompleted => "deliveryCompleted",
            OrderState::Confirmation => "confirmation",
        }
    }

    /// Parses a persisted state tag, returning None for anything outside
    /// the closed set.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "receiving" => Some(OrderState::Receiving),
            "canceled" => Some(OrderState::Canceled),
            "receiptCompleted" => Some(OrderState::ReceiptCompleted),
            "deliveryProgress" => Some(OrderState::DeliveryProgress),
            "deliveryCompleted" => Some(OrderState::DeliveryCompleted),
            "confirmation" => Some(OrderState::Confirmation),
            _ => None,
        }
    }

    /// All states, in lifecycle order.
    pub const ALL: [OrderState; 6] = [
        OrderState::Receiving,
        OrderState::ReceiptCompleted,
        OrderState::DeliveryProgress,
        OrderState::DeliveryCompleted,
        OrderState::Confirmation,
        OrderState::Canceled,
    ];
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_receiving() {
        assert_eq!(OrderState::default(), OrderState::Receiving);
    }

    #[test]
    fn test_only_receiving_allows_user_cancel() {
        assert!(OrderState::Receiving.can_user_cancel());
        assert!(!OrderState::ReceiptCompleted.can_user_cancel());
        assert!(!OrderState::DeliveryProgress.can_user_cancel());
        assert!(!OrderState::DeliveryCompleted.can_user_cancel());
        assert!(!OrderState::Confirmation.can_user_cancel());
        assert!(!OrderState::Canceled.can_user_cancel());
    }

    #[test]
    fn test_partner_cancel_from_any_non_terminal_state() {
        assert!(OrderState::Receiving.can_partner_cancel());
        assert!(OrderState::ReceiptCompleted.can_partner_cancel());
        assert!(OrderState::DeliveryProgress.can_partner_cancel());
        assert!(OrderState::DeliveryCompleted.can_partner_cancel());
        assert!(!OrderState::Confirmation.can_partner_cancel());
        assert!(!OrderState::Canceled.can_partner_cancel());
    }

    #[test]
    fn test_only_receiving_allows_receive() {
        assert!(OrderState::Receiving.can_receive());
        assert!(!OrderState::ReceiptCompleted.can_receive());
        assert!(!OrderState::Canceled.can_receive());
    }

    #[test]
    fn test_only_receipt_completed_allows_ship() {
        assert!(!OrderState::Receiving.can_ship());
        assert!(OrderState::ReceiptCompleted.can_ship());
        assert!(!OrderState::DeliveryProgress.can_ship());
    }

    #[test]
    fn test_only_delivery_progress_allows_mark_delivered() {
        assert!(!OrderState::ReceiptCompleted.can_mark_delivered());
        assert!(OrderState::DeliveryProgress.can_mark_delivered());
        assert!(!OrderState::DeliveryCompleted.can_mark_delivered());
    }

    #[test]
    fn test_only_delivery_completed_allows_confirm() {
        assert!(!OrderState::DeliveryProgress.can_confirm());
        assert!(OrderState::DeliveryCompleted.can_confirm());
        assert!(!OrderState::Confirmation.can_confirm());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderState::Canceled.is_terminal());
        assert!(OrderState::Confirmation.is_terminal());
        assert!(!OrderState::Receiving.is_terminal());
        assert!(!OrderState::ReceiptCompleted.is_terminal());
        assert!(!OrderState::DeliveryProgress.is_terminal());
        assert!(!OrderState::DeliveryCompleted.is_terminal());
    }

    #[test]
    fn test_tag_roundtrip_for_all_states() {
        for state in OrderState::ALL {
            assert_eq!(OrderState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_tags() {
        assert_eq!(OrderState::parse("shipped"), None);
        assert_eq!(OrderState::parse("Receiving"), None);
        assert_eq!(OrderState::parse(""), None);
    }

    #[test]
    fn test_serde_uses_persisted_tags() {
        let json = serde_json::to_string(&OrderState::ReceiptCompleted).unwrap();
        assert_eq!(json, "\"receiptCompleted\"");
        let back: OrderState = serde_json::from_str("\"deliveryProgress\"").unwrap();
        assert_eq!(back, OrderState::DeliveryProgress);
    }
}
