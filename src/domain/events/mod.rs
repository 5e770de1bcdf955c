//! Domain events
//!
//! Raised by the `Order` aggregate once per actual change and drained via
//! `take_events`. The caller layer turns them into notifications; the core
//! never dispatches anything itself.

use rust_decimal::Decimal;

use crate::domain::aggregates::order::OrderStatus;

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Created {
        order_id: String,
        wallet_address: String,
        total: Decimal,
    },
    StatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    ShippingUpdated {
        order_id: String,
        carrier: Option<String>,
        tracking_code: Option<String>,
    },
}
