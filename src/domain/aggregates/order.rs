//! Order Aggregate
//!
//! A checkout tracked through a closed set of fulfillment statuses. Orders
//! are created exactly once in `Pending`, mutated only through
//! `apply_update`, and never deleted by this core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::events::OrderEvent;
use crate::domain::value_objects::{CountryCode, LanguageCode, Price, WalletAddress};
use crate::error::CoreError;

/// Closed status set. Transitions are deliberately not forward-only: an
/// administrator may set any member at any time to correct a mis-set
/// status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Confirmed,
    OutForDelivery,
    Delivered,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "confirmed" => Ok(Self::Confirmed),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable snapshot of one purchased line, captured at creation via the
/// resolver. Never recomputed from the live catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: u32,
    pub price_at_purchase: Price,
}

impl LineItem {
    pub fn line_total(&self) -> Price {
        self.price_at_purchase.multiply(self.quantity)
    }
}

/// Mandatory contact/shipping details captured at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub shipping_address: String,
}

/// Carrier/tracking merge patch. Both fields are passed explicitly on every
/// status-update call: `None` leaves the stored value untouched, `Some("")`
/// explicitly clears it, any other value replaces it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShippingPatch {
    pub carrier: Option<String>,
    pub tracking_code: Option<String>,
}

/// Outcome of one `apply_update`, so the caller can decide whether a
/// notification is due. `changed` is false for an idempotent retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusDelta {
    pub previous: OrderStatus,
    pub current: OrderStatus,
    pub changed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: i64,
    order_id: String,
    wallet_address: WalletAddress,
    status: OrderStatus,
    contact: ContactInfo,
    language: LanguageCode,
    country: Option<CountryCode>,
    line_items: Vec<LineItem>,
    total_amount: Option<Price>,
    transaction_hash: Option<String>,
    carrier: Option<String>,
    tracking_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<OrderEvent>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create(
        id: i64,
        order_id: String,
        wallet_address: WalletAddress,
        contact: ContactInfo,
        language: LanguageCode,
        country: Option<CountryCode>,
        line_items: Vec<LineItem>,
        transaction_hash: Option<String>,
    ) -> Self {
        let total = line_items
            .iter()
            .fold(Price::zero(), |acc, item| acc.add(item.line_total()));
        let now = Utc::now();
        let mut order = Self {
            id,
            order_id: order_id.clone(),
            wallet_address: wallet_address.clone(),
            status: OrderStatus::Pending,
            contact,
            language,
            country,
            line_items,
            total_amount: Some(total),
            transaction_hash,
            carrier: None,
            tracking_code: None,
            created_at: now,
            updated_at: now,
            events: vec![],
        };
        order.raise_event(OrderEvent::Created {
            order_id,
            wallet_address: wallet_address.as_str().to_string(),
            total: total.amount(),
        });
        order
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn wallet_address(&self) -> &WalletAddress {
        &self.wallet_address
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    pub fn country(&self) -> Option<&CountryCode> {
        self.country.as_ref()
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn total_amount(&self) -> Option<Price> {
        self.total_amount
    }

    pub fn transaction_hash(&self) -> Option<&str> {
        self.transaction_hash.as_deref()
    }

    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    pub fn tracking_code(&self) -> Option<&str> {
        self.tracking_code.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The settled-payment fact arrives once and is immutable afterwards.
    pub fn record_transaction_hash(&mut self, hash: impl Into<String>) -> Result<(), CoreError> {
        if self.transaction_hash.is_some() {
            return Err(CoreError::ImmutableField("transaction_hash"));
        }
        self.transaction_hash = Some(hash.into());
        self.touch();
        Ok(())
    }

    /// Applies one status update as a single atomic unit: status plus the
    /// shipping merge patch. Events are raised only for actual changes, so
    /// a verbatim retry raises none and leaves `updated_at` alone.
    pub fn apply_update(&mut self, status: OrderStatus, patch: ShippingPatch) -> StatusDelta {
        let previous = self.status;
        let status_changed = status != self.status;
        let mut shipping_changed = false;

        if let Some(carrier) = patch.carrier {
            let next = if carrier.is_empty() { None } else { Some(carrier) };
            if next != self.carrier {
                self.carrier = next;
                shipping_changed = true;
            }
        }
        if let Some(tracking) = patch.tracking_code {
            let next = if tracking.is_empty() { None } else { Some(tracking) };
            if next != self.tracking_code {
                self.tracking_code = next;
                shipping_changed = true;
            }
        }

        if status_changed {
            self.status = status;
            self.raise_event(OrderEvent::StatusChanged {
                order_id: self.order_id.clone(),
                from: previous,
                to: status,
            });
        }
        if shipping_changed {
            self.raise_event(OrderEvent::ShippingUpdated {
                order_id: self.order_id.clone(),
                carrier: self.carrier.clone(),
                tracking_code: self.tracking_code.clone(),
            });
        }
        if status_changed || shipping_changed {
            self.touch();
        }

        StatusDelta {
            previous,
            current: status,
            changed: status_changed || shipping_changed,
        }
    }

    pub fn take_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, e: OrderEvent) {
        self.events.push(e);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order() -> Order {
        Order::create(
            1,
            "ORD-00000001".into(),
            WalletAddress::new("0xabc").unwrap(),
            ContactInfo {
                customer_name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: "+66 1234".into(),
                shipping_address: "1 Main St".into(),
            },
            LanguageCode::new("en").unwrap(),
            CountryCode::canonicalize("TH"),
            vec![
                LineItem {
                    product_id: 1,
                    quantity: 2,
                    price_at_purchase: Price::new(Decimal::new(5, 0)).unwrap(),
                },
                LineItem {
                    product_id: 2,
                    quantity: 1,
                    price_at_purchase: Price::new(Decimal::new(3, 0)).unwrap(),
                },
            ],
            None,
        )
    }

    #[test]
    fn test_total_fixed_at_creation() {
        let order = order();
        assert_eq!(
            order.total_amount().unwrap().amount(),
            Decimal::new(13, 0)
        );
    }

    #[test]
    fn test_status_parse_closed_set() {
        assert_eq!(
            "out_for_delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
        assert_eq!(
            "bogus".parse::<OrderStatus>(),
            Err(CoreError::InvalidStatus("bogus".into()))
        );
    }

    #[test]
    fn test_apply_update_is_idempotent() {
        let mut order = order();
        let patch = ShippingPatch {
            carrier: Some("DHL".into()),
            tracking_code: Some("TRACK-1".into()),
        };
        let first = order.apply_update(OrderStatus::Paid, patch.clone());
        assert!(first.changed);
        assert_eq!(order.take_events().len(), 3); // created + status + shipping

        let second = order.apply_update(OrderStatus::Paid, patch);
        assert!(!second.changed);
        assert_eq!(second.previous, OrderStatus::Paid);
        assert!(order.take_events().is_empty());
        assert_eq!(order.carrier(), Some("DHL"));
    }

    #[test]
    fn test_empty_string_clears_omitted_keeps() {
        let mut order = order();
        order.apply_update(
            OrderStatus::OutForDelivery,
            ShippingPatch {
                carrier: Some("DHL".into()),
                tracking_code: Some("TRACK-1".into()),
            },
        );

        // None leaves both untouched.
        order.apply_update(OrderStatus::Delivered, ShippingPatch::default());
        assert_eq!(order.carrier(), Some("DHL"));
        assert_eq!(order.tracking_code(), Some("TRACK-1"));

        // Empty string explicitly clears.
        order.apply_update(
            OrderStatus::Delivered,
            ShippingPatch {
                carrier: Some("".into()),
                tracking_code: None,
            },
        );
        assert_eq!(order.carrier(), None);
        assert_eq!(order.tracking_code(), Some("TRACK-1"));
    }

    #[test]
    fn test_backward_transition_allowed() {
        let mut order = order();
        order.apply_update(OrderStatus::Delivered, ShippingPatch::default());
        let delta = order.apply_update(OrderStatus::Paid, ShippingPatch::default());
        assert!(delta.changed);
        assert_eq!(order.status(), OrderStatus::Paid);
    }

    #[test]
    fn test_transaction_hash_immutable_once_set() {
        let mut order = order();
        order.record_transaction_hash("0xdeadbeef").unwrap();
        assert_eq!(
            order.record_transaction_hash("0xfeedface"),
            Err(CoreError::ImmutableField("transaction_hash"))
        );
        assert_eq!(order.transaction_hash(), Some("0xdeadbeef"));
    }
}
