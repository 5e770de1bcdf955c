//! Order Lifecycle Manager
//!
//! Owns the order state machine: validates creation payloads, captures the
//! line-item price snapshot through the resolver, and applies admin status
//! updates as single atomic units delegated to the `OrderStore`. All I/O
//! happens behind the injected store traits; the manager's own logic is
//! synchronous and CPU-bound.

use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::domain::aggregates::order::{
    ContactInfo, LineItem, Order, OrderStatus, ShippingPatch,
};
use crate::domain::events::OrderEvent;
use crate::domain::value_objects::{CountryCode, LanguageCode, WalletAddress};
use crate::error::{CoreError, Result};
use crate::resolver;
use crate::store::{CatalogStore, OrderStore, Page, PageRequest};

/// Checkout creation payload. Contact fields are mandatory and non-empty;
/// `order_id` is the client-chosen external identifier (the duplicate-
/// submission idempotency key) and is derived from the internal id when
/// absent.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreateOrder {
    pub order_id: Option<String>,
    pub wallet_address: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub shipping_address: String,
    pub language: String,
    pub country: String,
    pub items: Vec<OrderItemRequest>,
    pub transaction_hash: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// Result of one `update_status` call: the stored order plus the delta the
/// caller needs to decide whether to fire a notification. `events` is empty
/// for an idempotent retry.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusUpdate {
    pub order: Order,
    pub previous_status: OrderStatus,
    pub events: Vec<OrderEvent>,
}

pub struct OrderManager<C, O> {
    catalog: Arc<C>,
    orders: Arc<O>,
}

const CONTACT_FIELDS: [&str; 4] = ["customer_name", "email", "phone", "shipping_address"];

impl<C: CatalogStore, O: OrderStore> OrderManager<C, O> {
    pub fn new(catalog: Arc<C>, orders: Arc<O>) -> Self {
        Self { catalog, orders }
    }

    /// Creates an order in `pending`, capturing `price_at_purchase` for
    /// every line item via the resolver with the order's declared
    /// language/country. Performs no storage write on validation failure;
    /// duplicate submission of the same `order_id` fails with
    /// `DuplicateOrder` via the store's atomic create-if-absent.
    pub async fn create(&self, payload: CreateOrder) -> Result<Order> {
        if let Err(errors) = payload.validate() {
            let failed = errors.field_errors();
            for field in CONTACT_FIELDS {
                if failed.contains_key(field) {
                    return Err(CoreError::MissingContactField(field.to_string()));
                }
            }
            return Err(CoreError::MissingContactField("payload".to_string()));
        }
        if payload.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if payload.items.iter().any(|i| i.quantity == 0) {
            return Err(CoreError::InvalidQuantity);
        }

        let wallet = WalletAddress::new(payload.wallet_address)?;
        let language = LanguageCode::new(&payload.language)?;
        let country = CountryCode::canonicalize(&payload.country);

        let mut line_items = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            let product = self
                .catalog
                .product(item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound)?;
            line_items.push(LineItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price_at_purchase: resolver::resolve_price(&product, &payload.country),
            });
        }

        let id = self.orders.next_id().await?;
        let order_id = payload
            .order_id
            .unwrap_or_else(|| format!("ORD-{:08}", id));

        let mut order = Order::create(
            id,
            order_id,
            wallet,
            ContactInfo {
                customer_name: payload.customer_name,
                email: payload.email,
                phone: payload.phone,
                shipping_address: payload.shipping_address,
            },
            language,
            country,
            line_items,
            payload.transaction_hash,
        );
        let events = order.take_events();
        self.orders.insert(order.clone()).await?;

        for event in &events {
            tracing::debug!(?event, "order event");
        }
        tracing::info!(
            order_id = %order.order_id(),
            wallet = %order.wallet_address(),
            total = %order.total_amount().unwrap_or_default(),
            "order created"
        );
        Ok(order)
    }

    /// Applies one admin status update. Looks up by external `order_id`,
    /// falling back to the internal integer id. Idempotent: a verbatim
    /// retry changes nothing, writes nothing, and raises no events.
    pub async fn update_status(
        &self,
        identifier: &str,
        status: &str,
        carrier: Option<String>,
        tracking_code: Option<String>,
    ) -> Result<StatusUpdate> {
        let mut order = self.find(identifier).await?.ok_or(CoreError::OrderNotFound)?;
        let status = status.parse::<OrderStatus>()?;

        let delta = order.apply_update(
            status,
            ShippingPatch {
                carrier,
                tracking_code,
            },
        );
        let events = order.take_events();

        if delta.changed {
            self.orders.update(order.clone()).await?;
            tracing::info!(
                order_id = %order.order_id(),
                from = %delta.previous,
                to = %delta.current,
                "order status updated"
            );
        } else {
            tracing::debug!(
                order_id = %order.order_id(),
                status = %delta.current,
                "status update retry, nothing changed"
            );
        }

        Ok(StatusUpdate {
            order,
            previous_status: delta.previous,
            events,
        })
    }

    /// Wallet-scoped history, most recent first.
    pub async fn list_by_wallet(&self, wallet: &str, page: u32, size: u32) -> Result<Page<Order>> {
        let wallet = WalletAddress::new(wallet)?;
        self.orders
            .list_by_wallet(&wallet, PageRequest::new(page, size))
            .await
    }

    async fn find(&self, identifier: &str) -> Result<Option<Order>> {
        if let Some(order) = self.orders.find_by_order_id(identifier).await? {
            return Ok(Some(order));
        }
        match identifier.parse::<i64>() {
            Ok(id) => self.orders.find_by_id(id).await,
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::catalog::{Product, Translation, TranslationSet};
    use crate::domain::value_objects::{Price, Slug};
    use crate::store::memory::MemoryStore;
    use rust_decimal::Decimal;

    fn manager() -> OrderManager<MemoryStore, MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        OrderManager::new(store.clone(), store)
    }

    async fn seed_product(manager: &OrderManager<MemoryStore, MemoryStore>, id: i64, price: i64) {
        let set = TranslationSet::new(
            LanguageCode::new("en").unwrap(),
            Translation::new(format!("Product {id}"), "desc"),
        );
        let product = Product::new(
            id,
            Slug::new(format!("product-{id}")).unwrap(),
            set,
            Price::new(Decimal::new(price, 0)).unwrap(),
        )
        .unwrap();
        manager.catalog.put_product(product).await.unwrap();
    }

    fn payload(items: Vec<OrderItemRequest>) -> CreateOrder {
        CreateOrder {
            order_id: None,
            wallet_address: "0xabc".into(),
            customer_name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "+66 1234".into(),
            shipping_address: "1 Main St, Bangkok".into(),
            language: "en".into(),
            country: "TH".into(),
            items,
            transaction_hash: Some("0xhash".into()),
        }
    }

    fn two_items() -> Vec<OrderItemRequest> {
        vec![
            OrderItemRequest {
                product_id: 1,
                quantity: 2,
            },
            OrderItemRequest {
                product_id: 2,
                quantity: 1,
            },
        ]
    }

    #[tokio::test]
    async fn test_create_captures_price_snapshot() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        seed_product(&m, 2, 3).await;

        let order = m.create(payload(two_items())).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.order_id(), "ORD-00000001");
        assert_eq!(order.total_amount().unwrap().amount(), Decimal::new(13, 0));

        // A later price edit must not touch the placed order.
        let mut product = m.catalog.product(1).await.unwrap().unwrap();
        product
            .set_base_price(Price::new(Decimal::new(7, 0)).unwrap())
            .unwrap();
        m.catalog.put_product(product).await.unwrap();

        let stored = m.orders.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(
            stored.line_items()[0].price_at_purchase.amount(),
            Decimal::new(5, 0)
        );
        assert_eq!(stored.total_amount().unwrap().amount(), Decimal::new(13, 0));
    }

    #[tokio::test]
    async fn test_create_uses_country_override_including_zero() {
        let m = manager();
        seed_product(&m, 1, 10).await;
        let mut product = m.catalog.product(1).await.unwrap().unwrap();
        product.set_country_price(CountryCode::new("TH").unwrap(), Price::zero());
        m.catalog.put_product(product).await.unwrap();

        let order = m
            .create(payload(vec![OrderItemRequest {
                product_id: 1,
                quantity: 3,
            }]))
            .await
            .unwrap();
        assert!(order.total_amount().unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_empty_cart_writes_nothing() {
        let m = manager();
        assert_eq!(m.create(payload(vec![])).await, Err(CoreError::EmptyCart));
        let page = m.list_by_wallet("0xabc", 1, 20).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_blank_contact_field_rejected() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        let mut p = payload(two_items());
        p.phone = String::new();
        assert_eq!(
            m.create(p).await,
            Err(CoreError::MissingContactField("phone".into()))
        );
    }

    #[tokio::test]
    async fn test_duplicate_order_id_rejected() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        let items = || {
            vec![OrderItemRequest {
                product_id: 1,
                quantity: 1,
            }]
        };
        let mut first = payload(items());
        first.order_id = Some("CLIENT-42".into());
        m.create(first.clone()).await.unwrap();

        assert_eq!(m.create(first).await, Err(CoreError::DuplicateOrder));
        let page = m.list_by_wallet("0xabc", 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let m = manager();
        assert_eq!(
            m.create(payload(two_items())).await,
            Err(CoreError::ProductNotFound)
        );
    }

    #[tokio::test]
    async fn test_update_status_idempotent() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        seed_product(&m, 2, 3).await;
        let order = m.create(payload(two_items())).await.unwrap();

        let first = m
            .update_status(order.order_id(), "paid", Some("".into()), Some("".into()))
            .await
            .unwrap();
        assert_eq!(first.previous_status, OrderStatus::Pending);
        assert_eq!(first.order.status(), OrderStatus::Paid);
        assert_eq!(first.events.len(), 1);

        let second = m
            .update_status(order.order_id(), "paid", Some("".into()), Some("".into()))
            .await
            .unwrap();
        assert!(second.events.is_empty());
        assert_eq!(second.order.status(), OrderStatus::Paid);

        let stored = m.orders.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Paid);
        assert_eq!(stored.carrier(), None);
        assert_eq!(stored.updated_at(), first.order.updated_at());
    }

    #[tokio::test]
    async fn test_invalid_status_leaves_order_unchanged() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        seed_product(&m, 2, 3).await;
        let order = m.create(payload(two_items())).await.unwrap();

        assert_eq!(
            m.update_status(order.order_id(), "bogus", None, None).await,
            Err(CoreError::InvalidStatus("bogus".into()))
        );
        let stored = m.orders.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_by_internal_id_fallback() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        seed_product(&m, 2, 3).await;
        let order = m.create(payload(two_items())).await.unwrap();

        let updated = m
            .update_status(&order.id().to_string(), "confirmed", None, None)
            .await
            .unwrap();
        assert_eq!(updated.order.status(), OrderStatus::Confirmed);

        assert_eq!(
            m.update_status("no-such-order", "paid", None, None).await,
            Err(CoreError::OrderNotFound)
        );
    }

    #[tokio::test]
    async fn test_carrier_merge_semantics_through_manager() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        seed_product(&m, 2, 3).await;
        let order = m.create(payload(two_items())).await.unwrap();

        m.update_status(
            order.order_id(),
            "out_for_delivery",
            Some("DHL".into()),
            Some("TRACK-9".into()),
        )
        .await
        .unwrap();

        // None leaves carrier/tracking untouched.
        let kept = m
            .update_status(order.order_id(), "delivered", None, None)
            .await
            .unwrap();
        assert_eq!(kept.order.carrier(), Some("DHL"));
        assert_eq!(kept.order.tracking_code(), Some("TRACK-9"));

        // Empty string clears just the carrier.
        let cleared = m
            .update_status(order.order_id(), "delivered", Some("".into()), None)
            .await
            .unwrap();
        assert_eq!(cleared.order.carrier(), None);
        assert_eq!(cleared.order.tracking_code(), Some("TRACK-9"));
    }

    #[tokio::test]
    async fn test_list_by_wallet_pagination() {
        let m = manager();
        seed_product(&m, 1, 5).await;
        let item = || {
            vec![OrderItemRequest {
                product_id: 1,
                quantity: 1,
            }]
        };
        for _ in 0..3 {
            m.create(payload(item())).await.unwrap();
        }
        let mut other = payload(item());
        other.wallet_address = "0xother".into();
        m.create(other).await.unwrap();

        let page = m.list_by_wallet("0xabc", 1, 2).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        // Most recent first, stable under equal timestamps via id tie-break.
        assert!(page.items[0].id() > page.items[1].id());

        let last = m.list_by_wallet("0xabc", 2, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);
    }
}
