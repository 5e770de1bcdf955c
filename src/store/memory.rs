//! In-memory reference store.
//!
//! Mirrors the semantics a SQL backing store provides: create-if-absent on
//! the `order_id` uniqueness constraint, full-row updates, and a sequence
//! for internal ids. Used by the test suite and by embedders that do not
//! need durable persistence.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::aggregates::catalog::{Collection, Product};
use crate::domain::aggregates::order::Order;
use crate::domain::value_objects::WalletAddress;
use crate::error::{CoreError, Result};
use crate::store::{CatalogStore, OrderStore, Page, PageRequest};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<i64, Collection>>,
    products: RwLock<BTreeMap<i64, Product>>,
    orders: RwLock<BTreeMap<i64, Order>>,
    order_seq: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn collection(&self, id: i64) -> Result<Option<Collection>> {
        Ok(self.collections.read().await.get(&id).cloned())
    }

    async fn product(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn put_collection(&self, collection: Collection) -> Result<()> {
        self.collections
            .write()
            .await
            .insert(collection.id(), collection);
        Ok(())
    }

    async fn put_product(&self, product: Product) -> Result<()> {
        self.products.write().await.insert(product.id(), product);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn next_id(&self) -> Result<i64> {
        Ok(self.order_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        // Check-and-insert under one write lock: the idempotency boundary
        // for checkout submission.
        let duplicate = orders
            .values()
            .any(|o| o.order_id() == order.order_id() || o.id() == order.id());
        if duplicate {
            return Err(CoreError::DuplicateOrder);
        }
        orders.insert(order.id(), order);
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|o| o.order_id() == order_id)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn update(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id()) {
            return Err(CoreError::OrderNotFound);
        }
        orders.insert(order.id(), order);
        Ok(())
    }

    async fn list_by_wallet(
        &self,
        wallet: &WalletAddress,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        let orders = self.orders.read().await;
        let mut matched: Vec<&Order> = orders
            .values()
            .filter(|o| o.wallet_address() == wallet)
            .collect();
        matched.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id().cmp(&a.id()))
        });
        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset())
            .take(page.size() as usize)
            .cloned()
            .collect();
        Ok(Page {
            items,
            total,
            page: page.page(),
            page_size: page.size(),
        })
    }
}
