//! Storage collaborator ports.
//!
//! The core never talks to a database directly; it consumes these traits.
//! `OrderStore::insert` must be an atomic create-if-absent keyed by the
//! external `order_id` uniqueness constraint, and `update` an atomic
//! full-row replacement — that is where per-order serialization comes from,
//! not from an application-level lock manager.

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::aggregates::catalog::{Collection, Product};
use crate::domain::aggregates::order::Order;
use crate::domain::value_objects::WalletAddress;
use crate::error::Result;

/// One canonical page shape for every list read.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// 1-based page request with clamped size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub const MAX_SIZE: u32 = 100;
    pub const DEFAULT_SIZE: u32 = 20;

    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn collection(&self, id: i64) -> Result<Option<Collection>>;
    async fn product(&self, id: i64) -> Result<Option<Product>>;
    async fn put_collection(&self, collection: Collection) -> Result<()>;
    async fn put_product(&self, product: Product) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Next opaque internal id.
    async fn next_id(&self) -> Result<i64>;

    /// Atomic create-if-absent; `DuplicateOrder` when the external
    /// `order_id` already exists.
    async fn insert(&self, order: Order) -> Result<()>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>>;

    /// Atomic full-row replacement; `OrderNotFound` when absent.
    async fn update(&self, order: Order) -> Result<()>;

    /// Exact wallet match, `created_at` descending (ties broken by `id`
    /// descending) for stable pagination under concurrent inserts.
    async fn list_by_wallet(&self, wallet: &WalletAddress, page: PageRequest)
        -> Result<Page<Order>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let page = PageRequest::new(0, 500);
        assert_eq!(page.page(), 1);
        assert_eq!(page.size(), PageRequest::MAX_SIZE);
        assert_eq!(page.offset(), 0);

        let page = PageRequest::new(3, 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_offset_does_not_overflow_on_large_page() {
        let page = PageRequest::new(u32::MAX, 100);
        assert_eq!(page.offset(), (u32::MAX as usize - 1) * 100);
    }
}
