//! Walletshop Core
//!
//! Localized catalog resolution and order lifecycle core for a
//! wallet-authenticated storefront.
//!
//! ## Features
//! - Multi-language catalog entities (collections and products) with
//!   per-country price overrides
//! - Pure, deterministic translation/price resolution for storefront reads
//!   and CMS preview
//! - Order state machine with carrier/tracking metadata and idempotent
//!   status transitions
//! - Wallet-scoped, stably paginated order history
//!
//! Transport, persistence, wallet-signature verification and notification
//! delivery are external collaborators consumed through the traits in
//! [`store`].

pub mod checkout;
pub mod domain;
pub mod error;
pub mod resolver;
pub mod store;

pub use checkout::{CreateOrder, OrderItemRequest, OrderManager, StatusUpdate};
pub use domain::aggregates::catalog::{Collection, Product, Translation, TranslationSet};
pub use domain::aggregates::order::{
    ContactInfo, LineItem, Order, OrderStatus, ShippingPatch, StatusDelta,
};
pub use domain::events::OrderEvent;
pub use domain::value_objects::{CountryCode, LanguageCode, Price, Slug, WalletAddress};
pub use error::{CoreError, Result};
pub use resolver::{resolve_collection, resolve_price, resolve_product};
pub use store::{CatalogStore, OrderStore, Page, PageRequest};
