//! Domain aggregates

pub mod catalog;
pub mod order;

pub use catalog::{Collection, Product, Translation, TranslationSet};
pub use order::{ContactInfo, LineItem, Order, OrderStatus, ShippingPatch, StatusDelta};
