//! Core error taxonomy.
//!
//! Three families, none retried internally:
//! - data-integrity errors (`EntityHasNoTranslation`) are fatal and must be
//!   prevented at write time;
//! - validation errors are client-input errors, reported verbatim;
//! - conflict errors (`DuplicateOrder`, `OrderNotFound`) are surfaced as-is.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // Data integrity
    #[error("Entity has no translation")]
    EntityHasNoTranslation,

    // Validation
    #[error("Missing contact field: {0}")]
    MissingContactField(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid quantity")]
    InvalidQuantity,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("Invalid country code: {0}")]
    InvalidCountry(String),

    #[error("Invalid wallet address")]
    InvalidWalletAddress,

    #[error("Invalid price")]
    InvalidPrice,

    #[error("The base or current default language translation cannot be removed")]
    BaseLanguageRemoval,

    #[error("No translation for language: {0}")]
    UnknownTranslation(String),

    #[error("Field is immutable once set: {0}")]
    ImmutableField(&'static str),

    // Conflict
    #[error("Order not found")]
    OrderNotFound,

    #[error("Duplicate order")]
    DuplicateOrder,

    #[error("Product not found")]
    ProductNotFound,

    // Collaborator
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
