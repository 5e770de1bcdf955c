//! Translation/Price Resolver
//!
//! Pure resolution of a multi-language, multi-country catalog record into
//! the single view a storefront or CMS caller sees. No side effects, no
//! I/O, no mutation; identical inputs produce identical output, which
//! licenses caching by callers.
//!
//! Textual fallback chain:
//! 1. the requested language, if translated;
//! 2. the entity's default language;
//! 3. the lexicographically first available language;
//! 4. `EntityHasNoTranslation` — a data-integrity error, not a recoverable
//!    one. Write-side guards keep it from arising on well-formed data.
//!
//! Price resolution canonicalizes the requested country and looks up the
//! override map; a present entry wins even when it is an explicit zero. An
//! unknown or malformed country code is not an error, it simply falls back
//! to the base price.

use serde::Serialize;

use crate::domain::aggregates::catalog::{Collection, Product, Translation, TranslationSet};
use crate::domain::value_objects::{CountryCode, LanguageCode, Price};
use crate::error::{CoreError, Result};

/// UI-ready collection view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedCollection {
    pub id: i64,
    pub slug: String,
    /// The language the translation was actually taken from.
    pub language: LanguageCode,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

/// UI-ready product view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedProduct {
    pub id: i64,
    pub slug: String,
    pub language: LanguageCode,
    pub name: String,
    pub description: String,
    pub material: Option<String>,
    pub other_details: Option<String>,
    pub price: Price,
    pub is_active: bool,
}

/// Walks the fallback chain and reports which language won.
fn pick_translation<'a>(
    set: &'a TranslationSet,
    requested: &str,
) -> Result<(LanguageCode, &'a Translation)> {
    if let Ok(lang) = LanguageCode::new(requested) {
        if let Some(t) = set.get(&lang) {
            return Ok((lang, t));
        }
    }
    if let Some(t) = set.get(set.default_language()) {
        return Ok((set.default_language().clone(), t));
    }
    set.first()
        .map(|(lang, t)| (lang.clone(), t))
        .ok_or(CoreError::EntityHasNoTranslation)
}

/// Country override lookup; never fails.
pub fn resolve_price(product: &Product, requested_country: &str) -> Price {
    match CountryCode::canonicalize(requested_country) {
        Some(country) => product
            .country_price(&country)
            .unwrap_or_else(|| product.base_price()),
        None => product.base_price(),
    }
}

pub fn resolve_collection(collection: &Collection, language: &str) -> Result<ResolvedCollection> {
    let (language, translation) = pick_translation(collection.translations(), language)?;
    Ok(ResolvedCollection {
        id: collection.id(),
        slug: collection.slug().as_str().to_string(),
        language,
        name: translation.name.clone(),
        description: translation.description.clone(),
        is_active: collection.is_active(),
    })
}

pub fn resolve_product(product: &Product, language: &str, country: &str) -> Result<ResolvedProduct> {
    let (language, translation) = pick_translation(product.translations(), language)?;
    Ok(ResolvedProduct {
        id: product.id(),
        slug: product.slug().as_str().to_string(),
        language,
        name: translation.name.clone(),
        description: translation.description.clone(),
        material: translation.material.clone(),
        other_details: translation.other_details.clone(),
        price: resolve_price(product, country),
        is_active: product.is_active(),
    })
}
