//! Catalog Aggregates
//!
//! `Collection` and `Product` share the same localization shape: a base
//! identity plus a keyed map of per-language translations. Products add a
//! canonical price and a per-country override map. All write-side
//! invariants live here; read-side resolution lives in `crate::resolver`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::value_objects::{CountryCode, LanguageCode, Price, Slug};
use crate::error::CoreError;

/// Per-language textual fields. `material` / `other_details` are populated
/// for products only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub name: String,
    pub description: String,
    pub material: Option<String>,
    pub other_details: Option<String>,
}

impl Translation {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            material: None,
            other_details: None,
        }
    }
}

/// Keyed translation map with the language guards enforced server-side:
/// the base language (the one the set was created with, normally `"en"`)
/// can never be removed, and `default_language` always points at a language
/// that has a translation.
///
/// Backed by a `BTreeMap` so the key set iterates lexicographically; the
/// resolver's last-resort fallback depends on that ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSet {
    base_language: LanguageCode,
    default_language: LanguageCode,
    translations: BTreeMap<LanguageCode, Translation>,
}

impl TranslationSet {
    pub fn new(base_language: LanguageCode, base_translation: Translation) -> Self {
        let mut translations = BTreeMap::new();
        translations.insert(base_language.clone(), base_translation);
        Self {
            default_language: base_language.clone(),
            base_language,
            translations,
        }
    }

    pub fn base_language(&self) -> &LanguageCode {
        &self.base_language
    }

    pub fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    pub fn get(&self, language: &LanguageCode) -> Option<&Translation> {
        self.translations.get(language)
    }

    /// Languages that currently have a translation, lexicographic order.
    pub fn available_languages(&self) -> impl Iterator<Item = &LanguageCode> {
        self.translations.keys()
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Lexicographically first entry; the deterministic last-resort pick.
    pub fn first(&self) -> Option<(&LanguageCode, &Translation)> {
        self.translations.iter().next()
    }

    pub fn upsert(&mut self, language: LanguageCode, translation: Translation) {
        self.translations.insert(language, translation);
    }

    pub fn remove(&mut self, language: &LanguageCode) -> Result<(), CoreError> {
        if language == &self.base_language || language == &self.default_language {
            return Err(CoreError::BaseLanguageRemoval);
        }
        self.translations
            .remove(language)
            .map(|_| ())
            .ok_or_else(|| CoreError::UnknownTranslation(language.as_str().to_string()))
    }

    /// The default language must itself have a translation present.
    pub fn set_default_language(&mut self, language: LanguageCode) -> Result<(), CoreError> {
        if !self.translations.contains_key(&language) {
            return Err(CoreError::UnknownTranslation(language.as_str().to_string()));
        }
        self.default_language = language;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Collection {
    id: i64,
    slug: Slug,
    translations: TranslationSet,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(id: i64, slug: Slug, translations: TranslationSet) -> Self {
        let now = Utc::now();
        Self {
            id,
            slug,
            translations,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn translations(&self) -> &TranslationSet {
        &self.translations
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn rename_slug(&mut self, slug: Slug) {
        self.slug = slug;
        self.touch();
    }

    pub fn upsert_translation(&mut self, language: LanguageCode, translation: Translation) {
        self.translations.upsert(language, translation);
        self.touch();
    }

    pub fn remove_translation(&mut self, language: &LanguageCode) -> Result<(), CoreError> {
        self.translations.remove(language)?;
        self.touch();
        Ok(())
    }

    pub fn set_default_language(&mut self, language: LanguageCode) -> Result<(), CoreError> {
        self.translations.set_default_language(language)?;
        self.touch();
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    id: i64,
    slug: Slug,
    translations: TranslationSet,
    base_price: Price,
    country_prices: BTreeMap<CountryCode, Price>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// `base_price` must be strictly positive; overrides may be zero.
    pub fn new(
        id: i64,
        slug: Slug,
        translations: TranslationSet,
        base_price: Price,
    ) -> Result<Self, CoreError> {
        if base_price.is_zero() {
            return Err(CoreError::InvalidPrice);
        }
        let now = Utc::now();
        Ok(Self {
            id,
            slug,
            translations,
            base_price,
            country_prices: BTreeMap::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn translations(&self) -> &TranslationSet {
        &self.translations
    }

    pub fn base_price(&self) -> Price {
        self.base_price
    }

    pub fn country_price(&self, country: &CountryCode) -> Option<Price> {
        self.country_prices.get(country).copied()
    }

    pub fn country_prices(&self) -> &BTreeMap<CountryCode, Price> {
        &self.country_prices
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn rename_slug(&mut self, slug: Slug) {
        self.slug = slug;
        self.touch();
    }

    pub fn set_base_price(&mut self, price: Price) -> Result<(), CoreError> {
        if price.is_zero() {
            return Err(CoreError::InvalidPrice);
        }
        self.base_price = price;
        self.touch();
        Ok(())
    }

    /// An explicit zero override is legal and distinct from "absent".
    pub fn set_country_price(&mut self, country: CountryCode, price: Price) {
        self.country_prices.insert(country, price);
        self.touch();
    }

    pub fn clear_country_price(&mut self, country: &CountryCode) {
        self.country_prices.remove(country);
        self.touch();
    }

    pub fn upsert_translation(&mut self, language: LanguageCode, translation: Translation) {
        self.translations.upsert(language, translation);
        self.touch();
    }

    pub fn remove_translation(&mut self, language: &LanguageCode) -> Result<(), CoreError> {
        self.translations.remove(language)?;
        self.touch();
        Ok(())
    }

    pub fn set_default_language(&mut self, language: LanguageCode) -> Result<(), CoreError> {
        self.translations.set_default_language(language)?;
        self.touch();
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
