//! Locales and localized names
//!
//! The shop serves three interface languages. Uzbek is the base language:
//! every product carries an uz name, the ru/en variants are optional and
//! fall back to uz when blank.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Supported interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Uz,
    Ru,
    En,
}

impl Locale {
    /// Parse a language tag from the `hl` header. Unknown or empty values
    /// fall back to the base language.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ru" => Locale::Ru,
            "en" => Locale::En,
            _ => Locale::Uz,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Uz => "uz",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Uz
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name in the three interface languages. The uz variant is required;
/// blank ru/en variants resolve to uz.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct LocalizedName {
    #[sqlx(rename = "name_uz")]
    pub uz: String,
    #[sqlx(rename = "name_ru")]
    pub ru: String,
    #[sqlx(rename = "name_en")]
    pub en: String,
}

impl LocalizedName {
    pub fn new(
        uz: impl Into<String>,
        ru: impl Into<String>,
        en: impl Into<String>,
    ) -> Self {
        Self {
            uz: uz.into(),
            ru: ru.into(),
            en: en.into(),
        }
    }

    /// Resolve the name for a locale, falling back to uz when the requested
    /// variant is blank.
    pub fn localized(&self, locale: Locale) -> &str {
        let candidate = match locale {
            Locale::Uz => &self.uz,
            Locale::Ru => &self.ru,
            Locale::En => &self.en,
        };
        if candidate.trim().is_empty() {
            &self.uz
        } else {
            candidate
        }
    }
}
