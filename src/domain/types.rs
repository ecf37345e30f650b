//! Shared domain enumerations and small value types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Building,
    Launched,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Building => "building",
            ProjectStatus::Launched => "launched",
            ProjectStatus::Archived => "archived",
        }
    }
}

/// Text that is either the same for every locale or keyed per locale.
///
/// Resolution policy: the requested locale wins, then the site's configured
/// default locale, then any entry in key order. Ad hoc default chains at
/// call sites are deliberately not supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    PerLocale(BTreeMap<Locale, String>),
}

impl LocalizedText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn resolve(&self, locale: Locale, default_locale: Locale) -> &str {
        match self {
            LocalizedText::Plain(text) => text,
            LocalizedText::PerLocale(entries) => entries
                .get(&locale)
                .or_else(|| entries.get(&default_locale))
                .or_else(|| entries.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}
