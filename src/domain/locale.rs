//! The enumerated locale set and pairing logic.
//!
//! Every public route resolves under exactly one recognized locale; an
//! unrecognized path segment is a terminal not-found, never a fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recognized content locale. The site is bilingual: each locale has
/// exactly one companion, and translation availability is defined as the
/// same slug existing under the companion locale's corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ko,
    En,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized locale `{segment}`")]
pub struct UnknownLocale {
    pub segment: String,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ko, Locale::En];

    /// Map a URL path segment to a locale. `None` means the request must
    /// resolve to a not-found outcome.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "ko" => Some(Locale::Ko),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }

    /// The language's own name, used for the toggle label in the chrome.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::Ko => "한국어",
            Locale::En => "English",
        }
    }

    /// The paired locale used for translation lookups and the language
    /// toggle in the chrome.
    pub fn companion(self) -> Self {
        match self {
            Locale::Ko => Locale::En,
            Locale::En => Locale::Ko,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path_segment(s).ok_or_else(|| UnknownLocale {
            segment: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segment_round_trips() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_path_segment(locale.as_str()), Some(locale));
        }
    }

    #[test]
    fn unknown_segment_is_rejected() {
        assert_eq!(Locale::from_path_segment("fr"), None);
        assert_eq!(Locale::from_path_segment(""), None);
        assert_eq!(Locale::from_path_segment("KO"), None);
    }

    #[test]
    fn companion_is_an_involution() {
        for locale in Locale::ALL {
            assert_eq!(locale.companion().companion(), locale);
        }
    }
}
