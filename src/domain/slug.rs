//! Deterministic slug derivation for records and heading anchors.
//!
//! Record slugs (projects without an explicit slug) go through ASCII
//! slugification via the `slug` crate. Heading anchors keep Hangul intact so
//! Korean section titles produce readable fragment ids.

use slug::slugify;
use thiserror::Error;

/// Errors that can occur while deriving a record slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a record slug from human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Derive a stable anchor id from heading text.
///
/// Lowercases, keeps ASCII alphanumerics and Hangul syllables, collapses
/// whitespace runs to single hyphens, and drops everything else. A heading
/// made entirely of punctuation yields an empty id; that is legal and must
/// not fail.
pub fn heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.trim().chars() {
        let keep = match ch {
            'a'..='z' | '0'..='9' => Some(ch),
            'A'..='Z' => Some(ch.to_ascii_lowercase()),
            '\u{AC00}'..='\u{D7A3}' => Some(ch),
            '-' => Some('-'),
            _ if ch.is_whitespace() => {
                pending_hyphen = !id.is_empty();
                None
            }
            _ => None,
        };

        if let Some(ch) = keep {
            if pending_hyphen && ch != '-' && !id.ends_with('-') {
                id.push('-');
            }
            pending_hyphen = false;
            // Collapse hyphen runs from mixed input like "foo - bar".
            if ch == '-' && id.ends_with('-') {
                continue;
            }
            id.push(ch);
        }
    }

    id.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_normalizes_ascii() {
        assert_eq!(derive_slug("Pattern Library").expect("slug"), "pattern-library");
    }

    #[test]
    fn derive_slug_rejects_empty_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn heading_id_lowercases_and_hyphenates() {
        assert_eq!(heading_id("Getting Started"), "getting-started");
        assert_eq!(heading_id("  Spaced   Out  "), "spaced-out");
    }

    #[test]
    fn heading_id_keeps_hangul() {
        assert_eq!(heading_id("시작하기"), "시작하기");
        assert_eq!(heading_id("프로젝트 Setup 가이드"), "프로젝트-setup-가이드");
    }

    #[test]
    fn heading_id_strips_punctuation() {
        assert_eq!(heading_id("What's New?"), "whats-new");
        assert_eq!(heading_id("foo - bar"), "foo-bar");
    }

    #[test]
    fn punctuation_only_heading_yields_empty_id() {
        assert_eq!(heading_id("?!?"), "");
        assert_eq!(heading_id("---"), "");
    }

    #[test]
    fn heading_id_is_idempotent() {
        let first = heading_id("프로젝트 Setup 가이드!");
        let second = heading_id("프로젝트 Setup 가이드!");
        assert_eq!(first, second);
        assert_eq!(heading_id(&first), first);
    }
}
