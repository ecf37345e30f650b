//! The content source contract: the one seam between page rendering and
//! wherever posts actually live.
//!
//! Two adapters implement this trait (local front-matter files and a remote
//! content API); the backend is chosen once at startup configuration time.
//! An empty corpus is a valid state, not an error: callers receive empty
//! sequences, and only transport-level failures surface as errors.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{PostRecord, ProjectRecord};
use crate::domain::locale::Locale;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("content service request failed: {0}")]
    Fetch(String),
    #[error("content service returned malformed data: {0}")]
    Malformed(String),
}

/// Read-only access to the authored content corpus.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All posts for the locale, sorted by published date descending.
    async fn list_posts(&self, locale: Locale) -> Result<Vec<PostRecord>, ContentError>;

    /// A single post by slug, or `None` when the slug is absent. Absence is
    /// a normal outcome that callers translate into a not-found response.
    async fn get_post(&self, slug: &str, locale: Locale)
        -> Result<Option<PostRecord>, ContentError>;

    /// The set of slugs present under the locale.
    async fn list_slugs(&self, locale: Locale) -> Result<BTreeSet<String>, ContentError>;

    /// Distinct post categories for the locale, sorted.
    async fn list_categories(&self, locale: Locale) -> Result<Vec<String>, ContentError>;

    /// All project records. The locale parameter exists for backends that
    /// resolve locale-specific fields server-side; file-backed projects
    /// carry their localized fields inline and ignore it.
    async fn list_projects(&self, locale: Locale) -> Result<Vec<ProjectRecord>, ContentError>;
}

/// Translation availability: the same slug exists under the companion
/// locale. Symmetric by construction, evaluated lazily per request so a
/// deleted companion file is reflected on the next read.
pub async fn has_translation(
    source: &dyn ContentSource,
    slug: &str,
    locale: Locale,
) -> Result<bool, ContentError> {
    let companion_slugs = source.list_slugs(locale.companion()).await?;
    Ok(companion_slugs.contains(slug))
}

/// Canonical corpus ordering: published date descending, slug ascending as
/// the tie-break so listings are deterministic.
pub fn sort_posts_newest_first(posts: &mut [PostRecord]) {
    posts.sort_by(|a, b| {
        Reverse(a.published_at)
            .cmp(&Reverse(b.published_at))
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Distinct, sorted categories drawn from a post listing.
pub fn collect_categories(posts: &[PostRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = posts
        .iter()
        .filter_map(|post| post.category.as_deref())
        .filter(|category| !category.is_empty())
        .collect();
    set.into_iter().map(str::to_string).collect()
}
