//! Domain entities mirrored from the read-only content corpus.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::locale::Locale;
use crate::domain::types::{LocalizedText, ProjectStatus};

/// A blog post as authored. The slug is unique within one locale; the same
/// slug under the companion locale is that post's translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body_markdown: String,
    pub published_at: Date,
    pub author: String,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    pub cover_image: Option<String>,
    pub language: Locale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub slug: String,
    pub name: String,
    pub description: LocalizedText,
    pub tech_stack: Vec<String>,
    pub status: ProjectStatus,
    pub links: ProjectLinks,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    pub website: Option<String>,
    pub github: Option<String>,
}

/// One table-of-contents entry, derived transiently from a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}
