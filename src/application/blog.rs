//! Blog listing and detail assembly.

use std::sync::Arc;

use crate::application::{
    content::ContentSource,
    error::AppError,
    render::MarkdownRenderService,
};
use crate::domain::{
    entities::{PostRecord, TocItem},
    locale::Locale,
    metadata::{ReadingTime, extract_headings, reading_time},
};

/// A post as shown in listings: the record plus derived display metadata.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub record: PostRecord,
    pub reading: ReadingTime,
    pub has_translation: bool,
}

#[derive(Debug, Clone)]
pub struct BlogIndex {
    pub posts: Vec<PostSummary>,
    pub categories: Vec<String>,
    pub active_category: Option<String>,
}

/// A fully-assembled post detail: rendered body, table of contents, and
/// derived metadata.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub record: PostRecord,
    pub body_html: String,
    pub toc: Vec<TocItem>,
    pub reading: ReadingTime,
    pub has_translation: bool,
}

pub struct BlogService {
    content: Arc<dyn ContentSource>,
    markdown: Arc<MarkdownRenderService>,
}

impl BlogService {
    pub fn new(content: Arc<dyn ContentSource>, markdown: Arc<MarkdownRenderService>) -> Self {
        Self { content, markdown }
    }

    /// The blog index for a locale, optionally filtered to one category.
    /// An unknown category filters to an empty listing rather than failing.
    pub async fn index(
        &self,
        locale: Locale,
        category: Option<&str>,
    ) -> Result<BlogIndex, AppError> {
        let (posts, categories, companion_slugs) = tokio::try_join!(
            self.content.list_posts(locale),
            self.content.list_categories(locale),
            self.content.list_slugs(locale.companion()),
        )?;

        let posts = posts
            .into_iter()
            .filter(|post| match category {
                Some(wanted) => post.category.as_deref() == Some(wanted),
                None => true,
            })
            .map(|record| PostSummary {
                reading: reading_time(&record.body_markdown),
                has_translation: companion_slugs.contains(&record.slug),
                record,
            })
            .collect();

        Ok(BlogIndex {
            posts,
            categories,
            active_category: category.map(str::to_string),
        })
    }

    /// The latest posts for a locale, capped at `limit`.
    pub async fn latest(&self, locale: Locale, limit: usize) -> Result<Vec<PostSummary>, AppError> {
        let (posts, companion_slugs) = tokio::try_join!(
            self.content.list_posts(locale),
            self.content.list_slugs(locale.companion()),
        )?;

        Ok(posts
            .into_iter()
            .take(limit)
            .map(|record| PostSummary {
                reading: reading_time(&record.body_markdown),
                has_translation: companion_slugs.contains(&record.slug),
                record,
            })
            .collect())
    }

    /// A single post, fully assembled for rendering. An absent slug is a
    /// not-found outcome, never a panic.
    pub async fn detail(&self, locale: Locale, slug: &str) -> Result<PostDetail, AppError> {
        let (record, companion_slugs) = tokio::try_join!(
            self.content.get_post(slug, locale),
            self.content.list_slugs(locale.companion()),
        )?;

        let record = record.ok_or(AppError::NotFound)?;
        let toc = extract_headings(&record.body_markdown);
        let reading = reading_time(&record.body_markdown);
        let body_html = self.markdown.render(&record.body_markdown);
        let has_translation = companion_slugs.contains(&record.slug);

        Ok(PostDetail {
            record,
            body_html,
            toc,
            reading,
            has_translation,
        })
    }
}
