//! File-backed content: front-matter markdown posts plus a projects manifest.
//!
//! Layout under the content root:
//!   posts/{locale}/{slug}.md   — TOML front matter between `+++` delimiters
//!                                (`.mdx` is accepted as an alias)
//!   projects.toml              — `[[projects]]` records
//!
//! The corpus is read per request. A missing directory is an empty corpus;
//! a file that fails to parse is skipped with a warning and a counter
//! increment so one bad file never takes down the listings.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use time::Date;
use time::macros::format_description;
use tracing::warn;

use crate::application::content::{
    ContentError, ContentSource, collect_categories, sort_posts_newest_first,
};
use crate::domain::entities::{PostRecord, ProjectLinks, ProjectRecord};
use crate::domain::locale::Locale;
use crate::domain::slug::derive_slug;
use crate::domain::types::{LocalizedText, ProjectStatus};

const FRONT_MATTER_DELIMITER: &str = "+++";
const POST_EXTENSIONS: [&str; 2] = ["md", "mdx"];
const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub struct FileContentSource {
    root: PathBuf,
}

impl FileContentSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn posts_dir(&self, locale: Locale) -> PathBuf {
        self.root.join("posts").join(locale.as_str())
    }

    fn projects_path(&self) -> PathBuf {
        self.root.join("projects.toml")
    }

    async fn read_posts(&self, locale: Locale) -> Result<Vec<PostRecord>, ContentError> {
        let dir = self.posts_dir(locale);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut posts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !has_post_extension(&path) {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match self.read_post_file(&path, slug, locale).await {
                Ok(post) => posts.push(post),
                Err(err) => {
                    counter!("vetrina_content_parse_failure_total").increment(1);
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unparseable content file"
                    );
                }
            }
        }

        sort_posts_newest_first(&mut posts);
        Ok(posts)
    }

    async fn read_post_file(
        &self,
        path: &Path,
        slug: &str,
        locale: Locale,
    ) -> Result<PostRecord, ContentError> {
        let raw = tokio::fs::read_to_string(path).await?;
        parse_post(&raw, slug, locale)
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn list_posts(&self, locale: Locale) -> Result<Vec<PostRecord>, ContentError> {
        self.read_posts(locale).await
    }

    async fn get_post(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<PostRecord>, ContentError> {
        if !is_safe_slug(slug) {
            return Ok(None);
        }

        for extension in POST_EXTENSIONS {
            let path = self.posts_dir(locale).join(format!("{slug}.{extension}"));
            match tokio::fs::read_to_string(&path).await {
                Ok(raw) => return Ok(Some(parse_post(&raw, slug, locale)?)),
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(None)
    }

    async fn list_slugs(&self, locale: Locale) -> Result<BTreeSet<String>, ContentError> {
        let dir = self.posts_dir(locale);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(err) => return Err(err.into()),
        };

        let mut slugs = BTreeSet::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !has_post_extension(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                slugs.insert(stem.to_string());
            }
        }
        Ok(slugs)
    }

    async fn list_categories(&self, locale: Locale) -> Result<Vec<String>, ContentError> {
        let posts = self.read_posts(locale).await?;
        Ok(collect_categories(&posts))
    }

    async fn list_projects(&self, _locale: Locale) -> Result<Vec<ProjectRecord>, ContentError> {
        let path = self.projects_path();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let manifest: ProjectsManifest = match toml::from_str(&raw) {
            Ok(manifest) => manifest,
            Err(err) => {
                counter!("vetrina_content_parse_failure_total").increment(1);
                warn!(
                    path = %path.display(),
                    error = %err,
                    "skipping unparseable projects manifest"
                );
                return Ok(Vec::new());
            }
        };

        let mut projects = Vec::new();
        for entry in manifest.projects {
            match entry.into_record() {
                Ok(record) => projects.push(record),
                Err(err) => {
                    counter!("vetrina_content_parse_failure_total").increment(1);
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping malformed project entry"
                    );
                }
            }
        }
        Ok(projects)
    }
}

#[derive(Debug, Deserialize)]
struct ProjectsManifest {
    #[serde(default)]
    projects: Vec<ManifestProject>,
}

#[derive(Debug, Deserialize)]
struct ManifestProject {
    #[serde(default)]
    slug: Option<String>,
    name: String,
    description: LocalizedText,
    #[serde(default)]
    tech_stack: Vec<String>,
    status: ProjectStatus,
    #[serde(default)]
    links: ProjectLinks,
    #[serde(default)]
    featured: bool,
}

impl ManifestProject {
    /// A missing slug is derived from the project name.
    fn into_record(self) -> Result<ProjectRecord, ContentError> {
        let slug = match self.slug {
            Some(slug) => slug,
            None => derive_slug(&self.name).map_err(|err| {
                ContentError::Malformed(format!("project `{}`: {err}", self.name))
            })?,
        };

        Ok(ProjectRecord {
            slug,
            name: self.name,
            description: self.description,
            tech_stack: self.tech_stack,
            status: self.status,
            links: self.links,
            featured: self.featured,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    excerpt: String,
    published_at: String,
    author: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    cover_image: Option<String>,
}

fn has_post_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if POST_EXTENSIONS.contains(&ext)
    )
}

/// Slugs map directly to file names, so anything that could traverse out
/// of the posts directory is treated as absent.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn parse_post(raw: &str, slug: &str, locale: Locale) -> Result<PostRecord, ContentError> {
    let (front, body) = split_front_matter(raw).ok_or_else(|| {
        ContentError::Malformed(format!("{slug}: missing `+++` front matter block"))
    })?;

    let front: FrontMatter = toml::from_str(front)
        .map_err(|err| ContentError::Malformed(format!("{slug}: {err}")))?;

    let published_at = Date::parse(front.published_at.trim(), DATE_FORMAT).map_err(|err| {
        ContentError::Malformed(format!(
            "{slug}: invalid published_at `{}`: {err}",
            front.published_at
        ))
    })?;

    Ok(PostRecord {
        slug: slug.to_string(),
        title: front.title,
        excerpt: front.excerpt,
        body_markdown: body.to_string(),
        published_at,
        author: front.author,
        category: front.category.filter(|c| !c.is_empty()),
        tags: front.tags,
        cover_image: front.cover_image,
        language: locale,
    })
}

fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix(FRONT_MATTER_DELIMITER)?;
    let rest = rest.strip_prefix('\n').or_else(|| {
        rest.strip_prefix("\r\n")
    })?;

    let end = rest.find("\n+++")?;
    let front = &rest[..end];
    let after = &rest[end + "\n+++".len()..];
    let body = after.trim_start_matches(['\r', '\n']);
    Some((front, body))
}
