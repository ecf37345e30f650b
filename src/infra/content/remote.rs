//! Remote content: JSON queries against a headless content API.
//!
//! Every call is a live request; no retry and no local cache. A transient
//! failure surfaces as a fetch error and renders the generic error page.

use std::collections::BTreeSet;

use async_trait::async_trait;
use metrics::counter;
use reqwest::StatusCode;
use serde::Deserialize;
use time::Date;
use time::macros::format_description;
use url::Url;

use crate::application::content::{ContentError, ContentSource, sort_posts_newest_first};
use crate::domain::entities::{PostRecord, ProjectLinks, ProjectRecord};
use crate::domain::locale::Locale;
use crate::domain::types::{LocalizedText, ProjectStatus};

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub struct RemoteContentSource {
    client: reqwest::Client,
    base_url: Url,
}

impl RemoteContentSource {
    pub fn new(mut base_url: Url) -> Self {
        // Url::join treats a base without a trailing slash as a file and
        // replaces its last path segment, so `/api` + `posts` would lose
        // the `/api` prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str, locale: Locale) -> Result<Url, ContentError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| ContentError::Fetch(format!("invalid endpoint `{path}`: {err}")))?;
        url.query_pairs_mut().append_pair("locale", locale.as_str());
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<reqwest::Response, ContentError> {
        let response = self.client.get(url.clone()).send().await.map_err(|err| {
            counter!("vetrina_content_fetch_failure_total").increment(1);
            ContentError::Fetch(format!("GET {url}: {err}"))
        })?;
        Ok(response)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, ContentError> {
        let response = self.fetch(url.clone()).await?;
        let status = response.status();
        if !status.is_success() {
            counter!("vetrina_content_fetch_failure_total").increment(1);
            return Err(ContentError::Fetch(format!("GET {url}: status {status}")));
        }
        response
            .json()
            .await
            .map_err(|err| ContentError::Malformed(format!("GET {url}: {err}")))
    }
}

#[async_trait]
impl ContentSource for RemoteContentSource {
    async fn list_posts(&self, locale: Locale) -> Result<Vec<PostRecord>, ContentError> {
        let url = self.endpoint("posts", locale)?;
        let remote: Vec<RemotePost> = self.fetch_json(url).await?;

        let mut posts = remote
            .into_iter()
            .map(|post| post.into_record(locale))
            .collect::<Result<Vec<_>, _>>()?;
        sort_posts_newest_first(&mut posts);
        Ok(posts)
    }

    async fn get_post(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<PostRecord>, ContentError> {
        let url = self.endpoint(&format!("posts/{slug}"), locale)?;
        let response = self.fetch(url.clone()).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let remote: RemotePost = response
                    .json()
                    .await
                    .map_err(|err| ContentError::Malformed(format!("GET {url}: {err}")))?;
                Ok(Some(remote.into_record(locale)?))
            }
            status => {
                counter!("vetrina_content_fetch_failure_total").increment(1);
                Err(ContentError::Fetch(format!("GET {url}: status {status}")))
            }
        }
    }

    async fn list_slugs(&self, locale: Locale) -> Result<BTreeSet<String>, ContentError> {
        let posts = self.list_posts(locale).await?;
        Ok(posts.into_iter().map(|post| post.slug).collect())
    }

    async fn list_categories(&self, locale: Locale) -> Result<Vec<String>, ContentError> {
        let posts = self.list_posts(locale).await?;
        Ok(crate::application::content::collect_categories(&posts))
    }

    async fn list_projects(&self, locale: Locale) -> Result<Vec<ProjectRecord>, ContentError> {
        let url = self.endpoint("projects", locale)?;
        let remote: Vec<RemoteProject> = self.fetch_json(url).await?;
        Ok(remote.into_iter().map(RemoteProject::into_record).collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemotePost {
    slug: String,
    title: String,
    excerpt: String,
    body: String,
    published_at: String,
    author: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    cover_image: Option<String>,
}

impl RemotePost {
    fn into_record(self, locale: Locale) -> Result<PostRecord, ContentError> {
        let published_at = Date::parse(self.published_at.trim(), DATE_FORMAT).map_err(|err| {
            ContentError::Malformed(format!(
                "{}: invalid publishedAt `{}`: {err}",
                self.slug, self.published_at
            ))
        })?;

        Ok(PostRecord {
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            body_markdown: self.body,
            published_at,
            author: self.author,
            category: self.category.filter(|c| !c.is_empty()),
            tags: self.tags,
            cover_image: self.cover_image,
            language: locale,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteProject {
    slug: String,
    name: String,
    description: LocalizedText,
    #[serde(default)]
    tech_stack: Vec<String>,
    status: ProjectStatus,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    github: Option<String>,
    #[serde(default)]
    featured: bool,
}

impl RemoteProject {
    fn into_record(self) -> ProjectRecord {
        ProjectRecord {
            slug: self.slug,
            name: self.name,
            description: self.description,
            tech_stack: self.tech_stack,
            status: self.status,
            links: ProjectLinks {
                website: self.website,
                github: self.github,
            },
            featured: self.featured,
        }
    }
}
