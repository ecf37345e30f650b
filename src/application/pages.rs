//! Context assembly for the non-blog pages: home, projects, about.

use std::sync::Arc;

use crate::application::{content::ContentSource, error::AppError};
use crate::domain::{
    entities::ProjectRecord,
    locale::Locale,
    types::LocalizedText,
};

const HOME_RECENT_POSTS: usize = 3;

/// A project with its description resolved for one locale.
#[derive(Debug, Clone)]
pub struct ProjectView {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub status: &'static str,
    pub website: Option<String>,
    pub github: Option<String>,
    pub featured: bool,
}

pub struct PageService {
    content: Arc<dyn ContentSource>,
    default_locale: Locale,
}

impl PageService {
    pub fn new(content: Arc<dyn ContentSource>, default_locale: Locale) -> Self {
        Self {
            content,
            default_locale,
        }
    }

    /// How many recent posts the home page shows.
    pub fn home_post_limit(&self) -> usize {
        HOME_RECENT_POSTS
    }

    /// Featured projects for the home page, in corpus order.
    pub async fn featured_projects(&self, locale: Locale) -> Result<Vec<ProjectView>, AppError> {
        let projects = self.projects(locale).await?;
        Ok(projects.into_iter().filter(|p| p.featured).collect())
    }

    /// All projects with locale-resolved descriptions.
    pub async fn projects(&self, locale: Locale) -> Result<Vec<ProjectView>, AppError> {
        let records = self.content.list_projects(locale).await?;
        Ok(records
            .into_iter()
            .map(|record| self.resolve_project(record, locale))
            .collect())
    }

    fn resolve_project(&self, record: ProjectRecord, locale: Locale) -> ProjectView {
        let description = resolve_text(&record.description, locale, self.default_locale);
        ProjectView {
            slug: record.slug,
            name: record.name,
            description,
            tech_stack: record.tech_stack,
            status: record.status.as_str(),
            website: record.links.website,
            github: record.links.github,
            featured: record.featured,
        }
    }
}

fn resolve_text(text: &LocalizedText, locale: Locale, default_locale: Locale) -> String {
    text.resolve(locale, default_locale).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::application::content::testing::InMemorySource;
    use crate::domain::entities::ProjectLinks;
    use crate::domain::types::ProjectStatus;

    fn project(slug: &str, featured: bool, description: LocalizedText) -> ProjectRecord {
        ProjectRecord {
            slug: slug.to_string(),
            name: slug.to_string(),
            description,
            tech_stack: vec!["rust".to_string()],
            status: ProjectStatus::Active,
            links: ProjectLinks {
                website: None,
                github: Some(format!("https://github.com/example/{slug}")),
            },
            featured,
        }
    }

    fn service(projects: Vec<ProjectRecord>) -> PageService {
        let source = InMemorySource {
            posts: BTreeMap::new(),
            projects,
        };
        PageService::new(Arc::new(source), Locale::Ko)
    }

    #[tokio::test]
    async fn featured_projects_exclude_the_rest() {
        let service = service(vec![
            project("alpha", true, LocalizedText::Plain("a".to_string())),
            project("beta", false, LocalizedText::Plain("b".to_string())),
        ]);

        let featured = service.featured_projects(Locale::Ko).await.expect("list");

        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].slug, "alpha");
    }

    #[tokio::test]
    async fn descriptions_fall_back_to_the_default_locale() {
        let mut per_locale = BTreeMap::new();
        per_locale.insert(Locale::Ko, "한국어 설명".to_string());
        let service = service(vec![project(
            "alpha",
            true,
            LocalizedText::PerLocale(per_locale),
        )]);

        let projects = service.projects(Locale::En).await.expect("list");

        assert_eq!(projects[0].description, "한국어 설명");
    }

    #[tokio::test]
    async fn missing_projects_yield_an_empty_listing() {
        let service = service(Vec::new());

        let projects = service.projects(Locale::Ko).await.expect("list");
        assert!(projects.is_empty());
    }
}
