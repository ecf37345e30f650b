use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::format_description::well_known::Iso8601;

use crate::application::blog::{BlogIndex, PostDetail, PostSummary};
use crate::application::error::{ErrorReport, HttpError};
use crate::application::pages::ProjectView;
use crate::application::seo::{AlternateLink, build_alternates, canonical_url, locale_path};
use crate::config::SiteSettings;
use crate::domain::entities::TocItem;
use crate::domain::locale::Locale;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found(chrome.locale);
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

pub fn render_error_response(chrome: LayoutChrome, status: StatusCode) -> Response {
    let content = ErrorPageView::generic(chrome.locale);
    let view = LayoutContext::new(chrome, content);
    render_template_response(ErrorTemplate { view }, status)
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: &'static str,
    pub href: String,
    pub is_active: bool,
}

/// Everything the base layout needs regardless of page content: brand,
/// localized navigation, the language toggle, and page metadata.
#[derive(Clone)]
pub struct LayoutChrome {
    pub site_title: String,
    pub locale: Locale,
    pub navigation: Vec<NavigationLinkView>,
    pub language_toggle: LanguageToggleView,
    pub footer_copy: String,
    pub meta: PageMetaView,
}

#[derive(Clone)]
pub struct LanguageToggleView {
    pub label: &'static str,
    pub href: String,
    pub enabled: bool,
}

impl LayoutChrome {
    /// Assemble chrome for a locale-scoped page. `subpath` is the path
    /// under the locale prefix, used for navigation highlighting and the
    /// language toggle target.
    pub fn build(site: &SiteSettings, locale: Locale, subpath: &str) -> Self {
        let nav_items: [(&'static str, &'static str); 4] = match locale {
            Locale::Ko => [("", "홈"), ("blog", "블로그"), ("projects", "프로젝트"), ("about", "소개")],
            Locale::En => [("", "Home"), ("blog", "Blog"), ("projects", "Projects"), ("about", "About")],
        };
        let section = subpath.split('/').next().unwrap_or("");

        let navigation = nav_items
            .into_iter()
            .map(|(target, label)| NavigationLinkView {
                label,
                href: locale_path(locale, target),
                is_active: target == section,
            })
            .collect();

        let companion = locale.companion();
        let language_toggle = LanguageToggleView {
            label: companion.native_name(),
            href: locale_path(companion, subpath),
            enabled: true,
        };

        let meta = PageMetaView::site_default(site, locale, subpath);

        Self {
            site_title: site.title.clone(),
            locale,
            navigation,
            language_toggle,
            footer_copy: format!("© {}", site.author),
            meta,
        }
    }

    pub fn with_meta(self, meta: PageMetaView) -> Self {
        Self { meta, ..self }
    }

    /// Point the language toggle somewhere other than the mirrored path,
    /// or disable it when no translation exists.
    pub fn with_language_toggle(self, href: String, enabled: bool) -> Self {
        Self {
            language_toggle: LanguageToggleView {
                href,
                enabled,
                ..self.language_toggle
            },
            ..self
        }
    }
}

/// Head metadata: title, description, canonical URL, OG card, hreflang
/// alternates, and optional JSON-LD payload.
#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_image: String,
    pub og_type: &'static str,
    pub alternates: Vec<AlternateLink>,
    pub json_ld: Option<String>,
}

impl PageMetaView {
    pub fn site_default(site: &SiteSettings, locale: Locale, subpath: &str) -> Self {
        let canonical = canonical_url(&site.public_site_url, &locale_path(locale, subpath));
        let og_image = canonical_url(&site.public_site_url, "og");

        Self {
            title: site.title.clone(),
            description: site.tagline.clone(),
            canonical,
            og_image,
            og_type: "website",
            alternates: build_alternates(&site.public_site_url, subpath, site.default_locale),
            json_ld: None,
        }
    }

    pub fn with_content(self, title: String, description: String) -> Self {
        Self {
            title,
            description,
            ..self
        }
    }

    pub fn with_og_image(self, og_image: String) -> Self {
        Self { og_image, ..self }
    }

    pub fn with_og_type(self, og_type: &'static str) -> Self {
        Self { og_type, ..self }
    }

    pub fn with_json_ld(self, json_ld: String) -> Self {
        Self {
            json_ld: Some(json_ld),
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: String,
    pub locale: Locale,
    pub navigation: Vec<NavigationLinkView>,
    pub language_toggle: LanguageToggleView,
    pub footer_copy: String,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            site_title: chrome.site_title,
            locale: chrome.locale,
            navigation: chrome.navigation,
            language_toggle: chrome.language_toggle,
            footer_copy: chrome.footer_copy,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub iso_date: String,
    pub published: String,
    pub category: Option<String>,
    pub reading: String,
    pub has_translation: bool,
}

impl PostCard {
    pub fn from_summary(summary: &PostSummary, locale: Locale) -> Self {
        Self {
            href: locale_path(locale, &format!("blog/{}", summary.record.slug)),
            title: summary.record.title.clone(),
            excerpt: summary.record.excerpt.clone(),
            iso_date: iso_date(summary.record.published_at),
            published: display_date(summary.record.published_at, locale),
            category: summary.record.category.clone(),
            reading: summary.reading.display.clone(),
            has_translation: summary.has_translation,
        }
    }
}

#[derive(Clone)]
pub struct CategoryLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

pub struct HomeContext {
    pub heading: String,
    pub tagline: String,
    pub posts: Vec<PostCard>,
    pub projects: Vec<ProjectCardView>,
    pub blog_href: String,
    pub projects_href: String,
}

pub struct BlogIndexContext {
    pub posts: Vec<PostCard>,
    pub categories: Vec<CategoryLinkView>,
    pub has_posts: bool,
}

impl BlogIndexContext {
    pub fn from_index(index: &BlogIndex, locale: Locale) -> Self {
        let mut categories = vec![CategoryLinkView {
            label: match locale {
                Locale::Ko => "전체".to_string(),
                Locale::En => "All".to_string(),
            },
            href: locale_path(locale, "blog"),
            is_active: index.active_category.is_none(),
        }];
        categories.extend(index.categories.iter().map(|category| CategoryLinkView {
            label: category.clone(),
            href: format!("{}?category={}", locale_path(locale, "blog"), category),
            is_active: index.active_category.as_deref() == Some(category.as_str()),
        }));

        let posts: Vec<PostCard> = index
            .posts
            .iter()
            .map(|summary| PostCard::from_summary(summary, locale))
            .collect();

        Self {
            has_posts: !posts.is_empty(),
            posts,
            categories,
        }
    }
}

#[derive(Clone)]
pub struct TocEntryView {
    pub anchor: String,
    pub title: String,
    pub level: u8,
}

impl TocEntryView {
    pub fn from_item(item: &TocItem) -> Self {
        Self {
            anchor: item.id.clone(),
            title: item.text.clone(),
            level: item.level,
        }
    }
}

pub struct PostDetailContext {
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub iso_date: String,
    pub published: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub reading: String,
    pub has_translation: bool,
    pub cover_image: Option<String>,
    pub toc: Vec<TocEntryView>,
    pub body_html: String,
}

impl PostDetailContext {
    pub fn from_detail(detail: &PostDetail, locale: Locale) -> Self {
        Self {
            title: detail.record.title.clone(),
            excerpt: detail.record.excerpt.clone(),
            author: detail.record.author.clone(),
            iso_date: iso_date(detail.record.published_at),
            published: display_date(detail.record.published_at, locale),
            category: detail.record.category.clone(),
            tags: detail.record.tags.iter().cloned().collect(),
            reading: detail.reading.display.clone(),
            has_translation: detail.has_translation,
            cover_image: detail.record.cover_image.clone(),
            toc: detail.toc.iter().map(TocEntryView::from_item).collect(),
            body_html: detail.body_html.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ProjectCardView {
    pub name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub status: &'static str,
    pub website: Option<String>,
    pub github: Option<String>,
    pub featured: bool,
}

impl ProjectCardView {
    pub fn from_project(project: &ProjectView) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            tech_stack: project.tech_stack.clone(),
            status: project.status,
            website: project.website.clone(),
            github: project.github.clone(),
            featured: project.featured,
        }
    }
}

pub struct ProjectsContext {
    pub projects: Vec<ProjectCardView>,
    pub has_projects: bool,
}

pub struct AboutContext {
    pub author: String,
    pub tagline: String,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub action_href: String,
    pub action_label: String,
}

impl ErrorPageView {
    pub fn not_found(locale: Locale) -> Self {
        let (title, message, label) = match locale {
            Locale::Ko => (
                "페이지를 찾을 수 없습니다",
                "요청하신 페이지가 존재하지 않습니다. 홈으로 돌아가 계속 둘러보세요.",
                "홈으로 돌아가기",
            ),
            Locale::En => (
                "Page Not Found",
                "The page you requested does not exist. Try returning to the homepage to continue exploring.",
                "Back to home",
            ),
        };
        Self {
            title: title.to_string(),
            message: message.to_string(),
            action_href: locale_path(locale, ""),
            action_label: label.to_string(),
        }
    }

    pub fn generic(locale: Locale) -> Self {
        let (title, message, label) = match locale {
            Locale::Ko => (
                "문제가 발생했습니다",
                "잠시 후 다시 시도해 주세요.",
                "홈으로 돌아가기",
            ),
            Locale::En => (
                "Something Went Wrong",
                "Please try again in a moment.",
                "Back to home",
            ),
        };
        Self {
            title: title.to_string(),
            message: message.to_string(),
            action_href: locale_path(locale, ""),
            action_label: label.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: LayoutContext<HomeContext>,
}

#[derive(Template)]
#[template(path = "blog_index.html")]
pub struct BlogIndexTemplate {
    pub view: LayoutContext<BlogIndexContext>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

#[derive(Template)]
#[template(path = "projects.html")]
pub struct ProjectsTemplate {
    pub view: LayoutContext<ProjectsContext>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<AboutContext>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

fn iso_date(date: time::Date) -> String {
    date.format(&Iso8601::DATE)
        .unwrap_or_else(|_| date.to_string())
}

fn display_date(date: time::Date, locale: Locale) -> String {
    match locale {
        Locale::Ko => format!("{}년 {}월 {}일", date.year(), date.month() as u8, date.day()),
        Locale::En => format!("{} {}, {}", date.month(), date.day(), date.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteSettings {
        SiteSettings {
            public_site_url: "https://example.com".to_string(),
            title: "WritingDeveloper".to_string(),
            tagline: "Dev Stories & Tech Tutorials".to_string(),
            author: "Jane Doe".to_string(),
            default_locale: Locale::Ko,
            github_url: None,
            linkedin_url: None,
        }
    }

    #[test]
    fn chrome_highlights_the_active_section() {
        let chrome = LayoutChrome::build(&site(), Locale::Ko, "blog/hello-world");

        let active: Vec<&NavigationLinkView> =
            chrome.navigation.iter().filter(|n| n.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].href, "/ko/blog");
    }

    #[test]
    fn language_toggle_mirrors_the_path_in_the_companion_locale() {
        let chrome = LayoutChrome::build(&site(), Locale::Ko, "projects");

        assert_eq!(chrome.language_toggle.href, "/en/projects");
        assert_eq!(chrome.language_toggle.label, "English");
    }

    #[test]
    fn meta_defaults_carry_canonical_and_alternates() {
        let chrome = LayoutChrome::build(&site(), Locale::En, "about");

        assert_eq!(chrome.meta.canonical, "https://example.com/en/about");
        assert!(chrome
            .meta
            .alternates
            .iter()
            .any(|link| link.hreflang == "x-default"));
    }

    #[test]
    fn korean_dates_render_in_korean_order() {
        let date = time::macros::date!(2026 - 02 - 10);

        assert_eq!(display_date(date, Locale::Ko), "2026년 2월 10일");
        assert_eq!(display_date(date, Locale::En), "February 10, 2026");
    }
}
