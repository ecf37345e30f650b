use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, Query, State},
    http::{
        HeaderValue, StatusCode, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::error;

use crate::{
    application::{
        blog::{BlogService, PostDetail},
        error::{AppError, HttpError},
        og::OgImageService,
        pages::PageService,
        seo::{self, canonical_url, locale_path},
        sitemap::SitemapService,
        syndication::SyndicationService,
    },
    config::SiteSettings,
    domain::locale::Locale,
    presentation::views::{
        AboutContext, AboutTemplate, BlogIndexContext, BlogIndexTemplate, HomeContext,
        HomeTemplate, LayoutChrome, PostCard, PostDetailContext, PostTemplate, ProjectCardView,
        ProjectsContext, ProjectsTemplate, render_error_response, render_not_found_response,
        render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub blog: Arc<BlogService>,
    pub pages: Arc<PageService>,
    pub sitemap: Arc<SitemapService>,
    pub syndication: Arc<SyndicationService>,
    pub og: Arc<OgImageService>,
    pub site: SiteSettings,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/rss.xml", get(default_rss_feed))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots_txt))
        .route("/og", get(og_image))
        .route("/{locale}", get(home))
        .route("/{locale}/rss.xml", get(locale_rss_feed))
        .route("/{locale}/blog", get(blog_index))
        .route("/{locale}/blog/{slug}", get(post_detail))
        .route("/{locale}/projects", get(projects))
        .route("/{locale}/about", get(about))
        .fallback(fallback_not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlogQuery {
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OgQuery {
    title: Option<String>,
    description: Option<String>,
}

async fn root_redirect(State(state): State<HttpState>) -> Redirect {
    Redirect::temporary(&locale_path(state.site.default_locale, ""))
}

async fn home(State(state): State<HttpState>, Path(locale): Path<String>) -> Response {
    let Some(locale) = Locale::from_path_segment(&locale) else {
        return unknown_locale_response(&state);
    };

    let chrome = LayoutChrome::build(&state.site, locale, "");
    let limit = state.pages.home_post_limit();

    match tokio::try_join!(
        state.blog.latest(locale, limit),
        state.pages.featured_projects(locale),
    ) {
        Ok((posts, projects)) => {
            let content = HomeContext {
                heading: state.site.title.clone(),
                tagline: state.site.tagline.clone(),
                posts: posts
                    .iter()
                    .map(|summary| PostCard::from_summary(summary, locale))
                    .collect(),
                projects: projects.iter().map(ProjectCardView::from_project).collect(),
                blog_href: locale_path(locale, "blog"),
                projects_href: locale_path(locale, "projects"),
            };
            let view = crate::presentation::views::LayoutContext::new(chrome, content);
            render_template_response(HomeTemplate { view }, StatusCode::OK)
        }
        Err(err) => app_error_to_response(err, chrome),
    }
}

async fn blog_index(
    State(state): State<HttpState>,
    Path(locale): Path<String>,
    Query(query): Query<BlogQuery>,
) -> Response {
    let Some(locale) = Locale::from_path_segment(&locale) else {
        return unknown_locale_response(&state);
    };

    let chrome = LayoutChrome::build(&state.site, locale, "blog");

    match state.blog.index(locale, query.category.as_deref()).await {
        Ok(index) => {
            let content = BlogIndexContext::from_index(&index, locale);
            let view = crate::presentation::views::LayoutContext::new(chrome, content);
            render_template_response(BlogIndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => app_error_to_response(err, chrome),
    }
}

async fn post_detail(
    State(state): State<HttpState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let Some(locale) = Locale::from_path_segment(&locale) else {
        return unknown_locale_response(&state);
    };

    let subpath = format!("blog/{slug}");
    let chrome = LayoutChrome::build(&state.site, locale, &subpath);

    match state.blog.detail(locale, &slug).await {
        Ok(detail) => {
            let meta = post_meta(&state.site, locale, &subpath, &detail, &chrome);
            let toggle_href = locale_path(locale.companion(), &subpath);
            let chrome = chrome
                .with_meta(meta)
                .with_language_toggle(toggle_href, detail.has_translation);
            let content = PostDetailContext::from_detail(&detail, locale);
            let view = crate::presentation::views::LayoutContext::new(chrome, content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Err(AppError::NotFound) => render_not_found_response(chrome),
        Err(err) => app_error_to_response(err, chrome),
    }
}

async fn projects(State(state): State<HttpState>, Path(locale): Path<String>) -> Response {
    let Some(locale) = Locale::from_path_segment(&locale) else {
        return unknown_locale_response(&state);
    };

    let chrome = LayoutChrome::build(&state.site, locale, "projects");

    match state.pages.projects(locale).await {
        Ok(projects) => {
            let content = ProjectsContext {
                has_projects: !projects.is_empty(),
                projects: projects.iter().map(ProjectCardView::from_project).collect(),
            };
            let view = crate::presentation::views::LayoutContext::new(chrome, content);
            render_template_response(ProjectsTemplate { view }, StatusCode::OK)
        }
        Err(err) => app_error_to_response(err, chrome),
    }
}

async fn about(State(state): State<HttpState>, Path(locale): Path<String>) -> Response {
    let Some(locale) = Locale::from_path_segment(&locale) else {
        return unknown_locale_response(&state);
    };

    let chrome = LayoutChrome::build(&state.site, locale, "about");
    let meta = chrome
        .meta
        .clone()
        .with_json_ld(seo::person_json_ld(&state.site));
    let chrome = chrome.with_meta(meta);

    let content = AboutContext {
        author: state.site.author.clone(),
        tagline: state.site.tagline.clone(),
        github_url: state.site.github_url.clone(),
        linkedin_url: state.site.linkedin_url.clone(),
    };
    let view = crate::presentation::views::LayoutContext::new(chrome, content);
    render_template_response(AboutTemplate { view }, StatusCode::OK)
}

async fn default_rss_feed(State(state): State<HttpState>) -> Response {
    rss_response(&state, state.site.default_locale).await
}

async fn locale_rss_feed(State(state): State<HttpState>, Path(locale): Path<String>) -> Response {
    let Some(locale) = Locale::from_path_segment(&locale) else {
        return unknown_locale_response(&state);
    };
    rss_response(&state, locale).await
}

async fn rss_response(state: &HttpState, locale: Locale) -> Response {
    match state.syndication.rss_feed(locale).await {
        Ok(body) => xml_response(body, "application/rss+xml"),
        Err(err) => HttpError::new(
            "infra::http::public::rss",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate RSS feed",
            err.to_string(),
        )
        .into_response(),
    }
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    match state.sitemap.sitemap_xml().await {
        Ok(body) => xml_response(body, "application/xml"),
        Err(err) => HttpError::new(
            "infra::http::public::sitemap",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate sitemap",
            err.to_string(),
        )
        .into_response(),
    }
}

fn xml_response(body: String, content_type: &'static str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    let body = state.sitemap.robots_txt();
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn og_image(State(state): State<HttpState>, Query(query): Query<OgQuery>) -> Response {
    let svg = state
        .og
        .render(query.title.as_deref(), query.description.as_deref());

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "image/svg+xml; charset=utf-8")
        .header(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        )
        .body(Body::from(svg))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Anything outside the routing surface: render the 404 page in the locale
/// named by the first path segment when it is recognized, the default
/// locale otherwise.
async fn fallback_not_found(State(state): State<HttpState>, uri: Uri) -> Response {
    let first_segment = uri.path().trim_start_matches('/').split('/').next();
    let locale = first_segment
        .and_then(Locale::from_path_segment)
        .unwrap_or(state.site.default_locale);

    let chrome = LayoutChrome::build(&state.site, locale, "");
    render_not_found_response(chrome)
}

fn unknown_locale_response(state: &HttpState) -> Response {
    let chrome = LayoutChrome::build(&state.site, state.site.default_locale, "");
    render_not_found_response(chrome)
}

fn app_error_to_response(err: AppError, chrome: LayoutChrome) -> Response {
    if matches!(err, AppError::NotFound) {
        return render_not_found_response(chrome);
    }

    let status = err.status_code();
    error!(
        target = "vetrina::http::public",
        error = %err,
        status = status.as_u16(),
        "request handling failed"
    );

    let mut response = render_error_response(chrome, status);
    crate::application::error::ErrorReport::from_error(
        "infra::http::public::app_error_to_response",
        status,
        &err,
    )
    .attach(&mut response);
    response
}

fn post_meta(
    site: &SiteSettings,
    locale: Locale,
    subpath: &str,
    detail: &PostDetail,
    chrome: &LayoutChrome,
) -> crate::presentation::views::PageMetaView {
    let canonical = canonical_url(&site.public_site_url, &locale_path(locale, subpath));
    let og_image = og_image_url(site, &detail.record.title, &detail.record.excerpt);
    let json_ld = seo::article_json_ld(
        site,
        &detail.record.title,
        &detail.record.excerpt,
        &canonical,
        detail.record.published_at,
        detail.record.cover_image.as_deref(),
    );

    chrome
        .meta
        .clone()
        .with_content(detail.record.title.clone(), detail.record.excerpt.clone())
        .with_og_image(og_image)
        .with_og_type("article")
        .with_json_ld(json_ld)
}

fn og_image_url(site: &SiteSettings, title: &str, description: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("title", title)
        .append_pair("description", description)
        .finish();
    format!("{}?{query}", canonical_url(&site.public_site_url, "og"))
}
