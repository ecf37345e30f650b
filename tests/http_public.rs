use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use tempfile::TempDir;
use tower::ServiceExt;
use vetrina::{
    application::{
        blog::BlogService, og::OgImageService, pages::PageService,
        render::MarkdownRenderService, sitemap::SitemapService, syndication::SyndicationService,
    },
    config::SiteSettings,
    domain::locale::Locale,
    infra::{content::files::FileContentSource, http::{HttpState, build_router}},
};

const KO_POST: &str = "+++\ntitle = \"블로그를 시작하며\"\nexcerpt = \"첫 글입니다.\"\npublished_at = \"2026-01-05\"\nauthor = \"Si Hyeong Lee\"\ncategory = \"dev\"\n+++\n\n## 시작하기\n\n본문입니다.\n";
const EN_POST: &str = "+++\ntitle = \"Starting the Blog\"\nexcerpt = \"The first post.\"\npublished_at = \"2026-01-05\"\nauthor = \"Si Hyeong Lee\"\ncategory = \"dev\"\n+++\n\n## Getting Started\n\nBody text.\n";
const KO_ONLY_POST: &str = "+++\ntitle = \"한국어 전용 글\"\nexcerpt = \"번역이 없는 글.\"\npublished_at = \"2026-02-01\"\nauthor = \"Si Hyeong Lee\"\ncategory = \"essay\"\n+++\n\n## 단상\n\n본문.\n";
const PROJECTS: &str = "[[projects]]\nslug = \"vetrina\"\nname = \"Vetrina\"\nstatus = \"active\"\ntech_stack = [\"Rust\"]\nfeatured = true\n\n[projects.description]\nko = \"쇼케이스\"\nen = \"A showcase\"\n";

fn seed_corpus() -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    let root = tmp.path();

    for (locale, slug, raw) in [
        ("ko", "hello-world", KO_POST),
        ("en", "hello-world", EN_POST),
        ("ko", "ko-only", KO_ONLY_POST),
    ] {
        let dir = root.join("posts").join(locale);
        std::fs::create_dir_all(&dir).expect("create posts dir");
        std::fs::write(dir.join(format!("{slug}.md")), raw).expect("write post");
    }

    std::fs::write(root.join("projects.toml"), PROJECTS).expect("write projects");
    tmp
}

fn build_app(corpus: &TempDir) -> Router {
    let site = SiteSettings {
        public_site_url: "https://example.com".to_string(),
        title: "WritingDeveloper".to_string(),
        tagline: "Dev Stories & Tech Tutorials".to_string(),
        author: "Si Hyeong Lee".to_string(),
        default_locale: Locale::Ko,
        github_url: None,
        linkedin_url: None,
    };

    let source = Arc::new(FileContentSource::new(corpus.path().to_path_buf()));
    let markdown = Arc::new(MarkdownRenderService::new());

    build_router(HttpState {
        blog: Arc::new(BlogService::new(source.clone(), markdown)),
        pages: Arc::new(PageService::new(source.clone(), site.default_locale)),
        sitemap: Arc::new(SitemapService::new(source.clone(), site.clone())),
        syndication: Arc::new(SyndicationService::new(source, site.clone())),
        og: Arc::new(OgImageService::new(site.clone())),
        site,
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn xml_documents_carry_their_content_types() {
    let corpus = seed_corpus();

    for (uri, expected) in [
        ("/sitemap.xml", "application/xml"),
        ("/rss.xml", "application/rss+xml"),
    ] {
        let response = build_app(&corpus)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some(expected),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn root_redirects_to_the_default_locale() {
    let corpus = seed_corpus();
    let app = build_app(&corpus);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/ko")
    );
}

#[tokio::test]
async fn home_shows_recent_posts_and_featured_projects() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/ko").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("블로그를 시작하며"));
    assert!(body.contains("Vetrina"));
    assert!(body.contains("lang=\"ko\""));
}

#[tokio::test]
async fn unknown_locale_renders_the_not_found_page() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/fr/blog").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("</html>"));
}

#[tokio::test]
async fn blog_index_lists_posts_newest_first() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/ko/blog").await;

    assert_eq!(status, StatusCode::OK);
    let newer = body.find("한국어 전용 글").expect("newer post present");
    let older = body.find("블로그를 시작하며").expect("older post present");
    assert!(newer < older);
}

#[tokio::test]
async fn unknown_category_filters_to_an_empty_listing_not_an_error() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/ko/blog?category=nonexistent").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("post-card"));
}

#[tokio::test]
async fn post_detail_renders_body_toc_and_translation_toggle() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/ko/blog/hello-world").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("min read"));
    assert!(body.contains("#시작하기"));
    assert!(body.contains("href=\"/en/blog/hello-world\""));
    assert!(body.contains("application/ld+json"));
}

#[tokio::test]
async fn untranslated_post_disables_the_language_toggle() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/ko/blog/ko-only").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("href=\"/en/blog/ko-only\""));
}

#[tokio::test]
async fn absent_slug_renders_not_found() {
    let corpus = seed_corpus();
    let (status, _) = get(build_app(&corpus), "/ko/blog/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_the_companion_file_is_reflected_without_restart() {
    let corpus = seed_corpus();
    let app = build_app(&corpus);

    let (_, body) = get(app.clone(), "/ko/blog/hello-world").await;
    assert!(body.contains("href=\"/en/blog/hello-world\""));

    std::fs::remove_file(corpus.path().join("posts/en/hello-world.md")).expect("remove");

    let (_, body) = get(app, "/ko/blog/hello-world").await;
    assert!(!body.contains("href=\"/en/blog/hello-world\""));
}

#[tokio::test]
async fn sitemap_covers_both_locales_with_priorities() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/sitemap.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<loc>https://example.com/ko</loc>"));
    assert!(body.contains("<loc>https://example.com/en</loc>"));
    assert!(body.contains("<loc>https://example.com/ko/blog/hello-world</loc>"));
    assert!(body.contains("<priority>1.0</priority>"));
    assert!(body.contains("<priority>0.8</priority>"));
    assert!(body.contains("hreflang=\"x-default\""));
}

#[tokio::test]
async fn rss_is_served_per_locale_and_for_the_default() {
    let corpus = seed_corpus();
    let app = build_app(&corpus);

    let (status, body) = get(app.clone(), "/rss.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<language>ko</language>"));

    let (status, body) = get(app, "/en/rss.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<language>en</language>"));
    assert!(body.contains("Starting the Blog"));
}

#[tokio::test]
async fn robots_txt_points_at_the_sitemap() {
    let corpus = seed_corpus();
    let (status, body) = get(build_app(&corpus), "/robots.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sitemap: https://example.com/sitemap.xml"));
}

#[tokio::test]
async fn og_endpoint_returns_an_svg_card_with_truncated_title() {
    let corpus = seed_corpus();
    let app = build_app(&corpus);
    let long_title = "a".repeat(80);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/og?title={long_title}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/svg+xml; charset=utf-8")
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let svg = String::from_utf8_lossy(&bytes);
    let expected = format!("{}...", "a".repeat(57));
    assert!(svg.contains(&expected));
    assert!(!svg.contains(&long_title));
}

#[tokio::test]
async fn projects_page_resolves_localized_descriptions() {
    let corpus = seed_corpus();
    let app = build_app(&corpus);

    let (_, ko_body) = get(app.clone(), "/ko/projects").await;
    assert!(ko_body.contains("쇼케이스"));

    let (_, en_body) = get(app, "/en/projects").await;
    assert!(en_body.contains("A showcase"));
}
