//! Sitemap and robots.txt generation.
//!
//! The sitemap enumerates every locale-prefixed page with its crawl hints
//! and cross-locale `xhtml:link` alternates, so search engines discover both
//! language editions from one document.

use std::sync::Arc;

use time::{Date, format_description::well_known::Iso8601};

use crate::application::{
    content::ContentSource,
    error::AppError,
    seo::{build_alternates, canonical_url, locale_path},
};
use crate::config::SiteSettings;
use crate::domain::locale::Locale;

/// Crawl hints for each page class. Posts change less often than indexes,
/// the about page least of all.
const STATIC_PAGES: [(&str, &str, &str); 4] = [
    ("", "daily", "1.0"),
    ("blog", "daily", "0.9"),
    ("projects", "monthly", "0.7"),
    ("about", "monthly", "0.5"),
];
const POST_CHANGEFREQ: &str = "weekly";
const POST_PRIORITY: &str = "0.8";

#[derive(Clone)]
pub struct SitemapService {
    content: Arc<dyn ContentSource>,
    site: SiteSettings,
}

impl SitemapService {
    pub fn new(content: Arc<dyn ContentSource>, site: SiteSettings) -> Self {
        Self { content, site }
    }

    /// Generate sitemap.xml content.
    pub async fn sitemap_xml(&self) -> Result<String, AppError> {
        let (ko_posts, en_posts) = tokio::try_join!(
            self.content.list_posts(Locale::Ko),
            self.content.list_posts(Locale::En),
        )?;

        let newest = ko_posts
            .iter()
            .chain(en_posts.iter())
            .map(|post| post.published_at)
            .max();

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
        );

        for (subpath, changefreq, priority) in STATIC_PAGES {
            for locale in Locale::ALL {
                xml.push_str(&self.url_entry(
                    &locale_path(locale, subpath),
                    Some(subpath),
                    newest,
                    changefreq,
                    priority,
                ));
            }
        }

        for post in ko_posts.iter().chain(en_posts.iter()) {
            let subpath = format!("blog/{}", post.slug);
            xml.push_str(&self.url_entry(
                &locale_path(post.language, &subpath),
                Some(subpath.as_str()),
                Some(post.published_at),
                POST_CHANGEFREQ,
                POST_PRIORITY,
            ));
        }

        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    /// Generate robots.txt content.
    pub fn robots_txt(&self) -> String {
        let sitemap_url = canonical_url(&self.site.public_site_url, "sitemap.xml");
        format!("User-agent: *\nAllow: /\nSitemap: {sitemap_url}\n")
    }

    fn url_entry(
        &self,
        path: &str,
        alternate_subpath: Option<&str>,
        lastmod: Option<Date>,
        changefreq: &str,
        priority: &str,
    ) -> String {
        let base = &self.site.public_site_url;
        let loc = canonical_url(base, path);

        let mut entry = format!("  <url>\n    <loc>{loc}</loc>\n");
        if let Some(date) = lastmod {
            let formatted = date
                .format(&Iso8601::DATE)
                .unwrap_or_else(|_| date.to_string());
            entry.push_str(&format!("    <lastmod>{formatted}</lastmod>\n"));
        }
        entry.push_str(&format!(
            "    <changefreq>{changefreq}</changefreq>\n    <priority>{priority}</priority>\n"
        ));

        if let Some(subpath) = alternate_subpath {
            for link in build_alternates(base, subpath, self.site.default_locale) {
                entry.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                    link.hreflang, link.href
                ));
            }
        }

        entry.push_str("  </url>\n");
        entry
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use time::macros::date;

    use super::*;
    use crate::application::content::testing::InMemorySource;
    use crate::domain::entities::PostRecord;

    fn post(slug: &str, locale: Locale, published: Date) -> PostRecord {
        PostRecord {
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: String::new(),
            body_markdown: String::new(),
            published_at: published,
            author: "tester".to_string(),
            category: None,
            tags: BTreeSet::new(),
            cover_image: None,
            language: locale,
        }
    }

    fn site() -> SiteSettings {
        SiteSettings {
            public_site_url: "https://example.com".to_string(),
            title: "Example".to_string(),
            tagline: "Tagline".to_string(),
            author: "Jane Doe".to_string(),
            default_locale: Locale::Ko,
            github_url: None,
            linkedin_url: None,
        }
    }

    fn service(posts: BTreeMap<Locale, Vec<PostRecord>>) -> SitemapService {
        SitemapService::new(
            Arc::new(InMemorySource {
                posts,
                projects: Vec::new(),
            }),
            site(),
        )
    }

    #[tokio::test]
    async fn page_classes_carry_the_expected_priorities() {
        let xml = service(BTreeMap::new()).sitemap_xml().await.expect("xml");

        assert!(xml.contains("<loc>https://example.com/ko</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(xml.contains("<priority>0.5</priority>"));
    }

    #[tokio::test]
    async fn posts_appear_with_lastmod_and_weekly_changefreq() {
        let mut posts = BTreeMap::new();
        posts.insert(
            Locale::Ko,
            vec![post("hello", Locale::Ko, date!(2026 - 02 - 10))],
        );
        let xml = service(posts).sitemap_xml().await.expect("xml");

        assert!(xml.contains("<loc>https://example.com/ko/blog/hello</loc>"));
        assert!(xml.contains("<lastmod>2026-02-10</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[tokio::test]
    async fn entries_include_locale_alternates() {
        let xml = service(BTreeMap::new()).sitemap_xml().await.expect("xml");

        assert!(xml.contains(
            "<xhtml:link rel=\"alternate\" hreflang=\"en\" href=\"https://example.com/en/blog\"/>"
        ));
        assert!(xml.contains("hreflang=\"x-default\""));
    }

    #[tokio::test]
    async fn robots_txt_points_at_the_sitemap() {
        let robots = service(BTreeMap::new()).robots_txt();

        assert!(robots.contains("User-agent: *"));
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }
}
