//! Canonical and alternate-language URL composition.
//!
//! Pure string assembly: the locale router resolves a locale, these helpers
//! turn it into the canonical URL plus the hreflang set search engines
//! expect. No side effects, no state.

use serde_json::json;
use time::{Date, format_description::well_known::Iso8601};

use crate::{config::SiteSettings, domain::locale::Locale};

/// One alternate-language link for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    pub hreflang: String,
    pub href: String,
}

/// Locale-prefixed path for a page, e.g. `/ko/blog/hello-world`.
pub fn locale_path(locale: Locale, subpath: &str) -> String {
    let trimmed = subpath.trim_matches('/');
    if trimmed.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{trimmed}")
    }
}

/// Join a base site URL and a path into an absolute URL.
pub fn canonical_url(base: &str, path: &str) -> String {
    let root = normalize_site_url(base);
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root
    } else {
        format!("{root}{trimmed}")
    }
}

/// The hreflang set for a page: every locale plus `x-default` pointing at
/// the configured default locale.
pub fn build_alternates(base: &str, subpath: &str, default_locale: Locale) -> Vec<AlternateLink> {
    let mut links: Vec<AlternateLink> = Locale::ALL
        .iter()
        .map(|&locale| AlternateLink {
            hreflang: locale.as_str().to_string(),
            href: canonical_url(base, &locale_path(locale, subpath)),
        })
        .collect();

    links.push(AlternateLink {
        hreflang: "x-default".to_string(),
        href: canonical_url(base, &locale_path(default_locale, subpath)),
    });

    links
}

/// Article structured data for a blog detail page.
pub fn article_json_ld(
    site: &SiteSettings,
    title: &str,
    excerpt: &str,
    url: &str,
    published_at: Date,
    cover_image: Option<&str>,
) -> String {
    let date = published_at
        .format(&Iso8601::DATE)
        .unwrap_or_else(|_| published_at.to_string());

    let mut article = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": title,
        "description": excerpt,
        "url": url,
        "datePublished": date,
        "author": {
            "@type": "Person",
            "name": site.author,
        },
        "publisher": {
            "@type": "Person",
            "name": site.author,
        },
    });

    if let (Some(image), Some(object)) = (cover_image, article.as_object_mut()) {
        object.insert("image".to_string(), json!(image));
    }

    article.to_string()
}

/// Person structured data for the about page.
pub fn person_json_ld(site: &SiteSettings) -> String {
    let mut same_as = Vec::new();
    if let Some(github) = site.github_url.as_deref() {
        same_as.push(github);
    }
    if let Some(linkedin) = site.linkedin_url.as_deref() {
        same_as.push(linkedin);
    }

    json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": site.author,
        "url": normalize_site_url(&site.public_site_url),
        "sameAs": same_as,
    })
    .to_string()
}

pub(crate) fn normalize_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_path_prefixes_every_route() {
        assert_eq!(locale_path(Locale::Ko, ""), "/ko");
        assert_eq!(locale_path(Locale::En, "blog"), "/en/blog");
        assert_eq!(locale_path(Locale::En, "/blog/hello-world/"), "/en/blog/hello-world");
    }

    #[test]
    fn canonical_url_handles_trailing_slashes() {
        assert_eq!(
            canonical_url("https://example.com/", "/ko/blog"),
            "https://example.com/ko/blog"
        );
        assert_eq!(canonical_url("https://example.com", ""), "https://example.com/");
    }

    fn test_site() -> SiteSettings {
        SiteSettings {
            public_site_url: "https://example.com".to_string(),
            title: "Example".to_string(),
            tagline: "Tagline".to_string(),
            author: "Jane Doe".to_string(),
            default_locale: Locale::Ko,
            github_url: Some("https://github.com/janedoe".to_string()),
            linkedin_url: None,
        }
    }

    #[test]
    fn article_json_ld_is_valid_schema_org_json() {
        let raw = article_json_ld(
            &test_site(),
            "Hello",
            "An excerpt",
            "https://example.com/ko/blog/hello",
            time::macros::date!(2025 - 03 - 01),
            Some("https://example.com/cover.png"),
        );

        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
        assert_eq!(value["@type"], "Article");
        assert_eq!(value["headline"], "Hello");
        assert_eq!(value["datePublished"], "2025-03-01");
        assert_eq!(value["image"], "https://example.com/cover.png");
    }

    #[test]
    fn person_json_ld_lists_only_configured_profiles() {
        let raw = person_json_ld(&test_site());
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");

        assert_eq!(value["@type"], "Person");
        assert_eq!(value["sameAs"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn alternates_cover_all_locales_plus_x_default() {
        let links = build_alternates("https://example.com", "blog", Locale::Ko);

        assert_eq!(links.len(), Locale::ALL.len() + 1);
        assert!(links.iter().any(|l| l.hreflang == "ko" && l.href.ends_with("/ko/blog")));
        assert!(links.iter().any(|l| l.hreflang == "en" && l.href.ends_with("/en/blog")));

        let x_default = links.iter().find(|l| l.hreflang == "x-default").expect("x-default");
        assert!(x_default.href.ends_with("/ko/blog"));
    }
}
