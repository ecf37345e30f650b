//! RSS 2.0 feed generation, one feed per locale.

use std::sync::Arc;

use time::format_description::well_known::Rfc2822;

use crate::application::{
    content::ContentSource,
    error::AppError,
    seo::{canonical_url, locale_path},
};
use crate::config::SiteSettings;
use crate::domain::locale::Locale;

#[derive(Clone)]
pub struct SyndicationService {
    content: Arc<dyn ContentSource>,
    site: SiteSettings,
}

impl SyndicationService {
    pub fn new(content: Arc<dyn ContentSource>, site: SiteSettings) -> Self {
        Self { content, site }
    }

    /// Generate the RSS 2.0 feed for one locale.
    pub async fn rss_feed(&self, locale: Locale) -> Result<String, AppError> {
        let base = &self.site.public_site_url;
        let posts = self.content.list_posts(locale).await?;

        let home_url = canonical_url(base, &locale_path(locale, ""));
        let feed_url = canonical_url(base, &format!("{}/rss.xml", locale.as_str()));

        let mut items = String::new();
        for post in posts {
            let published = post.published_at.midnight().assume_utc();
            let pub_date = published
                .format(&Rfc2822)
                .unwrap_or_else(|_| post.published_at.to_string());
            let link = canonical_url(base, &locale_path(locale, &format!("blog/{}", post.slug)));
            let category = post
                .category
                .as_deref()
                .map(|c| format!("      <category>{}</category>\n", xml_escape(c)))
                .unwrap_or_default();
            items.push_str(&format!(
                "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <guid isPermaLink=\"true\">{}</guid>\n      <pubDate>{}</pubDate>\n{}      <description>{}</description>\n    </item>\n",
                cdata(&post.title),
                link,
                link,
                pub_date,
                category,
                cdata(&post.excerpt),
            ));
        }

        let channel = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n  <channel>\n    <title>{}</title>\n    <link>{}</link>\n    <description>{}</description>\n    <language>{}</language>\n    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n{}  </channel>\n</rss>\n",
            cdata(&self.site.title),
            home_url,
            cdata(&self.site.tagline),
            locale.as_str(),
            feed_url,
            items
        );

        Ok(channel)
    }
}

/// Wrap arbitrary text in CDATA. A literal `]]>` inside the text would
/// terminate the section early, so it is split across two sections.
fn cdata(input: &str) -> String {
    let safe = input.replace("]]>", "]]]]><![CDATA[>");
    format!("<![CDATA[{safe}]]>")
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
