//! Open Graph preview card generation.
//!
//! Produces a 1200×630 SVG card from a title and optional description.
//! Vector output keeps the generator dependency-free of font rasterization
//! and every crawler that fetches OG images accepts SVG or transcodes it.

use crate::config::SiteSettings;

pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;

const TITLE_MAX: usize = 60;
const DESCRIPTION_MAX: usize = 120;

#[derive(Clone)]
pub struct OgImageService {
    site: SiteSettings,
}

impl OgImageService {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }

    /// Render the card. A missing title falls back to the site-branded
    /// default; overlong text is truncated with an ellipsis.
    pub fn render(&self, title: Option<&str>, description: Option<&str>) -> String {
        let title = match title.filter(|t| !t.trim().is_empty()) {
            Some(title) => truncate_with_ellipsis(title, TITLE_MAX),
            None => self.site.title.clone(),
        };
        let description = match description.filter(|d| !d.trim().is_empty()) {
            Some(description) => truncate_with_ellipsis(description, DESCRIPTION_MAX),
            None => self.site.tagline.clone(),
        };

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{OG_WIDTH}" height="{OG_HEIGHT}" viewBox="0 0 {OG_WIDTH} {OG_HEIGHT}">
  <defs>
    <linearGradient id="glow" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0" stop-color="#1d4ed8" stop-opacity="0.35"/>
      <stop offset="1" stop-color="#0a0a0f" stop-opacity="0"/>
    </linearGradient>
  </defs>
  <rect width="{OG_WIDTH}" height="{OG_HEIGHT}" fill="#0a0a0f"/>
  <rect width="{OG_WIDTH}" height="{OG_HEIGHT}" fill="url(#glow)"/>
  <text x="80" y="120" font-family="sans-serif" font-size="34" fill="#60a5fa">{brand}</text>
  <text x="80" y="320" font-family="sans-serif" font-size="64" font-weight="bold" fill="#f8fafc">{title}</text>
  <text x="80" y="400" font-family="sans-serif" font-size="32" fill="#94a3b8">{description}</text>
  <text x="80" y="560" font-family="sans-serif" font-size="26" fill="#475569">{tagline}</text>
</svg>
"##,
            brand = xml_escape(&self.site.title),
            title = xml_escape(&title),
            description = xml_escape(&description),
            tagline = xml_escape(&self.site.tagline),
        )
    }
}

/// Truncate to `max` characters, replacing the tail with an ellipsis.
/// Character counts, not bytes, so multibyte text never splits mid-glyph.
fn truncate_with_ellipsis(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let kept: String = input.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
