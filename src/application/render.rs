//! Markdown rendering pipeline.
//!
//! The renderer is an explicitly constructed service: the syntax
//! highlighter is built once at startup and injected into consumers, never
//! reached through a lazily initialised global.

use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Options, Plugins, markdown_to_html_with_plugins};

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Comrak-based markdown renderer with Syntect code highlighting.
pub struct MarkdownRenderService {
    options: Options<'static>,
    highlighter: SyntectAdapter,
}

impl MarkdownRenderService {
    /// Construct the renderer with GitHub-flavored extensions enabled and
    /// anchor ids on headings.
    pub fn new() -> Self {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.tasklist = true;
        options.extension.autolink = true;
        options.extension.footnotes = true;
        options.extension.header_id_prefix = Some(String::new());

        Self {
            options,
            highlighter: SyntectAdapter::new(Some(HIGHLIGHT_THEME)),
        }
    }

    /// Render a markdown body to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let mut plugins = Plugins::default();
        plugins.render.codefence_syntax_highlighter = Some(&self.highlighter);
        markdown_to_html_with_plugins(markdown, &self.options, &plugins)
    }
}

impl Default for MarkdownRenderService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let renderer = MarkdownRenderService::new();
        let html = renderer.render("## Hello\n\nSome *emphasis*.");

        assert!(html.contains("<h2"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn heading_anchors_are_emitted() {
        let renderer = MarkdownRenderService::new();
        let html = renderer.render("## Getting Started\n");

        assert!(html.contains("getting-started"));
    }

    #[test]
    fn repeated_heading_anchors_are_disambiguated() {
        let renderer = MarkdownRenderService::new();
        let html = renderer.render("## Same Heading\n\n## Same Heading\n");

        assert!(html.contains("same-heading"));
        assert!(html.contains("same-heading-1"));
    }

    #[test]
    fn code_fences_are_highlighted() {
        let renderer = MarkdownRenderService::new();
        let html = renderer.render("```rust\nfn main() {}\n```\n");

        assert!(html.contains("<pre"));
    }
}
