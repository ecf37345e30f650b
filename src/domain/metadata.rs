//! Derived post metadata: table-of-contents headings and reading time.

use std::collections::HashMap;

use crate::domain::entities::TocItem;
use crate::domain::slug::heading_id;

const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time for a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingTime {
    pub minutes: u32,
    pub display: String,
}

/// Scan a markdown body for level 2–3 headings and derive stable anchor ids.
///
/// Fenced code blocks are skipped so a `## comment` inside an example does
/// not leak into the table of contents. Repeated heading text gets a `-1`,
/// `-2`, ... suffix, the same scheme the HTML renderer uses for its anchor
/// ids, so every entry links to its own section.
pub fn extract_headings(body: &str) -> Vec<TocItem> {
    let mut items = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let Some(heading) = parse_heading_line(line) else {
            continue;
        };

        let base = heading_id(heading.text);
        let id = match seen.get_mut(&base) {
            Some(count) => {
                *count += 1;
                format!("{base}-{count}")
            }
            None => {
                seen.insert(base.clone(), 0);
                base
            }
        };

        items.push(TocItem {
            id,
            text: heading.text.to_string(),
            level: heading.level,
        });
    }

    items
}

struct HeadingLine<'a> {
    level: u8,
    text: &'a str,
}

fn parse_heading_line(line: &str) -> Option<HeadingLine<'_>> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if !(2..=3).contains(&hashes) {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }

    Some(HeadingLine {
        level: hashes as u8,
        text,
    })
}

/// Estimate reading time at 200 words per minute, rounded up, never zero.
pub fn reading_time(body: &str) -> ReadingTime {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1) as u32;

    ReadingTime {
        minutes,
        display: format!("{minutes} min read"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_level_two_and_three_headings_only() {
        let body = "# Title\n\n## Overview\n\ntext\n\n### Details\n\n#### Too deep\n";
        let headings = extract_headings(body);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[0].id, "overview");
        assert_eq!(headings[1].level, 3);
        assert_eq!(headings[1].id, "details");
    }

    #[test]
    fn skips_headings_inside_code_fences() {
        let body = "## Real\n\n```sh\n## not a heading\n```\n\n### Also real\n";
        let headings = extract_headings(body);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Real");
        assert_eq!(headings[1].text, "Also real");
    }

    #[test]
    fn korean_headings_keep_hangul_ids() {
        let headings = extract_headings("## 시작하기\n\n### 프로젝트 구조\n");

        assert_eq!(headings[0].id, "시작하기");
        assert_eq!(headings[1].id, "프로젝트-구조");
    }

    #[test]
    fn punctuation_only_heading_does_not_panic() {
        let headings = extract_headings("## ?!?\n");

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, "");
        assert_eq!(headings[0].text, "?!?");
    }

    #[test]
    fn repeated_headings_get_suffixed_ids() {
        let body = "## Same Heading\n\n## Same Heading\n\n## Same Heading\n";
        let headings = extract_headings(body);

        assert_eq!(headings[0].id, "same-heading");
        assert_eq!(headings[1].id, "same-heading-1");
        assert_eq!(headings[2].id, "same-heading-2");
    }

    #[test]
    fn extraction_is_idempotent() {
        let body = "## Same Heading\n\n## Same Heading\n";

        assert_eq!(extract_headings(body), extract_headings(body));
    }

    #[test]
    fn reading_time_rounds_up() {
        let body = ["word"; 450].join(" ");
        let estimate = reading_time(&body);

        assert_eq!(estimate.minutes, 3);
        assert_eq!(estimate.display, "3 min read");
    }

    #[test]
    fn reading_time_has_a_floor_of_one_minute() {
        assert_eq!(reading_time("short").minutes, 1);
        assert_eq!(reading_time("").minutes, 1);
    }
}
