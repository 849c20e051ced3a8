//! Document structure splitting at `# Type: Title` boundaries.
//!
//! Both nesting levels (top-level sections and nested segments) use
//! the same algorithm over different heading depths.

use regex::Regex;
use std::sync::OnceLock;

/// Heading depth a split operates at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `# Type: Title` boundaries
    Section,
    /// `## Type: Title` boundaries
    Segment,
}

/// One structural block: type token, optional title, and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: String,
    pub title: String,
    pub body: String,
}

static SECTION_REGEX: OnceLock<Regex> = OnceLock::new();
static SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn boundary_regex(level: Level) -> &'static Regex {
    match level {
        Level::Section => SECTION_REGEX.get_or_init(|| {
            Regex::new(r"(?m)^# +([A-Za-z][\w-]*)(?:[ \t]*:[ \t]*(.*?))?[ \t]*\r?$").unwrap()
        }),
        Level::Segment => SEGMENT_REGEX.get_or_init(|| {
            Regex::new(r"(?m)^## +([A-Za-z][\w-]*)(?:[ \t]*:[ \t]*(.*?))?[ \t]*\r?$").unwrap()
        }),
    }
}

/// Split text into ordered blocks at the given heading level
///
/// The body of each block runs to the next boundary at the same level
/// or to end of input. Text before the first boundary is discarded;
/// it never becomes an implicit block.
pub fn split_blocks(text: &str, level: Level) -> Vec<Block> {
    let regex = boundary_regex(level);

    let matches: Vec<_> = regex.captures_iter(text).collect();
    let mut blocks = Vec::with_capacity(matches.len());

    for (index, captures) in matches.iter().enumerate() {
        let whole = captures.get(0).expect("capture 0 always present");
        let kind = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        let title = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");

        let body_start = whole.end();
        let body_end = matches
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());

        blocks.push(Block {
            kind: kind.to_string(),
            title: title.to_string(),
            body: text[body_start..body_end].to_string(),
        });
    }

    blocks
}

/// Text preceding the first boundary at the given level
///
/// Used to scope a section's own fields to the part of its body that
/// comes before its nested segments.
pub fn leading_text(text: &str, level: Level) -> &str {
    match boundary_regex(level).find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sections_with_and_without_titles() {
        let text = "# Article: Reading\nsource:: [[articles/a]]\n\n# Chat\ninstructions:: hi\n";
        let blocks = split_blocks(text, Level::Section);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, "Article");
        assert_eq!(blocks[0].title, "Reading");
        assert!(blocks[0].body.contains("source:: [[articles/a]]"));
        assert_eq!(blocks[1].kind, "Chat");
        assert_eq!(blocks[1].title, "");
        assert!(blocks[1].body.contains("instructions:: hi"));
    }

    #[test]
    fn test_preamble_is_discarded() {
        let text = "stray text before any boundary\n\n# Text\ncontent:: hello\n";
        let blocks = split_blocks(text, Level::Section);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, "Text");
    }

    #[test]
    fn test_segment_boundaries_stay_inside_section_bodies() {
        let text = "# Article: Reading\nsource:: [[articles/a]]\n\n## Chat\ninstructions:: x\n\n# Text\ncontent:: y\n";
        let sections = split_blocks(text, Level::Section);

        assert_eq!(sections.len(), 2);
        assert!(sections[0].body.contains("## Chat"));

        let segments = split_blocks(&sections[0].body, Level::Segment);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, "Chat");
    }

    #[test]
    fn test_hyphenated_type_tokens() {
        let text = "## Article-excerpt\nfrom:: \"a\"\nto:: \"b\"\n";
        let blocks = split_blocks(text, Level::Segment);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, "Article-excerpt");
    }

    #[test]
    fn test_deeper_headings_are_not_section_boundaries() {
        let text = "# Text\ncontent:: a\n### Not a boundary\nmore\n";
        let blocks = split_blocks(text, Level::Section);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].body.contains("### Not a boundary"));
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        assert!(split_blocks("", Level::Section).is_empty());
    }

    #[test]
    fn test_leading_text_stops_at_first_boundary() {
        let body = "source:: [[articles/a]]\noptional:: true\n\n## Chat\ninstructions:: x\n";
        assert_eq!(
            leading_text(body, Level::Segment),
            "source:: [[articles/a]]\noptional:: true\n\n"
        );
        assert_eq!(leading_text("no boundary here", Level::Segment), "no boundary here");
    }
}
