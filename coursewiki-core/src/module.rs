//! Module, lens, and learning-outcome document parsing.

use crate::error::ParseError;
use crate::frontmatter::parse_frontmatter;
use crate::section::build_section;
use crate::structure::{split_blocks, Level};
use crate::wikilink::scan_lens_refs;
use coursewiki_types::{LearningOutcomeDoc, ParsedModule};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Parse a raw module document into a structured module
///
/// Frontmatter supplies `slug`, `title` and the optional stable `id`;
/// the body is split at `# Type: Title` boundaries and each section
/// is built into its typed variant. Lens documents share this format
/// and are parsed with the same function.
pub fn parse_module(source: &str) -> Result<ParsedModule, ParseError> {
    let (meta, body) = parse_frontmatter(source);

    let sections = split_blocks(body, Level::Section)
        .iter()
        .map(build_section)
        .collect::<Result<Vec<_>, _>>()?;

    let module = ParsedModule {
        slug: meta_string(&meta, "slug"),
        title: meta_string(&meta, "title"),
        content_id: meta_id(&meta),
        sections,
    };

    debug!(
        slug = %module.slug,
        sections = module.sections.len(),
        "parsed module document"
    );

    Ok(module)
}

/// Parse a raw learning-outcome document
///
/// The body is scanned for lens references, each optionally followed
/// by an `optional:: <bool>` field on the next contiguous non-blank
/// lines.
pub fn parse_learning_outcome(source: &str) -> Result<LearningOutcomeDoc, ParseError> {
    let (meta, body) = parse_frontmatter(source);

    Ok(LearningOutcomeDoc {
        slug: meta_string(&meta, "slug"),
        title: meta_string(&meta, "title"),
        content_id: meta_id(&meta),
        lenses: scan_lens_refs(body)?,
    })
}

fn meta_string(meta: &BTreeMap<String, String>, key: &str) -> String {
    meta.get(key).cloned().unwrap_or_default()
}

/// Lenient stable-id read: a missing or malformed UUID means the
/// document is untracked, never an error.
fn meta_id(meta: &BTreeMap<String, String>) -> Option<Uuid> {
    meta.get("id").and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursewiki_types::{ContentCategory, Section, Segment};

    const MODULE_DOC: &str = r#"---
slug: reading-week
title: Reading Week
id: 550e8400-e29b-41d4-a716-446655440000
---

# Article: Reading
source:: [[articles/some-article]]
optional:: true

## Article-excerpt
from:: "Some anchor phrase"
to:: "Another anchor phrase"

## Chat
instructions::
Discuss the excerpt.

# Text
content::
!# A Literal Header

Plain prose.
"#;

    #[test]
    fn test_parse_full_module() {
        let module = parse_module(MODULE_DOC).unwrap();

        assert_eq!(module.slug, "reading-week");
        assert_eq!(module.title, "Reading Week");
        assert_eq!(
            module.content_id.unwrap().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(module.sections.len(), 2);

        match &module.sections[0] {
            Section::Article {
                source,
                segments,
                optional,
                ..
            } => {
                assert_eq!(source.key, "some-article");
                assert!(*optional);
                assert_eq!(segments.len(), 2);
                assert!(matches!(segments[0], Segment::ArticleExcerpt { .. }));
                match &segments[1] {
                    Segment::Chat(chat) => {
                        assert_eq!(chat.instructions, "Discuss the excerpt.")
                    }
                    other => panic!("Expected chat segment, got {other:?}"),
                }
            }
            other => panic!("Expected article section, got {other:?}"),
        }

        match &module.sections[1] {
            Section::Text { content } => {
                assert!(content.starts_with("# A Literal Header"));
                assert!(content.contains("Plain prose."));
            }
            other => panic!("Expected text section, got {other:?}"),
        }
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let first = parse_module(MODULE_DOC).unwrap();
        let second = parse_module(MODULE_DOC).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_module_without_id_is_untracked() {
        let module = parse_module("---\nslug: a\ntitle: A\n---\n# Chat\ninstructions:: hi\n").unwrap();
        assert_eq!(module.content_id, None);
    }

    #[test]
    fn test_module_with_malformed_id_is_untracked() {
        let module =
            parse_module("---\nslug: a\ntitle: A\nid: nope\n---\n# Chat\ninstructions:: hi\n")
                .unwrap();
        assert_eq!(module.content_id, None);
    }

    #[test]
    fn test_unknown_section_type_propagates() {
        let result = parse_module("---\nslug: a\ntitle: A\n---\n# Quiz: Pop\n");
        assert_eq!(result, Err(ParseError::UnknownSectionType("quiz".to_string())));
    }

    #[test]
    fn test_parse_learning_outcome() {
        let source = "---\nslug: sorting\ntitle: Sorting\nid: 6fa459ea-ee8a-3ca4-894e-db77e160355e\n---\n\n![[lenses/bubble-sort]]\noptional:: true\n\n![[lenses/merge-sort]]\n";
        let doc = parse_learning_outcome(source).unwrap();

        assert_eq!(doc.slug, "sorting");
        assert!(doc.content_id.is_some());
        assert_eq!(doc.lenses.len(), 2);
        assert_eq!(doc.lenses[0].source.category, ContentCategory::Lenses);
        assert!(doc.lenses[0].optional);
        assert!(!doc.lenses[1].optional);
    }
}
