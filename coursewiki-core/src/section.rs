//! Section and segment builders.
//!
//! Each builder takes a structural block (type token, title, body),
//! parses its fields, and converts immediately into the strongly
//! typed variant. The raw field map never travels further down the
//! call stack. Unknown type tokens are a hard error at both levels so
//! authoring typos surface at parse time.

use crate::error::ParseError;
use crate::fields::{parse_bool, parse_fields, unescape_headers};
use crate::frontmatter::strip_quotes;
use crate::structure::{leading_text, split_blocks, Block, Level};
use crate::wikilink::{resolve_link, scan_lens_refs};
use coursewiki_types::{ChatBlock, Section, Segment};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Build a typed section from a top-level structural block
pub fn build_section(block: &Block) -> Result<Section, ParseError> {
    // Scope the section's own fields to the body before its segments
    let fields = parse_fields(leading_text(&block.body, Level::Segment));

    match block.kind.to_lowercase().as_str() {
        "video" => Ok(Section::Video {
            source: source_ref(&fields)?,
            segments: build_segments(&block.body)?,
            optional: bool_field(&fields, "optional"),
            content_id: id_field(&fields),
        }),
        "article" => Ok(Section::Article {
            source: source_ref(&fields)?,
            segments: build_segments(&block.body)?,
            optional: bool_field(&fields, "optional"),
            content_id: id_field(&fields),
        }),
        "text" => Ok(Section::Text {
            content: content_field(&fields),
        }),
        "chat" => Ok(Section::Chat(chat_block(&fields))),
        "page" => Ok(Section::Page {
            title: block.title.clone(),
            segments: build_segments(&block.body)?,
            optional: bool_field(&fields, "optional"),
            content_id: id_field(&fields),
        }),
        "learning-outcome" => Ok(Section::LearningOutcome {
            source: source_ref(&fields)?,
            optional: bool_field(&fields, "optional"),
        }),
        "uncategorized" => Ok(Section::Uncategorized {
            lenses: scan_lens_refs(&block.body)?,
        }),
        other => Err(ParseError::UnknownSectionType(other.to_string())),
    }
}

/// Build a typed segment from a nested structural block
pub fn build_segment(block: &Block) -> Result<Segment, ParseError> {
    let fields = parse_fields(&block.body);

    match block.kind.to_lowercase().as_str() {
        "text" => Ok(Segment::Text {
            content: content_field(&fields),
        }),
        "chat" => Ok(Segment::Chat(chat_block(&fields))),
        "video-excerpt" => Ok(Segment::VideoExcerpt {
            from_time: fields.get("from").cloned(),
            to_time: fields.get("to").cloned(),
        }),
        "article-excerpt" => Ok(Segment::ArticleExcerpt {
            from_text: anchor_field(&fields, "from"),
            to_text: anchor_field(&fields, "to"),
        }),
        other => Err(ParseError::UnknownSegmentType(other.to_string())),
    }
}

fn build_segments(body: &str) -> Result<Vec<Segment>, ParseError> {
    split_blocks(body, Level::Segment)
        .iter()
        .map(build_segment)
        .collect()
}

fn source_ref(
    fields: &BTreeMap<String, String>,
) -> Result<coursewiki_types::ContentRef, ParseError> {
    let raw = fields
        .get("source")
        .ok_or(ParseError::MissingField("source"))?;
    resolve_link(raw)
}

fn content_field(fields: &BTreeMap<String, String>) -> String {
    unescape_headers(fields.get("content").map(String::as_str).unwrap_or(""))
}

/// Lenient stable-id parse: an invalid UUID is treated as absent, so
/// a malformed id degrades to "untracked" instead of failing.
fn id_field(fields: &BTreeMap<String, String>) -> Option<Uuid> {
    fields.get("id").and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

fn bool_field(fields: &BTreeMap<String, String>, name: &str) -> bool {
    fields.get(name).map(|value| parse_bool(value)).unwrap_or(false)
}

fn anchor_field(fields: &BTreeMap<String, String>, name: &str) -> Option<String> {
    fields.get(name).map(|raw| strip_quotes(raw.trim()).to_string())
}

/// Assemble a chat block, honoring the legacy `includePreviousContent`
/// field: when present it drives both visibility flags, and the newer
/// split fields override it individually.
fn chat_block(fields: &BTreeMap<String, String>) -> ChatBlock {
    let legacy_hide = fields
        .get("includePreviousContent")
        .map(|value| !parse_bool(value));

    let hide_from_user = fields
        .get("hidePreviousContentFromUser")
        .map(|value| parse_bool(value))
        .or(legacy_hide)
        .unwrap_or(false);

    let hide_from_tutor = fields
        .get("hidePreviousContentFromTutor")
        .map(|value| parse_bool(value))
        .or(legacy_hide)
        .unwrap_or(false);

    ChatBlock {
        instructions: fields
            .get("instructions")
            .cloned()
            .unwrap_or_default(),
        hide_previous_content_from_user: hide_from_user,
        hide_previous_content_from_tutor: hide_from_tutor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursewiki_types::ContentCategory;

    fn block(kind: &str, title: &str, body: &str) -> Block {
        Block {
            kind: kind.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_article_section_with_segments() {
        let body = "source:: [[articles/recursion]]\noptional:: true\nid:: 550e8400-e29b-41d4-a716-446655440000\n\n## Article-excerpt\nfrom:: \"Intro\"\nto:: \"Conclusion\"\n\n## Chat\ninstructions:: Discuss.\n";
        let section = build_section(&block("Article", "Reading", body)).unwrap();

        match section {
            Section::Article {
                source,
                segments,
                optional,
                content_id,
            } => {
                assert_eq!(source.category, ContentCategory::Articles);
                assert_eq!(source.key, "recursion");
                assert!(optional);
                assert_eq!(
                    content_id.unwrap().to_string(),
                    "550e8400-e29b-41d4-a716-446655440000"
                );
                assert_eq!(segments.len(), 2);
                assert_eq!(
                    segments[0],
                    Segment::ArticleExcerpt {
                        from_text: Some("Intro".to_string()),
                        to_text: Some("Conclusion".to_string()),
                    }
                );
            }
            other => panic!("Expected article section, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_id_means_untracked() {
        let body = "source:: [[video_transcripts/welcome]]\nid:: not-a-uuid\n";
        let section = build_section(&block("Video", "", body)).unwrap();

        match section {
            Section::Video { content_id, .. } => assert_eq!(content_id, None),
            other => panic!("Expected video section, got {other:?}"),
        }
    }

    #[test]
    fn test_video_without_source_is_an_error() {
        let result = build_section(&block("Video", "", "optional:: true\n"));
        assert_eq!(result, Err(ParseError::MissingField("source")));
    }

    #[test]
    fn test_text_section_unescapes_headers() {
        let body = "content::\n!# Title\n\nbody\n\n!## Sub\n";
        let section = build_section(&block("Text", "", body)).unwrap();

        assert_eq!(
            section,
            Section::Text {
                content: "# Title\n\nbody\n\n## Sub".to_string()
            }
        );
    }

    #[test]
    fn test_chat_split_flags() {
        let body =
            "instructions:: Talk.\nhidePreviousContentFromUser:: true\nhidePreviousContentFromTutor:: false\n";
        let section = build_section(&block("Chat", "", body)).unwrap();

        match section {
            Section::Chat(chat) => {
                assert_eq!(chat.instructions, "Talk.");
                assert!(chat.hide_previous_content_from_user);
                assert!(!chat.hide_previous_content_from_tutor);
            }
            other => panic!("Expected chat section, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_legacy_include_previous_content() {
        let section =
            build_section(&block("Chat", "", "instructions:: x\nincludePreviousContent:: false\n"))
                .unwrap();

        match section {
            Section::Chat(chat) => {
                assert!(chat.hide_previous_content_from_user);
                assert!(chat.hide_previous_content_from_tutor);
            }
            other => panic!("Expected chat section, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_split_field_overrides_legacy() {
        let body =
            "instructions:: x\nincludePreviousContent:: false\nhidePreviousContentFromUser:: false\n";
        let section = build_section(&block("Chat", "", body)).unwrap();

        match section {
            Section::Chat(chat) => {
                // split field wins for the user flag, legacy fills the tutor flag
                assert!(!chat.hide_previous_content_from_user);
                assert!(chat.hide_previous_content_from_tutor);
            }
            other => panic!("Expected chat section, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_missing_instructions_is_empty_not_error() {
        let section = build_section(&block("Chat", "", "")).unwrap();
        match section {
            Section::Chat(chat) => assert_eq!(chat.instructions, ""),
            other => panic!("Expected chat section, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_section_type_is_an_error() {
        let result = build_section(&block("Quiz", "", ""));
        assert_eq!(
            result,
            Err(ParseError::UnknownSectionType("quiz".to_string()))
        );
    }

    #[test]
    fn test_unknown_segment_type_is_an_error() {
        let result = build_segment(&block("Poll", "", ""));
        assert_eq!(
            result,
            Err(ParseError::UnknownSegmentType("poll".to_string()))
        );
    }

    #[test]
    fn test_video_excerpt_open_ended() {
        let segment = build_segment(&block("Video-excerpt", "", "from:: 01:23\n")).unwrap();
        assert_eq!(
            segment,
            Segment::VideoExcerpt {
                from_time: Some("01:23".to_string()),
                to_time: None,
            }
        );
    }

    #[test]
    fn test_learning_outcome_section() {
        let body = "source:: [[learning outcomes/sorting]]\noptional:: yes\n";
        let section = build_section(&block("Learning-outcome", "", body)).unwrap();

        match section {
            Section::LearningOutcome { source, optional } => {
                assert_eq!(source.category, ContentCategory::LearningOutcomes);
                assert_eq!(source.key, "sorting");
                assert!(optional);
            }
            other => panic!("Expected learning-outcome section, got {other:?}"),
        }
    }

    #[test]
    fn test_uncategorized_section_collects_lens_refs() {
        let body = "![[lenses/one]]\n\n![[lenses/two]]\noptional:: true\n";
        let section = build_section(&block("Uncategorized", "", body)).unwrap();

        match section {
            Section::Uncategorized { lenses } => {
                assert_eq!(lenses.len(), 2);
                assert_eq!(lenses[0].source.key, "one");
                assert!(!lenses[0].optional);
                assert!(lenses[1].optional);
            }
            other => panic!("Expected uncategorized section, got {other:?}"),
        }
    }

    #[test]
    fn test_page_section_keeps_title_and_segments() {
        let body = "id:: 550e8400-e29b-41d4-a716-446655440000\n\n## Text\ncontent:: hello\n";
        let section = build_section(&block("Page", "Welcome", body)).unwrap();

        match section {
            Section::Page {
                title,
                segments,
                content_id,
                ..
            } => {
                assert_eq!(title, "Welcome");
                assert!(content_id.is_some());
                assert_eq!(segments.len(), 1);
            }
            other => panic!("Expected page section, got {other:?}"),
        }
    }
}
