//! Course document parsing and progression queries.
//!
//! A course body is a flat line scan for two literal markers:
//! `# Lesson: <wiki-link>` (the historical keyword for a module
//! reference) and `# Meeting: <n>`. Lines matching neither pattern
//! are ignored.

use crate::error::ParseError;
use crate::fields::{parse_bool, parse_fields};
use crate::frontmatter::parse_frontmatter;
use crate::wikilink::{cache_key, link_target};
use coursewiki_types::{Course, ModuleRef, ProgressionItem};
use std::collections::BTreeMap;
use tracing::debug;

const LESSON_MARKER: &str = "# Lesson:";
const MEETING_MARKER: &str = "# Meeting:";

/// Parse a raw course document into an ordered progression
pub fn parse_course(source: &str) -> Result<Course, ParseError> {
    let (meta, body) = parse_frontmatter(source);

    let lines: Vec<&str> = body.lines().collect();
    let mut progression = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end();

        if let Some(rest) = line.strip_prefix(LESSON_MARKER) {
            let path = link_target(rest).to_string();
            i += 1;

            // an optional:: field may follow on the contiguous non-blank lines
            let start = i;
            while i < lines.len()
                && !lines[i].trim().is_empty()
                && !lines[i].starts_with("# ")
            {
                i += 1;
            }
            let trailing = parse_fields(&lines[start..i].join("\n"));
            let optional = trailing
                .get("optional")
                .map(|value| parse_bool(value))
                .unwrap_or(false);

            progression.push(ProgressionItem::Module(ModuleRef { path, optional }));
            continue;
        }

        if let Some(rest) = line.strip_prefix(MEETING_MARKER) {
            if let Ok(number) = rest.trim().parse::<u32>() {
                progression.push(ProgressionItem::Meeting { number });
            }
        }

        i += 1;
    }

    let course = Course {
        slug: meta_string(&meta, "slug"),
        title: meta_string(&meta, "title"),
        progression,
    };

    debug!(
        slug = %course.slug,
        items = course.progression.len(),
        "parsed course document"
    );

    Ok(course)
}

/// Resolve the meeting a module is due by
///
/// "Due by meeting N" is the first meeting marker after the module in
/// progression order; `None` when no marker follows (the module has
/// no deadline).
pub fn due_by_meeting(course: &Course, module_slug: &str) -> Option<u32> {
    let position = course.progression.iter().position(|item| {
        matches!(item, ProgressionItem::Module(module) if cache_key(&module.path) == module_slug)
    })?;

    course.progression[position + 1..].iter().find_map(|item| {
        match item {
            ProgressionItem::Meeting { number } => Some(*number),
            ProgressionItem::Module(_) => None,
        }
    })
}

fn meta_string(meta: &BTreeMap<String, String>, key: &str) -> String {
    meta.get(key).cloned().unwrap_or_default()
}
