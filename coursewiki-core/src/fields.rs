//! `key:: value` field block parsing.
//!
//! Fields carry a section or segment's data. A value either follows
//! the marker on the same line, or accumulates over the following
//! lines until the next field marker, a `#`/`##` boundary, or end of
//! input.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
static BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();
static ESCAPED_HEADER_REGEX: OnceLock<Regex> = OnceLock::new();

fn field_regex() -> &'static Regex {
    FIELD_REGEX.get_or_init(|| Regex::new(r"^(\w+)::[ \t]*(.*)$").unwrap())
}

fn boundary_regex() -> &'static Regex {
    BOUNDARY_REGEX.get_or_init(|| Regex::new(r"^#{1,2} +[A-Za-z]").unwrap())
}

fn escaped_header_regex() -> &'static Regex {
    ESCAPED_HEADER_REGEX.get_or_init(|| Regex::new(r"(?m)^!(#+)").unwrap())
}

/// Parse all `key:: value` fields from a text block
///
/// Multi-line values are trimmed as a block, preserving interior blank
/// lines. A duplicated key keeps its last occurrence.
pub fn parse_fields(text: &str) -> BTreeMap<String, String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut fields = BTreeMap::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(captures) = field_regex().captures(lines[i]) else {
            i += 1;
            continue;
        };

        let name = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        let inline = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        i += 1;

        let value = if !inline.is_empty() {
            inline.to_string()
        } else {
            let start = i;
            while i < lines.len()
                && !field_regex().is_match(lines[i])
                && !boundary_regex().is_match(lines[i])
            {
                i += 1;
            }
            lines[start..i].join("\n").trim().to_string()
        };

        fields.insert(name.to_string(), value);
    }

    fields
}

/// Parse a boolean field value
///
/// `"true"`, `"yes"` and `"1"` (case-insensitive) are true; any other
/// value, including an absent one, is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Unescape literal markdown headers inside a field value
///
/// Authors write `!#`, `!##`, ... at the start of a line so literal
/// headers are not misread as structural boundaries; this restores
/// them to `#`, `##`, ...
pub fn unescape_headers(content: &str) -> String {
    escaped_header_regex()
        .replace_all(content, "$1")
        .into_owned()
}
