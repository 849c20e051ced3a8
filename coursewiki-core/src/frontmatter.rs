//! Frontmatter parsing from content documents.
//!
//! The frontmatter block is a flat `key: value` mapping delimited by
//! `---` lines at the very start of a document. It is deliberately not
//! YAML: values are plain strings (optionally quoted), and lines
//! without a `:` are skipped rather than rejected.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX
        .get_or_init(|| Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(\r?\n|\z)").unwrap())
}

/// Parse frontmatter from document content
///
/// Returns a tuple of (metadata, body with the frontmatter removed).
/// If the document does not open with a `---` line, returns an empty
/// mapping and the content unchanged.
///
/// # Example
///
/// ```
/// use coursewiki_core::frontmatter::parse_frontmatter;
///
/// let content = "---\nslug: my-module\ntitle: My Module\n---\n# Text\ncontent:: hi\n";
///
/// let (meta, body) = parse_frontmatter(content);
/// assert_eq!(meta.get("slug").map(String::as_str), Some("my-module"));
/// assert!(body.starts_with("# Text"));
/// ```
pub fn parse_frontmatter(content: &str) -> (BTreeMap<String, String>, &str) {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return (BTreeMap::new(), content);
    };

    let block = captures.get(1).map(|m| m.as_str()).unwrap_or("");
    let body = &content[captures.get(0).map(|m| m.end()).unwrap_or(0)..];

    let mut meta = BTreeMap::new();
    for line in block.lines() {
        // Lines without a separator are skipped, not rejected
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), strip_quotes(value.trim()).to_string());
    }

    (meta, body)
}

/// Reserialize metadata as a `---`-delimited frontmatter block
pub fn serialize_frontmatter(meta: &BTreeMap<String, String>) -> String {
    let mut out = String::from("---\n");
    for (key, value) in meta {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str("---\n");
    out
}

/// Strip one matching pair of surrounding single or double quotes
pub(crate) fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
