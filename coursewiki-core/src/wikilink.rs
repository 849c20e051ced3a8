//! Wiki-link resolution for `[[path]]` and `![[path]]` syntax.
//!
//! A link target is classified into a content category and reduced to
//! a cache lookup key (the filename stem). Targets outside the four
//! recognized category directories are an authoring error.

use crate::error::ParseError;
use crate::fields::{parse_bool, parse_fields};
use coursewiki_types::{ContentCategory, ContentRef, LensRef};

/// Extract the raw target path from a wiki-link or bare path
///
/// Handles `[[target]]`, `![[target]]` and bare paths, stripping an
/// optional `|display name` suffix.
pub fn link_target(raw: &str) -> &str {
    let mut target = raw.trim();
    target = target.strip_prefix('!').unwrap_or(target);

    if let Some(start) = target.find("[[") {
        let rest = &target[start + 2..];
        target = rest.split("]]").next().unwrap_or(rest);
    }

    if let Some((path, _display)) = target.split_once('|') {
        target = path;
    }

    target.trim()
}

/// Reduce a content path to its cache lookup key
///
/// The key is the final path segment with any `.md` suffix stripped.
pub fn cache_key(path: &str) -> &str {
    let stem = path.rsplit('/').next().unwrap_or(path);
    stem.strip_suffix(".md").unwrap_or(stem)
}

/// Resolve a wiki-link or bare path into a typed content reference
///
/// Fails with [`ParseError::UnrecognizedContentPath`] when the path
/// matches none of the recognized content categories.
pub fn resolve_link(raw: &str) -> Result<ContentRef, ParseError> {
    let target = link_target(raw);
    let category = ContentCategory::classify(target)
        .ok_or_else(|| ParseError::UnrecognizedContentPath(target.to_string()))?;

    Ok(ContentRef::new(category, cache_key(target)))
}

/// Scan a text block for lens references
///
/// Each line containing a wiki-link becomes one reference; an
/// `optional:: <bool>` field within the immediately following
/// contiguous non-blank lines attaches to it.
pub fn scan_lens_refs(body: &str) -> Result<Vec<LensRef>, ParseError> {
    let lines: Vec<&str> = body.lines().collect();
    let mut refs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !(lines[i].contains("[[") && lines[i].contains("]]")) {
            i += 1;
            continue;
        }

        let source = resolve_link(lines[i])?;
        i += 1;

        let start = i;
        while i < lines.len() && !lines[i].trim().is_empty() && !lines[i].contains("[[") {
            i += 1;
        }
        let trailing = parse_fields(&lines[start..i].join("\n"));
        let optional = trailing
            .get("optional")
            .map(|value| parse_bool(value))
            .unwrap_or(false);

        refs.push(LensRef { source, optional });
    }

    Ok(refs)
}
