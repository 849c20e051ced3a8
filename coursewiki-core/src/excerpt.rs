//! Anchor-based excerpt resolution over article text.
//!
//! Anchors are matched case-insensitively and must be unique within
//! the whole document. Uniqueness of the `to` anchor is deliberately
//! checked against the entire document even though its position is
//! searched from the `from` match onward; authors are forced to pick
//! globally unique phrases.

use crate::error::ExcerptError;

/// Compute the inclusive character span selected by anchor phrases
///
/// Returns `(start, end)` byte indices into `content`. A `None`
/// `from_text` anchors at the start; a `None` `to_text` anchors at the
/// end. The span always includes both anchor phrases.
pub fn find_excerpt_bounds(
    content: &str,
    from_text: Option<&str>,
    to_text: Option<&str>,
) -> Result<(usize, usize), ExcerptError> {
    let haystack = content.to_ascii_lowercase();

    let start = match from_text {
        Some(anchor) => find_unique(&haystack, anchor)?,
        None => 0,
    };

    let end = match to_text {
        Some(anchor) => {
            // uniqueness is whole-document; position is from `start` on
            find_unique(&haystack, anchor)?;
            let needle = anchor.to_ascii_lowercase();
            let position = haystack[start..]
                .find(&needle)
                .ok_or_else(|| ExcerptError::AnchorNotFound(anchor.to_string()))?;
            start + position + needle.len()
        }
        None => content.len(),
    };

    Ok((start, end))
}

/// Resolve an excerpt to its trimmed text
pub fn resolve_article_excerpt(
    content: &str,
    from_text: Option<&str>,
    to_text: Option<&str>,
) -> Result<String, ExcerptError> {
    let (start, end) = find_excerpt_bounds(content, from_text, to_text)?;
    Ok(content[start..end].trim().to_string())
}

/// Locate an anchor that must occur exactly once in the haystack
fn find_unique(haystack: &str, anchor: &str) -> Result<usize, ExcerptError> {
    let needle = anchor.to_ascii_lowercase();
    let mut matches = haystack.match_indices(&needle);

    let Some((first, _)) = matches.next() else {
        return Err(ExcerptError::AnchorNotFound(anchor.to_string()));
    };

    let extra = matches.count();
    if extra > 0 {
        return Err(ExcerptError::AnchorNotUnique {
            anchor: anchor.to_string(),
            count: extra + 1,
        });
    }

    Ok(first)
}
