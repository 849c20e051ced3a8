//! # coursewiki-core
//!
//! Core library for the coursewiki content pipeline.
//!
//! This crate turns raw module and course documents (a wiki-flavored
//! plain-text format with `# Type: Title` sections, `## Type` segments
//! and `key:: value` fields) into typed values, resolves anchor-based
//! article excerpts, and flattens learning-outcome/lens indirections
//! into a delivery-ready structure.

pub mod course;
pub mod error;
pub mod excerpt;
pub mod fields;
pub mod flatten;
pub mod frontmatter;
pub mod module;
pub mod section;
pub mod snapshot;
pub mod structure;
pub mod wikilink;

pub use course::{due_by_meeting, parse_course};
pub use error::{ExcerptError, FlattenError, LookupError, ParseError};
pub use excerpt::{find_excerpt_bounds, resolve_article_excerpt};
pub use flatten::{flatten_module, ContentLookup};
pub use frontmatter::parse_frontmatter;
pub use module::{parse_learning_outcome, parse_module};
pub use snapshot::ContentSnapshot;
pub use wikilink::resolve_link;
