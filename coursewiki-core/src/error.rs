//! Error types for parsing, excerpt resolution, and flattening.
//!
//! Authoring and reference errors are always propagated; whether to
//! skip-and-report (batch ingestion) or fail a whole request
//! (single-document delivery) is the caller's decision.

use thiserror::Error;

/// Errors raised while parsing a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Top-level type token not recognized; a hard error so authoring
    /// typos surface at parse time, not at delivery time.
    #[error("Unknown section type: {0}")]
    UnknownSectionType(String),

    #[error("Unknown segment type: {0}")]
    UnknownSegmentType(String),

    /// Wiki-link path matched none of the recognized content
    /// categories.
    #[error("Unrecognized content path: {0}")]
    UnrecognizedContentPath(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors raised while resolving excerpt anchor phrases
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExcerptError {
    /// The anchor phrase does not occur in the content. Usually a
    /// typo in the authored phrase.
    #[error("Anchor not found: {0:?}")]
    AnchorNotFound(String),

    /// The anchor phrase occurs more than once; authors must pick a
    /// more specific phrase.
    #[error("Anchor not unique ({count} matches): {anchor:?}")]
    AnchorNotUnique { anchor: String, count: usize },
}

/// Lookup misses against the injected content snapshot
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Learning outcome not found: {0}")]
    LearningOutcomeNotFound(String),

    #[error("Lens not found: {0}")]
    LensNotFound(String),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Video transcript not found: {0}")]
    TranscriptNotFound(String),
}

/// Errors raised while flattening a module
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlattenError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A lens must resolve to exactly one content section (video or
    /// article).
    #[error("Lens {key:?} must contain exactly one content section, found {count}")]
    LensCardinality { key: String, count: usize },

    /// The module contains a section kind with no flattened
    /// representation. Surfaced explicitly rather than skipped.
    #[error("Section kind {0:?} has no flattened representation")]
    UnsupportedSection(&'static str),
}
