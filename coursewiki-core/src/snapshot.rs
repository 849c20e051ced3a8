//! In-memory content snapshot.
//!
//! A `ContentSnapshot` holds every parsed learning outcome and lens
//! plus raw article/transcript text, keyed by filename stem. It is an
//! immutable value: a content refresh builds a fresh snapshot and
//! swaps it in, so in-flight flatten calls always see a consistent
//! view.

use crate::error::{LookupError, ParseError};
use crate::flatten::ContentLookup;
use crate::frontmatter::parse_frontmatter;
use crate::module::{parse_learning_outcome, parse_module};
use coursewiki_types::{ContentCategory, LearningOutcomeDoc, ParsedModule};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse content file {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Immutable snapshot of all referenceable content
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    articles: HashMap<String, String>,
    transcripts: HashMap<String, String>,
    learning_outcomes: HashMap<String, LearningOutcomeDoc>,
    lenses: HashMap<String, ParsedModule>,
}

impl ContentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a content directory
    ///
    /// Walks the tree for `.md` files, classifies each by its path
    /// (the same category rules as wiki-links), and keys it by
    /// filename stem. Files outside the recognized category
    /// directories are skipped.
    pub fn load(root: &Path) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::new();

        for entry in WalkDir::new(root) {
            let entry = entry?;
            let is_markdown =
                entry.path().extension().and_then(|ext| ext.to_str()) == Some("md");
            if !entry.file_type().is_file() || !is_markdown {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .to_string();

            let Some(category) = ContentCategory::classify(&relative) else {
                debug!(path = %relative, "skipping file outside content categories");
                continue;
            };

            let text =
                std::fs::read_to_string(entry.path()).map_err(|source| SnapshotError::Read {
                    path: entry.path().to_path_buf(),
                    source,
                })?;

            let key = crate::wikilink::cache_key(&relative).to_string();
            snapshot.insert(category, key, &text).map_err(|source| {
                SnapshotError::Parse {
                    path: entry.path().to_path_buf(),
                    source,
                }
            })?;
        }

        debug!(
            articles = snapshot.articles.len(),
            transcripts = snapshot.transcripts.len(),
            learning_outcomes = snapshot.learning_outcomes.len(),
            lenses = snapshot.lenses.len(),
            "loaded content snapshot"
        );

        Ok(snapshot)
    }

    fn insert(
        &mut self,
        category: ContentCategory,
        key: String,
        text: &str,
    ) -> Result<(), ParseError> {
        if self.contains(category, &key) {
            warn!(key = %key, category = category.as_str(), "duplicate content key, keeping last");
        }

        match category {
            ContentCategory::Articles => {
                let (_, body) = parse_frontmatter(text);
                self.articles.insert(key, body.to_string());
            }
            ContentCategory::VideoTranscripts => {
                let (_, body) = parse_frontmatter(text);
                self.transcripts.insert(key, body.to_string());
            }
            ContentCategory::LearningOutcomes => {
                self.learning_outcomes
                    .insert(key, parse_learning_outcome(text)?);
            }
            ContentCategory::Lenses => {
                self.lenses.insert(key, parse_module(text)?);
            }
        }

        Ok(())
    }

    fn contains(&self, category: ContentCategory, key: &str) -> bool {
        match category {
            ContentCategory::Articles => self.articles.contains_key(key),
            ContentCategory::VideoTranscripts => self.transcripts.contains_key(key),
            ContentCategory::LearningOutcomes => self.learning_outcomes.contains_key(key),
            ContentCategory::Lenses => self.lenses.contains_key(key),
        }
    }

    /// Raw article body (frontmatter removed) for excerpt resolution
    pub fn article(&self, key: &str) -> Result<&str, LookupError> {
        self.articles
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LookupError::ArticleNotFound(key.to_string()))
    }

    /// Raw video transcript body (frontmatter removed)
    pub fn transcript(&self, key: &str) -> Result<&str, LookupError> {
        self.transcripts
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LookupError::TranscriptNotFound(key.to_string()))
    }

    // Fixture-building inserts, used by tests and batch tooling.

    pub fn with_article(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.articles.insert(key.into(), body.into());
        self
    }

    pub fn with_transcript(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.transcripts.insert(key.into(), body.into());
        self
    }

    pub fn with_learning_outcome(mut self, key: impl Into<String>, doc: LearningOutcomeDoc) -> Self {
        self.learning_outcomes.insert(key.into(), doc);
        self
    }

    pub fn with_lens(mut self, key: impl Into<String>, lens: ParsedModule) -> Self {
        self.lenses.insert(key.into(), lens);
        self
    }
}

impl ContentLookup for ContentSnapshot {
    fn learning_outcome(&self, key: &str) -> Result<&LearningOutcomeDoc, LookupError> {
        self.learning_outcomes
            .get(key)
            .ok_or_else(|| LookupError::LearningOutcomeNotFound(key.to_string()))
    }

    fn lens(&self, key: &str) -> Result<&ParsedModule, LookupError> {
        self.lenses
            .get(key)
            .ok_or_else(|| LookupError::LensNotFound(key.to_string()))
    }
}
