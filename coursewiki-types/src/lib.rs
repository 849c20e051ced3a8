//! Shared types for coursewiki
//!
//! This crate provides the content model used across the coursewiki
//! ecosystem: parsed modules and courses, their sections and segments,
//! and the flattened delivery-ready representation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of content a wiki-link path points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    LearningOutcomes,
    Lenses,
    VideoTranscripts,
    Articles,
}

impl ContentCategory {
    /// Classify a content path by substring, checked in priority order.
    ///
    /// Returns `None` when the path matches no recognized category.
    pub fn classify(path: &str) -> Option<Self> {
        let lower = path.to_lowercase();
        if lower.contains("learning outcomes") || lower.contains("learning_outcomes") {
            Some(ContentCategory::LearningOutcomes)
        } else if lower.contains("lenses") {
            Some(ContentCategory::Lenses)
        } else if lower.contains("video_transcripts") {
            Some(ContentCategory::VideoTranscripts)
        } else if lower.contains("articles") {
            Some(ContentCategory::Articles)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::LearningOutcomes => "learning_outcomes",
            ContentCategory::Lenses => "lenses",
            ContentCategory::VideoTranscripts => "video_transcripts",
            ContentCategory::Articles => "articles",
        }
    }
}

/// A resolved wiki-link target: content category plus cache lookup key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    pub category: ContentCategory,

    /// Final path segment with any `.md` suffix stripped
    pub key: String,
}

impl ContentRef {
    pub fn new(category: ContentCategory, key: impl Into<String>) -> Self {
        Self {
            category,
            key: key.into(),
        }
    }
}

/// Chat block shared by chat sections and chat segments
///
/// The two visibility flags are independent: one controls whether the
/// preceding content is shown to the end user in the UI, the other
/// whether it is injected into the tutoring LLM's context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBlock {
    pub instructions: String,

    #[serde(default)]
    pub hide_previous_content_from_user: bool,

    #[serde(default)]
    pub hide_previous_content_from_tutor: bool,
}

/// A content block nested inside a video/article/page section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Segment {
    Text {
        content: String,
    },

    Chat(ChatBlock),

    /// Timecode span into the parent video; `to_time` of `None` means
    /// "to end of video".
    VideoExcerpt {
        from_time: Option<String>,
        to_time: Option<String>,
    },

    /// Anchor-phrase span into the parent article; `None` means
    /// "from start" / "to end" respectively.
    ArticleExcerpt {
        from_text: Option<String>,
        to_text: Option<String>,
    },
}

/// A reference to a lens document, with its own optionality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensRef {
    pub source: ContentRef,

    #[serde(default)]
    pub optional: bool,
}

/// A top-level content block within a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Section {
    Video {
        source: ContentRef,
        segments: Vec<Segment>,
        optional: bool,
        content_id: Option<Uuid>,
    },

    Article {
        source: ContentRef,
        segments: Vec<Segment>,
        optional: bool,
        content_id: Option<Uuid>,
    },

    Text {
        content: String,
    },

    Chat(ChatBlock),

    /// Directly deliverable titled block; passes through flattening
    /// unchanged.
    Page {
        title: String,
        segments: Vec<Segment>,
        optional: bool,
        content_id: Option<Uuid>,
    },

    /// Indirection: expanded into lens content by the flattener.
    LearningOutcome {
        source: ContentRef,
        optional: bool,
    },

    /// Indirection: lens references with no owning learning outcome.
    Uncategorized {
        lenses: Vec<LensRef>,
    },
}

impl Section {
    /// Stable lowercase name of the section kind, matching the source
    /// document's type token.
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Video { .. } => "video",
            Section::Article { .. } => "article",
            Section::Text { .. } => "text",
            Section::Chat(_) => "chat",
            Section::Page { .. } => "page",
            Section::LearningOutcome { .. } => "learning-outcome",
            Section::Uncategorized { .. } => "uncategorized",
        }
    }
}

/// A fully parsed module document
///
/// `content_id` is the stable progress-tracking identifier; `None`
/// means the module is untracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedModule {
    pub slug: String,
    pub title: String,
    pub content_id: Option<Uuid>,
    pub sections: Vec<Section>,
}

/// A parsed learning-outcome document: an ordered list of lens refs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningOutcomeDoc {
    pub slug: String,
    pub title: String,
    pub content_id: Option<Uuid>,
    pub lenses: Vec<LensRef>,
}

/// A module reference within a course progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRef {
    /// Raw link target, e.g. `modules/intro-to-sorting`
    pub path: String,

    #[serde(default)]
    pub optional: bool,
}

/// An ordered entry in a course progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ProgressionItem {
    Module(ModuleRef),

    /// Cohort meeting boundary. Numbers need not be contiguous;
    /// progression order is what defines "due by meeting N".
    Meeting { number: u32 },
}

/// A fully parsed course document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub slug: String,
    pub title: String,
    pub progression: Vec<ProgressionItem>,
}

/// A delivery-ready section produced by flattening
///
/// All indirections are resolved; `content_id` on lens variants is the
/// lens's own stable id and `learning_outcome_id` is the id of the
/// learning outcome the lens was expanded from (`None` when it came
/// from an uncategorized section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum FlatSection {
    Page {
        title: String,
        content_id: Option<String>,
        optional: bool,
        segments: Vec<Segment>,
    },

    LensVideo {
        source: ContentRef,
        segments: Vec<Segment>,
        content_id: Option<String>,
        learning_outcome_id: Option<String>,
        optional: bool,
    },

    LensArticle {
        source: ContentRef,
        segments: Vec<Segment>,
        content_id: Option<String>,
        learning_outcome_id: Option<String>,
        optional: bool,
    },
}

/// A module with every indirection expanded, ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedModule {
    pub slug: String,
    pub title: String,
    pub content_id: Option<String>,
    pub sections: Vec<FlatSection>,
}
