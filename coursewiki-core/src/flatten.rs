//! Module flattening: resolving learning-outcome and lens
//! indirections into a delivery-ready structure.
//!
//! Flattening is fail-fast: a dangling reference or a malformed lens
//! aborts the whole operation rather than producing partial output.

use crate::error::{FlattenError, LookupError};
use coursewiki_types::{
    FlatSection, FlattenedModule, LearningOutcomeDoc, ParsedModule, Section,
};

/// Content access capability consumed by the flattener
///
/// Decouples flattening from how content is stored: filesystem,
/// database cache, or in-memory test fixture. Implementations must
/// behave as an immutable snapshot for the duration of one flatten
/// call.
pub trait ContentLookup {
    fn learning_outcome(&self, key: &str) -> Result<&LearningOutcomeDoc, LookupError>;

    /// Lens documents share the module format; the lens's sections are
    /// its content.
    fn lens(&self, key: &str) -> Result<&ParsedModule, LookupError>;
}

/// Expand every indirection in a module, in section order
///
/// Page sections pass through unchanged. Learning-outcome references
/// expand to one flattened section per lens, tagged with the learning
/// outcome's id and with `optional` OR-ed across the reference chain.
/// Uncategorized sections expand the same way without a learning
/// outcome id. One input section may expand to several output
/// sections; relative order is always preserved.
pub fn flatten_module(
    module: &ParsedModule,
    lookup: &dyn ContentLookup,
) -> Result<FlattenedModule, FlattenError> {
    let mut sections = Vec::new();

    for section in &module.sections {
        match section {
            Section::Page {
                title,
                segments,
                optional,
                content_id,
            } => {
                sections.push(FlatSection::Page {
                    title: title.clone(),
                    content_id: content_id.map(|id| id.to_string()),
                    optional: *optional,
                    segments: segments.clone(),
                });
            }

            Section::LearningOutcome { source, optional } => {
                let outcome = lookup.learning_outcome(&source.key)?;
                let outcome_id = outcome.content_id.map(|id| id.to_string());

                for lens_ref in &outcome.lenses {
                    let lens = lookup.lens(&lens_ref.source.key)?;
                    sections.push(expand_lens(
                        lens,
                        *optional || lens_ref.optional,
                        outcome_id.clone(),
                    )?);
                }
            }

            Section::Uncategorized { lenses } => {
                for lens_ref in lenses {
                    let lens = lookup.lens(&lens_ref.source.key)?;
                    sections.push(expand_lens(lens, lens_ref.optional, None)?);
                }
            }

            // Inline section kinds have no flattened representation;
            // surfacing them beats silently shortening the module.
            Section::Video { .. }
            | Section::Article { .. }
            | Section::Text { .. }
            | Section::Chat(_) => {
                return Err(FlattenError::UnsupportedSection(section.kind()));
            }
        }
    }

    Ok(FlattenedModule {
        slug: module.slug.clone(),
        title: module.title.clone(),
        content_id: module.content_id.map(|id| id.to_string()),
        sections,
    })
}

/// Bundle a lens's single content section into delivery-ready form
///
/// A lens must contain exactly one content section (video or
/// article); anything else is an authoring error.
fn expand_lens(
    lens: &ParsedModule,
    optional: bool,
    learning_outcome_id: Option<String>,
) -> Result<FlatSection, FlattenError> {
    let mut content_sections = lens.sections.iter().filter(|section| {
        matches!(section, Section::Video { .. } | Section::Article { .. })
    });

    let (first, rest) = (content_sections.next(), content_sections.count());
    let section = match (first, rest) {
        (Some(section), 0) => section,
        (first, rest) => {
            return Err(FlattenError::LensCardinality {
                key: lens.slug.clone(),
                count: rest + usize::from(first.is_some()),
            });
        }
    };

    let content_id = lens.content_id.map(|id| id.to_string());

    Ok(match section {
        Section::Video {
            source, segments, ..
        } => FlatSection::LensVideo {
            source: source.clone(),
            segments: segments.clone(),
            content_id,
            learning_outcome_id,
            optional,
        },
        Section::Article {
            source, segments, ..
        } => FlatSection::LensArticle {
            source: source.clone(),
            segments: segments.clone(),
            content_id,
            learning_outcome_id,
            optional,
        },
        _ => unreachable!("filtered to content sections"),
    })
}
