//! Data model shared by every pipeline stage.
//!
//! Entities are created once per run and never edited afterwards: scores
//! are attached by building new values, not by mutating sections.

mod collection;
mod excerpt;
mod heading;
mod record;
mod section;
mod span;

pub use collection::{
    ChallengeInfo, CollectionInput, CollectionOutput, DocumentError, DocumentRef,
    ExtractedSection, OutputMetadata, PersonaField, SubsectionAnalysis, TaskField,
};
pub use excerpt::Excerpt;
pub use heading::{document_title, DocumentOutline, HeadingCandidate, OutlineEntry};
pub use record::DocumentRecord;
pub use section::{ScoredSection, Section, SectionScores};
pub use span::{BoundingBox, RawSpan};
