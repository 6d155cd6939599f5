//! # heart-timeline
//!
//! Projects an annotation graph onto its resolved timeline: a nested,
//! deduplicated entity tree, one entry per time container, root anatomy and
//! a garbage bucket for whatever could not be placed.

pub mod embed;
pub mod engine;
pub mod output;

pub use embed::Embedder;
pub use engine::TimelineEngine;
pub use output::{
    AnatomyNode, ChangeNode, EmbeddedEntity, GarbageEntry, RegionNode, RelatedEntity, TimeEntry,
    TimelineDocument, Timespan,
};
