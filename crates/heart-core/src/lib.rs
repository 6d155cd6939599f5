//! # heart-core
//!
//! Shared foundation for clinical timeline reconstruction: the annotation
//! graph model, error types, configuration, dependency ordering, and the
//! traits implemented by external collaborators.

pub mod config;
pub mod dag;
pub mod errors;
pub mod graph;
pub mod models;
pub mod traits;

pub use errors::{HeartError, HeartResult};
pub use graph::{AnnotationGraph, NodeRef};
