//! Concept-Map Library
//!
//! Extracts salient concepts from free-form text, scores how strongly they
//! relate to one another, and assembles the result into a weighted graph
//! for downstream querying and visualization.
//!
//! # Pipeline
//! text -> [`annotator`] -> [`concepts`] -> [`relations`] -> [`graph`]
//!
//! The [`builder::GraphBuilder`] composes the stages; each stage is also
//! usable on its own for testing or alternate composition. Every call is
//! independent: a fresh concept set and a fresh graph per invocation, no
//! cross-call caching.

pub mod annotator;
pub mod builder;
pub mod concepts;
pub mod config;
pub mod errors;
pub mod graph;
pub mod relations;
pub mod tracing_setup;

pub use annotator::{Annotation, Annotator, RuleAnnotator, Span, SpanKind};
pub use builder::GraphBuilder;
pub use concepts::{Concept, ConceptExtractor};
pub use errors::{CoreError, Result};
pub use graph::{ConceptGraph, Edge, GraphStats, Node};
pub use relations::{Relation, RelationAnalyzer};

// Re-export dependencies so tests and downstream callers use the same version
pub use chrono;
pub use uuid;
