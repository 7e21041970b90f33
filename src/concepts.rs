//! Concept extraction
//!
//! Aggregates recurring spans into weighted [`Concept`] records. Importance
//! is the fraction of total mentions contributed by each concept, so the
//! importances of one extraction always sum to 1.0.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::annotator::{Annotator, RuleAnnotator, SpanKind};
use crate::errors::{CoreError, Result};

/// A concept extracted from text, weighted by relative frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Canonical lower-cased head form; the deduplication key
    pub name: String,

    /// Fraction of total mentions contributed by this concept, in [0, 1].
    /// Sums to 1.0 across one extraction.
    pub importance: f64,

    /// Sentences this concept occurred in, in occurrence order. A sentence
    /// appears twice if it yielded the same head twice.
    pub context: Vec<String>,

    /// Names of concepts this one is known to relate to. Left empty by
    /// extraction; filled from the relation analyzer's output.
    pub related_concepts: BTreeSet<String>,

    /// How the concept's spans were recognized. Entity wins over plain
    /// noun phrase when mentions disagree.
    pub kind: SpanKind,

    /// Raw mention count behind `importance`
    pub mention_count: usize,
}

/// Intermediate per-head accumulator, kept in first-occurrence order
struct ConceptAccum {
    name: String,
    count: usize,
    context: Vec<String>,
    kind: SpanKind,
}

/// Extracts weighted concepts from text via an [`Annotator`]
///
/// Construct once at process start and share by reference; the annotator is
/// read-only after construction, so concurrent `extract` calls are safe.
pub struct ConceptExtractor {
    annotator: Arc<dyn Annotator>,
}

impl ConceptExtractor {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self { annotator }
    }

    /// Extract concepts from text.
    ///
    /// Empty or whitespace-only text yields an empty list, not an error.
    /// Annotator failures surface as [`CoreError::Extraction`]; they are
    /// never collapsed into an empty result.
    pub fn extract(&self, text: &str) -> Result<Vec<Concept>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let annotation = self
            .annotator
            .annotate(text)
            .map_err(|e| CoreError::Extraction {
                reason: e.to_string(),
            })?;

        // Aggregate spans per canonical head, preserving first-occurrence
        // order for deterministic output
        let mut order: Vec<ConceptAccum> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for span in &annotation.spans {
            let sentence = match annotation.sentences.get(span.sentence) {
                Some(s) => s.clone(),
                None => continue,
            };

            match index.get(&span.head) {
                Some(&i) => {
                    let accum = &mut order[i];
                    accum.count += 1;
                    accum.context.push(sentence);
                    if span.kind == SpanKind::NamedEntity {
                        accum.kind = SpanKind::NamedEntity;
                    }
                }
                None => {
                    index.insert(span.head.clone(), order.len());
                    order.push(ConceptAccum {
                        name: span.head.clone(),
                        count: 1,
                        context: vec![sentence],
                        kind: span.kind,
                    });
                }
            }
        }

        let total_mentions: usize = order.iter().map(|a| a.count).sum();
        if total_mentions == 0 {
            return Ok(Vec::new());
        }

        let concepts: Vec<Concept> = order
            .into_iter()
            .map(|a| Concept {
                name: a.name,
                importance: a.count as f64 / total_mentions as f64,
                context: a.context,
                related_concepts: BTreeSet::new(),
                kind: a.kind,
                mention_count: a.count,
            })
            .collect();

        tracing::debug!(
            concepts = concepts.len(),
            mentions = total_mentions,
            "extracted concepts"
        );

        Ok(concepts)
    }
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::new(Arc::new(RuleAnnotator::default()))
    }
}
