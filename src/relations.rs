//! Relation analysis
//!
//! Scores pairwise relation strength between concepts as the Jaccard
//! overlap of their context-sentence sets. O(n²) over the concept list,
//! which is fine at per-document concept counts (tens, not millions).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::concepts::Concept;

/// A weighted, undirected association between two concepts
///
/// The pair is unordered; each pair appears at most once, with `concept_a`
/// preceding `concept_b` in the input concept order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub concept_a: String,
    pub concept_b: String,

    /// Jaccard overlap of the two context-sentence sets, in (0, 1]
    pub strength: f64,
}

/// Computes context-overlap relations between extracted concepts
#[derive(Debug, Clone, Default)]
pub struct RelationAnalyzer;

impl RelationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze all unordered concept pairs and keep those with overlap.
    ///
    /// Pairs with disjoint context sets are dropped, not emitted with
    /// strength zero. Pairs where both concepts have no context at all are
    /// skipped. Never fails for well-formed concepts.
    pub fn analyze(&self, concepts: &[Concept]) -> Vec<Relation> {
        let contexts: Vec<HashSet<&str>> = concepts
            .iter()
            .map(|c| c.context.iter().map(String::as_str).collect())
            .collect();

        let mut relations = Vec::new();

        for i in 0..concepts.len() {
            for j in (i + 1)..concepts.len() {
                let intersection = contexts[i].intersection(&contexts[j]).count();
                let union = contexts[i].union(&contexts[j]).count();

                // Both context sets empty: degenerate pair, skip
                if union == 0 {
                    continue;
                }

                if intersection > 0 {
                    relations.push(Relation {
                        concept_a: concepts[i].name.clone(),
                        concept_b: concepts[j].name.clone(),
                        strength: intersection as f64 / union as f64,
                    });
                }
            }
        }

        tracing::debug!(
            concepts = concepts.len(),
            relations = relations.len(),
            "analyzed relations"
        );

        relations
    }

    /// Back-fill each concept's `related_concepts` set from analyzer output.
    ///
    /// Extraction leaves the sets empty; this applies the relations both
    /// ways since the pairs are undirected.
    pub fn apply_related(concepts: &mut [Concept], relations: &[Relation]) {
        for relation in relations {
            for concept in concepts.iter_mut() {
                if concept.name == relation.concept_a {
                    concept.related_concepts.insert(relation.concept_b.clone());
                } else if concept.name == relation.concept_b {
                    concept.related_concepts.insert(relation.concept_a.clone());
                }
            }
        }
    }
}
