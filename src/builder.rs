//! Graph assembly and the end-to-end pipeline
//!
//! Translates concepts and relations into a fresh [`ConceptGraph`] per
//! build call, and composes extraction -> analysis -> assembly behind
//! [`GraphBuilder::process`], the primary external entry point.

use crate::annotator::SpanKind;
use crate::concepts::{Concept, ConceptExtractor};
use crate::errors::Result;
use crate::graph::{
    ConceptGraph, Edge, EdgeKind, Node, NodeKind, Position2D,
};
use crate::relations::{Relation, RelationAnalyzer};

/// Golden angle in radians; spreads spiral positions evenly
const GOLDEN_ANGLE: f32 = 2.4;

/// Builds concept graphs, either from staged inputs or straight from text
///
/// Construct once at process start and pass by reference into request
/// handlers; builds share no mutable state, so concurrent calls are safe.
#[derive(Default)]
pub struct GraphBuilder {
    extractor: ConceptExtractor,
    analyzer: RelationAnalyzer,
}

impl GraphBuilder {
    pub fn new(extractor: ConceptExtractor, analyzer: RelationAnalyzer) -> Self {
        Self { extractor, analyzer }
    }

    /// Assemble a fresh graph: one node per concept, one edge per relation.
    ///
    /// Node ids derive from concept names, so repeated builds from the same
    /// inputs produce graphs with identical node and edge identities. A
    /// relation naming a concept absent from `concepts` fails with
    /// [`crate::CoreError::ReferentialIntegrity`]; the builder never creates
    /// dangling edges, even when called on inputs that did not come from
    /// this crate's extractor.
    pub fn build(&self, concepts: &[Concept], relations: &[Relation]) -> Result<ConceptGraph> {
        let mut graph = ConceptGraph::new();

        for (i, concept) in concepts.iter().enumerate() {
            let kind = match concept.kind {
                SpanKind::NamedEntity => NodeKind::Entity,
                SpanKind::NounPhrase => NodeKind::Concept,
            };

            let mut node = Node::new(concept.name.clone(), kind);
            node.properties.importance = Some(concept.importance);
            node.properties.mention_count = Some(concept.mention_count);
            node.properties.context = concept.context.clone();
            node.properties.related = concept.related_concepts.iter().cloned().collect();
            node.position = spiral_position(i, concept.importance);
            node.style.color = Some(node_color(&node.kind).to_string());
            node.style.size = Some(5.0 + concept.importance as f32 * 20.0);
            graph.add_node(node);
        }

        for relation in relations {
            let mut edge = Edge::between(
                &relation.concept_a,
                &relation.concept_b,
                EdgeKind::Related,
            );
            edge.label = Some(format!("{}-{}", relation.concept_a, relation.concept_b));
            edge.properties.strength = Some(relation.strength);
            edge.style.thickness = Some(1.0 + relation.strength as f32 * 4.0);
            graph.add_edge(edge)?;
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built concept graph"
        );

        Ok(graph)
    }

    /// Full pipeline: extract concepts, analyze relations, back-fill each
    /// concept's related set, and assemble the graph.
    ///
    /// Stage failures propagate unchanged; no error translation happens at
    /// this layer. Text with no extractable concepts yields an empty graph,
    /// not an error.
    pub fn process(&self, text: &str) -> Result<ConceptGraph> {
        let mut concepts = self.extractor.extract(text)?;
        let relations = self.analyzer.analyze(&concepts);
        RelationAnalyzer::apply_related(&mut concepts, &relations);

        tracing::info!(
            concepts = concepts.len(),
            relations = relations.len(),
            "processed text"
        );

        self.build(&concepts, &relations)
    }
}

/// Golden-angle spiral layout: more important concepts sit closer to the
/// origin. Purely a presentation default; callers may reposition nodes.
fn spiral_position(index: usize, importance: f64) -> Position2D {
    let angle = index as f32 * GOLDEN_ANGLE;
    let radius = (1.0 - importance as f32) * 100.0 + 10.0;
    Position2D {
        x: radius * angle.cos(),
        y: radius * angle.sin(),
    }
}

fn node_color(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Entity => "#4ECDC4",
        NodeKind::Concept => "#F7DC6F",
        NodeKind::Other(_) => "#AEB6BF",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::SpanKind;
    use std::collections::BTreeSet;

    fn concept(name: &str, importance: f64, context: &[&str]) -> Concept {
        Concept {
            name: name.to_string(),
            importance,
            context: context.iter().map(|s| s.to_string()).collect(),
            related_concepts: BTreeSet::new(),
            kind: SpanKind::NounPhrase,
            mention_count: context.len(),
        }
    }

    #[test]
    fn test_build_empty_inputs() {
        let graph = GraphBuilder::default().build(&[], &[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_build_translates_concepts_and_relations() {
        let concepts = vec![
            concept("socrates", 0.5, &["s1", "s3"]),
            concept("logic", 0.5, &["s2", "s3"]),
        ];
        let relations = vec![Relation {
            concept_a: "socrates".to_string(),
            concept_b: "logic".to_string(),
            strength: 1.0 / 3.0,
        }];

        let graph = GraphBuilder::default().build(&concepts, &relations).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let node = graph.node_by_label("socrates").unwrap();
        assert_eq!(node.properties.importance, Some(0.5));
        assert_eq!(node.properties.context, vec!["s1", "s3"]);

        let edge = graph.iter_edges().next().unwrap();
        assert!((edge.properties.strength.unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_build_rejects_unknown_relation_endpoint() {
        let concepts = vec![concept("socrates", 1.0, &["s1"])];
        let relations = vec![Relation {
            concept_a: "socrates".to_string(),
            concept_b: "ghost".to_string(),
            strength: 0.5,
        }];

        let err = GraphBuilder::default()
            .build(&concepts, &relations)
            .unwrap_err();
        assert_eq!(err.code(), "REFERENTIAL_INTEGRITY");
    }

    #[test]
    fn test_layout_favors_important_concepts() {
        let center = spiral_position(0, 1.0);
        let fringe = spiral_position(0, 0.0);
        let center_dist = (center.x * center.x + center.y * center.y).sqrt();
        let fringe_dist = (fringe.x * fringe.x + fringe.y * fringe.y).sqrt();
        assert!(center_dist < fringe_dist);
    }
}
