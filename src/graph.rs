//! Concept graph
//!
//! The node/edge structure handed to downstream consumers (querying,
//! visualization export, persistence serialization). The graph exclusively
//! owns its node and edge collections and enforces referential integrity:
//! an edge can only be inserted while both endpoints exist, and removing a
//! node removes every incident edge in the same operation.
//!
//! Mutating operations are not internally synchronized; callers mutating
//! one graph from multiple threads must serialize access themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::{CoreError, Result};

/// Fixed namespace for name-derived ids. Ids are UUID v5 over this
/// namespace, so repeated builds from the same concept set produce the
/// same node and edge identities.
pub const ID_NAMESPACE: Uuid = Uuid::from_u128(0x6e1f_72d4_9c3b_4a8e_b52a_1d07_44c9_8f31);

/// Node category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Plain concept (noun phrase)
    Concept,
    /// Named entity
    Entity,
    /// Caller-defined category
    Other(String),
}

/// Edge category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Context-overlap relation between concepts
    Related,
    /// Caller-defined category
    Other(String),
}

/// 2D position for visualization layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f32,
    pub y: f32,
}

/// Recognized node payload fields. A typed structure rather than an open
/// key/value map, so the compatibility surface is enumerable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    /// Relative importance in [0, 1]
    pub importance: Option<f64>,

    /// Raw mention count behind the importance
    pub mention_count: Option<usize>,

    /// Sentences the concept occurred in, occurrence order
    pub context: Vec<String>,

    /// Labels of related nodes
    pub related: Vec<String>,
}

/// Recognized edge payload fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeProperties {
    /// Relation strength in (0, 1]
    pub strength: Option<f64>,
}

/// Node presentation defaults; callers may overwrite freely
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub color: Option<String>,
    pub size: Option<f32>,
    pub shape: Option<String>,
}

/// Edge presentation defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub color: Option<String>,
    pub thickness: Option<f32>,
}

/// A node in the concept graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier, stable across the graph's lifetime
    pub id: Uuid,
    pub label: String,
    pub kind: NodeKind,
    pub properties: NodeProperties,
    pub position: Position2D,
    pub style: NodeStyle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Create a node with an id derived from its label
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        let label = label.into();
        let now = Utc::now();
        Self {
            id: node_id(&label),
            label,
            kind,
            properties: NodeProperties::default(),
            position: Position2D::default(),
            style: NodeStyle::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: Uuid,
    /// Source node id; must exist in the graph at insertion time
    pub source: Uuid,
    /// Target node id; must exist in the graph at insertion time
    pub target: Uuid,
    pub label: Option<String>,
    pub kind: EdgeKind,
    pub properties: EdgeProperties,
    pub style: EdgeStyle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    /// Create an edge between two labeled endpoints with an id derived
    /// from the unordered label pair
    pub fn between(source_label: &str, target_label: &str, kind: EdgeKind) -> Self {
        let now = Utc::now();
        Self {
            id: edge_id(source_label, target_label),
            source: node_id(source_label),
            target: node_id(target_label),
            label: None,
            kind,
            properties: EdgeProperties::default(),
            style: EdgeStyle::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Derive the stable node id for a label
pub fn node_id(label: &str) -> Uuid {
    Uuid::new_v5(&ID_NAMESPACE, label.as_bytes())
}

/// Derive the stable edge id for an unordered label pair
pub fn edge_id(a: &str, b: &str) -> Uuid {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Uuid::new_v5(&ID_NAMESPACE, format!("{lo}|{hi}").as_bytes())
}

/// Graph statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Sum of all edge strengths
    pub total_strength: f64,
}

/// Mutable, referentially consistent node/edge container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptGraph {
    nodes: HashMap<Uuid, Node>,
    edges: HashMap<Uuid, Edge>,

    /// Insertion order, for deterministic iteration and export
    node_order: Vec<Uuid>,
    edge_order: Vec<Uuid>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            node_order: Vec::new(),
            edge_order: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add or replace a node. Replacing keeps the original creation time
    /// and insertion position; everything else is taken from `node`.
    pub fn add_node(&mut self, mut node: Node) -> Uuid {
        let now = Utc::now();
        node.updated_at = now;

        if let Some(existing) = self.nodes.get(&node.id) {
            node.created_at = existing.created_at;
        } else {
            self.node_order.push(node.id);
        }

        let id = node.id;
        self.nodes.insert(id, node);
        self.updated_at = now;
        id
    }

    /// Add or replace an edge.
    ///
    /// Both endpoints must already exist; otherwise this fails with
    /// [`CoreError::ReferentialIntegrity`] and the edge collection is left
    /// unchanged. Dangling edges are never silently dropped or auto-created.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<Uuid> {
        for endpoint in [edge.source, edge.target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(CoreError::ReferentialIntegrity {
                    edge: edge
                        .label
                        .clone()
                        .unwrap_or_else(|| edge.id.to_string()),
                    missing: endpoint.to_string(),
                });
            }
        }

        let now = Utc::now();
        edge.updated_at = now;

        if let Some(existing) = self.edges.get(&edge.id) {
            edge.created_at = existing.created_at;
        } else {
            self.edge_order.push(edge.id);
        }

        let id = edge.id;
        self.edges.insert(id, edge);
        self.updated_at = now;
        Ok(id)
    }

    /// Remove a node, cascading to every edge that touches it.
    ///
    /// Returns the removed node, or `None` if the id was absent.
    pub fn remove_node(&mut self, id: Uuid) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.node_order.retain(|n| *n != id);

        let incident: Vec<Uuid> = self
            .edges
            .values()
            .filter(|e| e.source == id || e.target == id)
            .map(|e| e.id)
            .collect();
        for edge_id in &incident {
            self.edges.remove(edge_id);
        }
        self.edge_order.retain(|e| !incident.contains(e));

        self.updated_at = Utc::now();
        tracing::debug!(node = %node.label, cascaded_edges = incident.len(), "removed node");
        Some(node)
    }

    /// Remove a single edge. Returns the removed edge if it existed.
    pub fn remove_edge(&mut self, id: Uuid) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        self.edge_order.retain(|e| *e != id);
        self.updated_at = Utc::now();
        Some(edge)
    }

    /// Drop all nodes and edges
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_order.clear();
        self.edge_order.clear();
        self.updated_at = Utc::now();
    }

    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: Uuid) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Find a node by label, case-insensitively
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        let lower = label.to_lowercase();
        self.iter_nodes().find(|n| n.label.to_lowercase() == lower)
    }

    /// Nodes adjacent to `id` via any edge
    pub fn neighbors(&self, id: Uuid) -> Vec<&Node> {
        self.iter_edges()
            .filter_map(|e| {
                if e.source == id {
                    self.nodes.get(&e.target)
                } else if e.target == id {
                    self.nodes.get(&e.source)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Edges connecting `a` and `b` in either direction
    pub fn edges_between(&self, a: Uuid, b: Uuid) -> Vec<&Edge> {
        self.iter_edges()
            .filter(|e| {
                (e.source == a && e.target == b) || (e.source == b && e.target == a)
            })
            .collect()
    }

    /// Nodes in insertion order
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in insertion order
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            total_strength: self
                .edges
                .values()
                .filter_map(|e| e.properties.strength)
                .sum(),
        }
    }

    /// Serialize the full graph for the persistence/visualization layers
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::Internal(anyhow::anyhow!("graph serialization: {e}")))
    }
}

impl Default for ConceptGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: &str) -> Node {
        Node::new(label, NodeKind::Concept)
    }

    fn edge(a: &str, b: &str) -> Edge {
        Edge::between(a, b, EdgeKind::Related)
    }

    #[test]
    fn test_ids_are_stable() {
        assert_eq!(node_id("socrates"), node_id("socrates"));
        assert_ne!(node_id("socrates"), node_id("plato"));
        // Edge ids ignore endpoint order
        assert_eq!(edge_id("a", "b"), edge_id("b", "a"));
    }

    #[test]
    fn test_add_and_lookup() {
        let mut graph = ConceptGraph::new();
        let id = graph.add_node(node("logic"));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node(id).unwrap().label, "logic");
        assert!(graph.node_by_label("LOGIC").is_some());
    }

    #[test]
    fn test_edge_requires_both_endpoints() {
        let mut graph = ConceptGraph::new();
        graph.add_node(node("a"));

        let err = graph.add_edge(edge("a", "missing")).unwrap_err();
        assert_eq!(err.code(), "REFERENTIAL_INTEGRITY");
        // Edge collection unchanged by the rejected insertion
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = ConceptGraph::new();
        let a = graph.add_node(node("a"));
        graph.add_node(node("b"));
        graph.add_node(node("c"));
        graph.add_edge(edge("a", "b")).unwrap();
        graph.add_edge(edge("a", "c")).unwrap();
        graph.add_edge(edge("b", "c")).unwrap();

        graph.remove_node(a);

        assert_eq!(graph.node_count(), 2);
        // Only the b-c edge survives
        assert_eq!(graph.edge_count(), 1);
        let survivor = graph.iter_edges().next().unwrap();
        assert_eq!(survivor.id, edge_id("b", "c"));
    }

    #[test]
    fn test_replacing_node_keeps_created_at_and_order() {
        let mut graph = ConceptGraph::new();
        graph.add_node(node("a"));
        graph.add_node(node("b"));
        let created = graph.node_by_label("a").unwrap().created_at;

        let mut replacement = node("a");
        replacement.properties.importance = Some(0.5);
        graph.add_node(replacement);

        assert_eq!(graph.node_count(), 2);
        let a = graph.node_by_label("a").unwrap();
        assert_eq!(a.created_at, created);
        assert_eq!(a.properties.importance, Some(0.5));
        // Still first in insertion order
        assert_eq!(graph.iter_nodes().next().unwrap().label, "a");
    }

    #[test]
    fn test_neighbors_and_edges_between() {
        let mut graph = ConceptGraph::new();
        let a = graph.add_node(node("a"));
        let b = graph.add_node(node("b"));
        graph.add_node(node("c"));
        graph.add_edge(edge("a", "b")).unwrap();

        let neighbor_labels: Vec<&str> =
            graph.neighbors(a).iter().map(|n| n.label.as_str()).collect();
        assert_eq!(neighbor_labels, vec!["b"]);

        assert_eq!(graph.edges_between(a, b).len(), 1);
        assert_eq!(graph.edges_between(b, a).len(), 1);
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = ConceptGraph::new();
        graph.add_node(node("a"));
        graph.add_node(node("b"));
        let id = graph.add_edge(edge("a", "b")).unwrap();

        assert!(graph.remove_edge(id).is_some());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.remove_edge(id).is_none());
    }

    #[test]
    fn test_mutations_touch_updated_at() {
        let mut graph = ConceptGraph::new();
        let before = graph.updated_at();
        graph.add_node(node("a"));
        assert!(graph.updated_at() >= before);
    }

    #[test]
    fn test_stats() {
        let mut graph = ConceptGraph::new();
        graph.add_node(node("a"));
        graph.add_node(node("b"));
        let mut e = edge("a", "b");
        e.properties.strength = Some(0.5);
        graph.add_edge(e).unwrap();

        let stats = graph.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.edge_count, 1);
        assert!((stats.total_strength - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut graph = ConceptGraph::new();
        graph.add_node(node("a"));
        graph.add_node(node("b"));
        graph.add_edge(edge("a", "b")).unwrap();

        let json = graph.to_json().unwrap();
        let restored: ConceptGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.node_count(), 2);
        assert_eq!(restored.edge_count(), 1);
        assert!(restored.node_by_label("a").is_some());
    }
}
