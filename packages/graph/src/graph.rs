//! Directed reference graph between articles and recitals.
//!
//! Nodes are keyed by [`CanonicalId`]. Every reference row contributes one
//! fetched node and one edge per reference. References to the same target
//! collapse into a single edge that counts its occurrences. Targets that
//! were never fetched become placeholder nodes typed from their prefix.

use std::collections::HashMap;

use aiact_harvester::types::{CanonicalId, ItemType};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::expand::ReferenceRow;

/// Attributes of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: CanonicalId,

    pub node_type: ItemType,

    /// Page title, known only for fetched items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// False for placeholders created from a reference.
    pub fetched: bool,
}

impl NodeData {
    fn placeholder(id: CanonicalId) -> Self {
        Self {
            id,
            node_type: id.item_type(),
            title: None,
            fetched: false,
        }
    }
}

/// Attributes of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    /// How many references the edge stands for.
    pub occurrences: u32,
}

/// One edge in a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: CanonicalId,
    pub target: CanonicalId,
    pub occurrences: u32,
}

/// Order-independent, serializable form of a [`ReferenceGraph`].
///
/// Nodes are sorted by ID and edges by `(source, target)`, so equal graphs
/// always produce equal snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeRecord>,
}

/// Directed graph of references between items.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<NodeData, EdgeData>,
    index: HashMap<CanonicalId, NodeIndex>,
}

impl ReferenceGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fetched item, upgrading a placeholder with the same ID.
    pub fn add_item(&mut self, id: CanonicalId, title: impl Into<String>) -> NodeIndex {
        let index = self.ensure_node(id);
        let node = &mut self.graph[index];
        node.title = Some(title.into());
        node.fetched = true;
        index
    }

    fn ensure_node(&mut self, id: CanonicalId) -> NodeIndex {
        if let Some(&index) = self.index.get(&id) {
            return index;
        }
        let index = self.graph.add_node(NodeData::placeholder(id));
        self.index.insert(id, index);
        index
    }

    /// Record `occurrences` references from `source` to `target`.
    ///
    /// Missing endpoints are added as placeholders.
    pub fn add_reference(&mut self, source: CanonicalId, target: CanonicalId, occurrences: u32) {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        match self.graph.find_edge(from, to) {
            Some(edge) => self.graph[edge].occurrences += occurrences,
            None => {
                self.graph.add_edge(from, to, EdgeData { occurrences });
            }
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct `(source, target)` pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Total number of references across all edges.
    #[must_use]
    pub fn reference_count(&self) -> u64 {
        self.graph
            .edge_weights()
            .map(|edge| u64::from(edge.occurrences))
            .sum()
    }

    #[must_use]
    pub fn contains(&self, id: &CanonicalId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn node(&self, id: &CanonicalId) -> Option<&NodeData> {
        self.index.get(id).map(|&index| &self.graph[index])
    }

    /// Occurrence count of the edge `source -> target`, if present.
    #[must_use]
    pub fn edge_occurrences(&self, source: &CanonicalId, target: &CanonicalId) -> Option<u32> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge].occurrences)
    }

    /// Items `id` refers to, sorted.
    pub fn successors(&self, id: &CanonicalId) -> Result<Vec<CanonicalId>> {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Items that refer to `id`, sorted.
    pub fn predecessors(&self, id: &CanonicalId) -> Result<Vec<CanonicalId>> {
        self.adjacent(id, Direction::Incoming)
    }

    /// Neighbours in the directed sense: the items `id` refers to.
    pub fn neighbours(&self, id: &CanonicalId) -> Result<Vec<CanonicalId>> {
        self.successors(id)
    }

    fn adjacent(&self, id: &CanonicalId, direction: Direction) -> Result<Vec<CanonicalId>> {
        let index = self
            .index
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        let mut ids: Vec<_> = self
            .graph
            .neighbors_directed(*index, direction)
            .map(|neighbour| self.graph[neighbour].id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// All nodes in alphanumeric ID order.
    #[must_use]
    pub fn nodes_sorted(&self) -> Vec<&NodeData> {
        let mut nodes: Vec<_> = self.graph.node_weights().collect();
        nodes.sort_unstable_by_key(|node| node.id);
        nodes
    }

    /// All edges as `(source, target, occurrences)`, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(CanonicalId, CanonicalId, u32)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].id,
                    self.graph[edge.target()].id,
                    edge.weight().occurrences,
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    #[must_use]
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes_sorted().into_iter().cloned().collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|(source, target, occurrences)| EdgeRecord {
                    source,
                    target,
                    occurrences,
                })
                .collect(),
        }
    }

    /// Rebuild a graph from its snapshot.
    ///
    /// Edge endpoints missing from the node list become placeholders.
    #[must_use]
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        for node in snapshot.nodes {
            let index = graph.ensure_node(node.id);
            graph.graph[index] = node;
        }
        for edge in snapshot.edges {
            graph.add_reference(edge.source, edge.target, edge.occurrences);
        }
        graph
    }
}

impl PartialEq for ReferenceGraph {
    fn eq(&self, other: &Self) -> bool {
        self.to_snapshot() == other.to_snapshot()
    }
}

impl Eq for ReferenceGraph {}

/// Build the graph from expanded rows.
///
/// All row nodes are added first so that a row referenced before its own
/// line still ends up as a fetched node.
#[must_use]
pub fn build_graph(rows: &[ReferenceRow]) -> ReferenceGraph {
    let mut graph = ReferenceGraph::new();

    for row in rows {
        graph.add_item(row.id, row.title.clone());
    }
    for row in rows {
        for reference in &row.references {
            graph.add_reference(row.id, reference.target, 1);
        }
    }

    let placeholders = graph
        .graph
        .node_weights()
        .filter(|node| !node.fetched)
        .count();
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        placeholders,
        "Built reference graph"
    );
    graph
}
