//! In-memory hierarchy graph storage
//!
//! Nodes live in an insertion-ordered map keyed by [`NodeKey`], so every node
//! also has a stable dense index. Adjacency is kept per index in both
//! directions; each list is a set, which makes edge insertion idempotent.

use super::node::NodeAttrs;
use super::types::NodeKey;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::collections::BTreeMap;
use thiserror::Error;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(String),

    #[error("Graph is empty: no root node")]
    EmptyGraph,

    #[error("No unique root: {} nodes have in-degree 0 ({})", .0.len(), .0.join(", "))]
    AmbiguousRoot(Vec<String>),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Directed graph with string-keyed, level-attributed nodes
#[derive(Debug, Clone, Default)]
pub struct HierGraph {
    /// Node attributes in insertion order
    nodes: FxIndexMap<NodeKey, NodeAttrs>,

    /// Outgoing adjacency by node index
    outgoing: Vec<FxIndexSet<usize>>,

    /// Incoming adjacency by node index
    incoming: Vec<FxIndexSet<usize>>,

    edge_count: usize,
}

impl HierGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or merge `attrs` into an existing node with the same key.
    ///
    /// Returns the node's dense index.
    pub fn add_node(&mut self, key: impl Into<NodeKey>, attrs: NodeAttrs) -> usize {
        let key = key.into();
        if let Some((idx, _, existing)) = self.nodes.get_full_mut(&key) {
            existing.merge(attrs);
            return idx;
        }
        self.push_node(key, attrs)
    }

    /// Add a directed edge, creating attribute-less endpoints as needed.
    ///
    /// Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, source: impl Into<NodeKey>, target: impl Into<NodeKey>) -> bool {
        let source = self.ensure_node(source.into());
        let target = self.ensure_node(target.into());
        self.add_edge_by_index(source, target)
    }

    pub(crate) fn add_edge_by_index(&mut self, source: usize, target: usize) -> bool {
        if !self.outgoing[source].insert(target) {
            return false;
        }
        self.incoming[target].insert(source);
        self.edge_count += 1;
        true
    }

    fn ensure_node(&mut self, key: NodeKey) -> usize {
        match self.nodes.get_index_of(&key) {
            Some(idx) => idx,
            None => self.push_node(key, NodeAttrs::stub()),
        }
    }

    fn push_node(&mut self, key: NodeKey, attrs: NodeAttrs) -> usize {
        let (idx, _) = self.nodes.insert_full(key, attrs);
        self.outgoing.push(FxIndexSet::default());
        self.incoming.push(FxIndexSet::default());
        idx
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Attributes of a node
    pub fn node(&self, key: &str) -> Option<&NodeAttrs> {
        self.nodes.get(key)
    }

    /// Dense index of a node
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.nodes.get_index_of(key)
    }

    /// Key of the node at a dense index
    pub fn key_at(&self, idx: usize) -> Option<&NodeKey> {
        self.nodes.get_index(idx).map(|(key, _)| key)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeKey, &NodeAttrs)> + '_ {
        self.nodes.iter()
    }

    /// All edges, grouped by source in node insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey)> + '_ {
        self.outgoing.iter().enumerate().flat_map(move |(u, targets)| {
            targets.iter().map(move |&v| (self.key_unchecked(u), self.key_unchecked(v)))
        })
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.index_of(source), self.index_of(target)) {
            (Some(u), Some(v)) => self.outgoing[u].contains(&v),
            _ => false,
        }
    }

    /// Successors of a node in edge insertion order
    pub fn successors(&self, key: &str) -> GraphResult<Vec<&NodeKey>> {
        let idx = self.require(key)?;
        Ok(self.outgoing[idx].iter().map(|&v| self.key_unchecked(v)).collect())
    }

    /// Predecessors of a node in edge insertion order
    pub fn predecessors(&self, key: &str) -> GraphResult<Vec<&NodeKey>> {
        let idx = self.require(key)?;
        Ok(self.incoming[idx].iter().map(|&u| self.key_unchecked(u)).collect())
    }

    pub fn in_degree(&self, key: &str) -> Option<usize> {
        self.index_of(key).map(|idx| self.incoming[idx].len())
    }

    pub fn out_degree(&self, key: &str) -> Option<usize> {
        self.index_of(key).map(|idx| self.outgoing[idx].len())
    }

    /// Outgoing neighbor indices of the node at `idx`
    pub fn successor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing[idx].iter().copied()
    }

    /// Highest level present, undeclared nodes counting as level 0
    pub fn max_level(&self) -> Option<u32> {
        self.nodes.values().map(NodeAttrs::effective_level).max()
    }

    /// Nodes whose effective level equals `level`, in insertion order
    pub fn nodes_at_level(&self, level: u32) -> Vec<&NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, attrs)| attrs.effective_level() == level)
            .map(|(key, _)| key)
            .collect()
    }

    /// Dense indices of the nodes whose effective level equals `level`
    pub fn node_indices_at_level(&self, level: u32) -> Vec<usize> {
        self.nodes
            .values()
            .enumerate()
            .filter(|(_, attrs)| attrs.effective_level() == level)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Node count per effective level
    pub fn level_histogram(&self) -> BTreeMap<u32, usize> {
        let mut histogram = BTreeMap::new();
        for attrs in self.nodes.values() {
            *histogram.entry(attrs.effective_level()).or_insert(0) += 1;
        }
        histogram
    }

    /// The unique node with in-degree zero.
    ///
    /// Fails with [`GraphError::EmptyGraph`] when there is no such node and
    /// [`GraphError::AmbiguousRoot`] when there are several.
    pub fn find_root(&self) -> GraphResult<&NodeKey> {
        self.find_root_index().map(|idx| self.key_unchecked(idx))
    }

    /// Dense index of the unique in-degree-zero node
    pub fn find_root_index(&self) -> GraphResult<usize> {
        let mut roots = self
            .incoming
            .iter()
            .enumerate()
            .filter(|(_, sources)| sources.is_empty())
            .map(|(idx, _)| idx);

        match (roots.next(), roots.next()) {
            (None, _) => Err(GraphError::EmptyGraph),
            (Some(root), None) => Ok(root),
            (Some(first), Some(second)) => {
                let candidates = [first, second]
                    .into_iter()
                    .chain(roots)
                    .map(|idx| self.key_unchecked(idx).to_string())
                    .collect();
                Err(GraphError::AmbiguousRoot(candidates))
            }
        }
    }

    /// Subgraph induced by `keys`; unknown keys are ignored.
    ///
    /// Nodes keep their attributes and the relative order of `self`.
    pub fn subgraph<'a>(&self, keys: impl IntoIterator<Item = &'a NodeKey>) -> HierGraph {
        let mut members: Vec<usize> = keys
            .into_iter()
            .filter_map(|key| self.index_of(key.as_str()))
            .collect();
        members.sort_unstable();
        members.dedup();

        let mut sub = HierGraph::new();
        for &idx in &members {
            if let Some((key, attrs)) = self.nodes.get_index(idx) {
                sub.add_node(key.clone(), attrs.clone());
            }
        }
        for &u in &members {
            for &v in &self.outgoing[u] {
                if members.binary_search(&v).is_ok() {
                    sub.add_edge(self.key_unchecked(u).clone(), self.key_unchecked(v).clone());
                }
            }
        }
        sub
    }

    fn require(&self, key: &str) -> GraphResult<usize> {
        self.index_of(key).ok_or_else(|| GraphError::NodeNotFound(key.to_string()))
    }

    fn key_unchecked(&self, idx: usize) -> &NodeKey {
        self.nodes
            .get_index(idx)
            .map(|(key, _)| key)
            .expect("adjacency only holds indices of stored nodes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> HierGraph {
        let mut graph = HierGraph::new();
        graph.add_node("BG", NodeAttrs::at_level(0));
        graph.add_node("PF1", NodeAttrs::at_level(1));
        graph.add_node("PF2", NodeAttrs::at_level(1));
        graph.add_edge("BG", "PF1");
        graph.add_edge("BG", "PF2");
        graph
    }

    #[test]
    fn test_add_node_and_edge() {
        let graph = seed();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge("BG", "PF1"));
        assert!(!graph.has_edge("PF1", "BG"));
        assert_eq!(graph.node("PF2").unwrap().level, Some(1));
    }

    #[test]
    fn test_edge_insertion_is_idempotent() {
        let mut graph = seed();
        assert!(!graph.add_edge("BG", "PF1"));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.out_degree("BG"), Some(2));
    }

    #[test]
    fn test_edge_creates_stub_endpoint() {
        let mut graph = seed();
        assert!(graph.add_edge("PF1", "Shared"));

        let stub = graph.node("Shared").unwrap();
        assert!(stub.is_stub());
        assert_eq!(graph.in_degree("Shared"), Some(1));
    }

    #[test]
    fn test_declaring_stub_keeps_position_and_edges() {
        let mut graph = seed();
        graph.add_edge("PF1", "Shared");
        let idx = graph.index_of("Shared").unwrap();

        let again = graph.add_node("Shared", NodeAttrs::at_level(2));
        assert_eq!(again, idx);
        assert_eq!(graph.node("Shared"), Some(&NodeAttrs::at_level(2)));
        assert!(graph.has_edge("PF1", "Shared"));
    }

    #[test]
    fn test_neighbors() {
        let graph = seed();
        let successors: Vec<&str> = graph.successors("BG").unwrap().into_iter().map(NodeKey::as_str).collect();
        assert_eq!(successors, vec!["PF1", "PF2"]);
        assert_eq!(graph.predecessors("PF2").unwrap().len(), 1);
        assert_eq!(graph.successors("missing"), Err(GraphError::NodeNotFound("missing".to_string())));
    }

    #[test]
    fn test_levels() {
        let mut graph = seed();
        assert_eq!(graph.max_level(), Some(1));
        assert_eq!(graph.nodes_at_level(1).len(), 2);

        graph.add_edge("PF2", "stub");
        assert_eq!(graph.nodes_at_level(0).len(), 2);
        assert_eq!(graph.level_histogram(), BTreeMap::from([(0, 2), (1, 2)]));
        assert_eq!(HierGraph::new().max_level(), None);
    }

    #[test]
    fn test_find_root() {
        let graph = seed();
        assert_eq!(graph.find_root().unwrap().as_str(), "BG");
    }

    #[test]
    fn test_find_root_errors() {
        assert_eq!(HierGraph::new().find_root(), Err(GraphError::EmptyGraph));

        let mut cycle = HierGraph::new();
        cycle.add_edge("a", "b");
        cycle.add_edge("b", "a");
        assert_eq!(cycle.find_root(), Err(GraphError::EmptyGraph));

        let mut forest = seed();
        forest.add_node("Other", NodeAttrs::at_level(0));
        assert_eq!(
            forest.find_root(),
            Err(GraphError::AmbiguousRoot(vec!["BG".to_string(), "Other".to_string()]))
        );
    }

    #[test]
    fn test_subgraph() {
        let mut graph = seed();
        graph.add_edge("PF1", "PF2");

        let keys = [NodeKey::new("PF2"), NodeKey::new("PF1"), NodeKey::new("nope")];
        let sub = graph.subgraph(keys.iter());

        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert!(sub.has_edge("PF1", "PF2"));
        assert_eq!(sub.key_at(0).unwrap().as_str(), "PF1");
    }

    #[test]
    fn test_edges_iteration_order() {
        let mut graph = seed();
        graph.add_edge("PF2", "BG");
        let edges: Vec<(&str, &str)> = graph.edges().map(|(s, t)| (s.as_str(), t.as_str())).collect();
        assert_eq!(edges, vec![("BG", "PF1"), ("BG", "PF2"), ("PF2", "BG")]);
    }
}
