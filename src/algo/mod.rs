//! Graph query module
//!
//! Algorithms are implemented in the `hiergraph-algorithms` crate.
//! This module provides the integration/adapter layer: it builds a
//! [`GraphView`] from a [`HierGraph`] and runs the named query methods,
//! producing a printable summary plus what to draw.

use crate::graph::{HierGraph, NodeKey};
use crate::viz::Highlight;
use hiergraph_algorithms::{GraphView, NodeId as AlgoNodeId};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

// Re-export algorithms
pub use hiergraph_algorithms::{
    all_simple_paths, ancestors, bfs, bfs_order, degree_centrality, descendants, dfs_preorder,
    induced_edge_count, top_by_degree, within_hops, DegreeScore, PathResult,
};

/// Traversal outcomes only show this many visited nodes
pub const MAX_HIGHLIGHT_NODES: usize = 20;
/// Number of nodes reported by the degree centrality query
pub const TOP_CENTRALITY: usize = 20;
/// Longest path, in edges, enumerated by the all-simple-paths query
pub const DEFAULT_PATH_CUTOFF: usize = 5;
/// Hop radius of the subgraph extraction query
pub const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Node {0} not found")]
    NodeNotFound(String),

    #[error("{method} requires a {parameter}")]
    MissingParameter {
        method: QueryMethod,
        parameter: &'static str,
    },

    #[error("Unknown query method: {0}")]
    UnknownMethod(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// The query methods offered over a synthesized graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryMethod {
    Dfs,
    Bfs,
    ShortestPath,
    AllSimplePaths,
    DescendantsAncestors,
    DegreeCentrality,
    SubgraphExtraction,
}

impl QueryMethod {
    pub const ALL: [QueryMethod; 7] = [
        QueryMethod::Dfs,
        QueryMethod::Bfs,
        QueryMethod::ShortestPath,
        QueryMethod::AllSimplePaths,
        QueryMethod::DescendantsAncestors,
        QueryMethod::DegreeCentrality,
        QueryMethod::SubgraphExtraction,
    ];

    /// Human-readable name, as shown in menus and summaries
    pub fn display_name(&self) -> &'static str {
        match self {
            QueryMethod::Dfs => "Depth-First Search (DFS)",
            QueryMethod::Bfs => "Breadth-First Search (BFS)",
            QueryMethod::ShortestPath => "Shortest Path",
            QueryMethod::AllSimplePaths => "All Simple Paths",
            QueryMethod::DescendantsAncestors => "Descendants and Ancestors",
            QueryMethod::DegreeCentrality => "Degree Centrality",
            QueryMethod::SubgraphExtraction => "Subgraph Extraction",
        }
    }

    /// Short kebab-case name used on the command line
    pub fn short_name(&self) -> &'static str {
        match self {
            QueryMethod::Dfs => "dfs",
            QueryMethod::Bfs => "bfs",
            QueryMethod::ShortestPath => "shortest-path",
            QueryMethod::AllSimplePaths => "all-simple-paths",
            QueryMethod::DescendantsAncestors => "descendants-ancestors",
            QueryMethod::DegreeCentrality => "degree-centrality",
            QueryMethod::SubgraphExtraction => "subgraph",
        }
    }

    pub fn needs_source(&self) -> bool {
        !matches!(self, QueryMethod::DegreeCentrality)
    }

    pub fn needs_target(&self) -> bool {
        matches!(self, QueryMethod::ShortestPath | QueryMethod::AllSimplePaths)
    }
}

impl fmt::Display for QueryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for QueryMethod {
    type Err = QueryError;

    /// Accepts either the short or the display name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        QueryMethod::ALL
            .into_iter()
            .find(|m| {
                m.short_name().eq_ignore_ascii_case(wanted)
                    || m.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| QueryError::UnknownMethod(s.to_string()))
    }
}

/// Inputs of a query; which ones are required depends on the method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub source: Option<String>,
    pub target: Option<String>,
    /// Hop radius for subgraph extraction
    pub max_depth: Option<usize>,
    /// Maximum path length, in edges, for all simple paths
    pub cutoff: Option<usize>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
}

/// Result of a query: text for the user and what a renderer should draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub method: QueryMethod,
    pub summary: String,
    pub title: String,
    pub highlight: Highlight,
    /// Nodes to draw; empty when there is nothing to show
    pub scope: Vec<NodeKey>,
}

impl QueryOutcome {
    /// The part of `graph` this outcome should be rendered over
    pub fn scoped_graph(&self, graph: &HierGraph) -> HierGraph {
        graph.subgraph(&self.scope)
    }
}

/// Build a GraphView from the graph for algorithm execution.
///
/// View node ids are the graph's dense node indices, so successor order in
/// the view matches edge insertion order.
pub fn build_view(graph: &HierGraph) -> GraphView {
    let node_count = graph.node_count();
    let index_to_node: Vec<AlgoNodeId> = (0..node_count as AlgoNodeId).collect();
    let outgoing: Vec<Vec<usize>> = (0..node_count)
        .map(|idx| graph.successor_indices(idx).collect())
        .collect();
    GraphView::from_adjacency_list(index_to_node, outgoing)
}

/// Run `method` against `graph`
pub fn run_query(
    graph: &HierGraph,
    method: QueryMethod,
    params: &QueryParams,
) -> QueryResult<QueryOutcome> {
    let source = if method.needs_source() {
        Some(resolve(graph, method, params.source.as_deref(), "source node")?)
    } else {
        None
    };
    let target = if method.needs_target() {
        Some(resolve(graph, method, params.target.as_deref(), "target node")?)
    } else {
        None
    };

    info!(
        "Running {} (source: {:?}, target: {:?}) over {} nodes",
        method,
        params.source,
        params.target,
        graph.node_count()
    );
    let view = build_view(graph);
    let keys = |ids: &[AlgoNodeId]| -> Vec<NodeKey> {
        ids.iter()
            .filter_map(|&id| graph.key_at(id as usize).cloned())
            .collect()
    };

    let outcome = match (method, source, target) {
        (QueryMethod::Dfs, Some(s), _) | (QueryMethod::Bfs, Some(s), _) => {
            let (label, order) = if method == QueryMethod::Dfs {
                ("DFS", dfs_preorder(&view, s))
            } else {
                ("BFS", bfs_order(&view, s))
            };
            let order = keys(&order);
            let shown: Vec<NodeKey> = order.iter().take(MAX_HIGHLIGHT_NODES).cloned().collect();
            QueryOutcome {
                method,
                summary: format!("{} traversal order: {}", label, format_list(&order)),
                title: format!("{} - First {} Nodes", method, MAX_HIGHLIGHT_NODES),
                highlight: Highlight::nodes(shown.clone()),
                scope: shown,
            }
        }
        (QueryMethod::ShortestPath, Some(s), Some(t)) => {
            let (source_key, target_key) = (key(graph, s), key(graph, t));
            match bfs(&view, s, t) {
                Some(result) => {
                    let path = keys(&result.path);
                    let edges = result
                        .edges()
                        .into_iter()
                        .map(|(u, v)| (key(graph, u), key(graph, v)))
                        .collect();
                    QueryOutcome {
                        method,
                        summary: format!(
                            "Shortest path from '{}' to '{}': {}",
                            source_key,
                            target_key,
                            format_list(&path)
                        ),
                        title: method.to_string(),
                        scope: path.iter().take(MAX_HIGHLIGHT_NODES).cloned().collect(),
                        highlight: Highlight::path(path, edges),
                    }
                }
                None => QueryOutcome::empty(method, "No path found between the specified nodes."),
            }
        }
        (QueryMethod::AllSimplePaths, Some(s), Some(t)) => {
            let cutoff = params.cutoff.unwrap_or(DEFAULT_PATH_CUTOFF);
            let paths = all_simple_paths(&view, s, t, cutoff);
            match paths.first() {
                Some(first) => {
                    let example = keys(first);
                    let edges = example
                        .windows(2)
                        .map(|pair| (pair[0].clone(), pair[1].clone()))
                        .collect();
                    QueryOutcome {
                        method,
                        summary: format!(
                            "Number of paths found (max length {}): {}\nExample path: {}",
                            cutoff,
                            paths.len(),
                            format_list(&example)
                        ),
                        title: "Example of Simple Path".to_string(),
                        scope: example.iter().take(MAX_HIGHLIGHT_NODES).cloned().collect(),
                        highlight: Highlight::path(example, edges),
                    }
                }
                None => QueryOutcome::empty(
                    method,
                    format!(
                        "Number of paths found (max length {}): 0\nExample path: No paths found",
                        cutoff
                    ),
                ),
            }
        }
        (QueryMethod::DescendantsAncestors, Some(s), _) => {
            let source_key = key(graph, s);
            let below = keys(&descendants(&view, s));
            let above = keys(&ancestors(&view, s));
            let mut marked: Vec<NodeKey> = below.iter().chain(above.iter()).cloned().collect();
            marked.push(source_key.clone());
            QueryOutcome {
                method,
                summary: format!(
                    "Descendants of '{}': {}\nAncestors of '{}': {}",
                    source_key,
                    format_list(&below),
                    source_key,
                    format_list(&above)
                ),
                title: method.to_string(),
                scope: marked.iter().take(MAX_HIGHLIGHT_NODES).cloned().collect(),
                highlight: Highlight::nodes(marked),
            }
        }
        (QueryMethod::DegreeCentrality, _, _) => {
            let top = top_by_degree(&view, TOP_CENTRALITY);
            let mut summary = format!("Top {} nodes by degree centrality:", TOP_CENTRALITY);
            let mut marked = Vec::with_capacity(top.len());
            for score in &top {
                let node = key(graph, score.node);
                summary.push_str(&format!("\n  {}: {:.4}", node, score.centrality));
                marked.push(node);
            }
            QueryOutcome {
                method,
                summary,
                title: "Top Nodes by Degree Centrality".to_string(),
                scope: marked.clone(),
                highlight: Highlight::nodes(marked),
            }
        }
        (QueryMethod::SubgraphExtraction, Some(s), _) => {
            let max_depth = params.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
            let members = within_hops(&view, s, max_depth);
            let edge_count = induced_edge_count(&view, &members);
            QueryOutcome {
                method,
                summary: format!(
                    "Extracted subgraph from '{}' with max depth {}\nSubgraph nodes: {}\nSubgraph edges: {}",
                    key(graph, s),
                    max_depth,
                    members.len(),
                    edge_count
                ),
                title: format!("Subgraph (max depth: {})", max_depth),
                highlight: Highlight::default(),
                scope: keys(&members),
            }
        }
        // Required parameters were resolved above
        (method, _, _) => {
            return Err(QueryError::MissingParameter {
                method,
                parameter: "source node",
            })
        }
    };

    Ok(outcome)
}

impl QueryOutcome {
    fn empty(method: QueryMethod, summary: impl Into<String>) -> Self {
        QueryOutcome {
            method,
            summary: summary.into(),
            title: method.to_string(),
            highlight: Highlight::default(),
            scope: Vec::new(),
        }
    }
}

fn resolve(
    graph: &HierGraph,
    method: QueryMethod,
    key: Option<&str>,
    parameter: &'static str,
) -> QueryResult<AlgoNodeId> {
    let key = key.ok_or(QueryError::MissingParameter { method, parameter })?;
    graph
        .index_of(key)
        .map(|idx| idx as AlgoNodeId)
        .ok_or_else(|| QueryError::NodeNotFound(key.to_string()))
}

fn key(graph: &HierGraph, id: AlgoNodeId) -> NodeKey {
    graph
        .key_at(id as usize)
        .cloned()
        .unwrap_or_else(|| NodeKey::new(id.to_string()))
}

/// `['a', 'b']`
fn format_list(keys: &[NodeKey]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| format!("'{}'", k)).collect();
    format!("[{}]", quoted.join(", "))
}
