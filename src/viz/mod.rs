//! Graph visualization
//!
//! Renders a [`HierGraph`] as Graphviz DOT. Nodes are filled by level,
//! highlighted nodes and edges are drawn in red, and the title becomes the
//! graph label.

use crate::graph::{HierGraph, NodeKey};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Fill colors cycled by node level
pub const LEVEL_COLORS: [&str; 6] = [
    "#FF9999", "#66B2FF", "#99FF99", "#FFCC99", "#FF99CC", "#CCCCFF",
];

/// Graphs larger than this are refused unless the limit is raised
pub const MAX_RENDER_NODES: usize = 2000;

const HIGHLIGHT_COLOR: &str = "red";

#[derive(Error, Debug)]
pub enum VizError {
    #[error("Graph too large to render: {nodes} nodes (limit {limit})")]
    TooManyNodes { nodes: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type VizResult<T> = Result<T, VizError>;

/// Nodes and edges to draw emphasized
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlight {
    pub nodes: Vec<NodeKey>,
    pub edges: Vec<(NodeKey, NodeKey)>,
}

impl Highlight {
    pub fn nodes(nodes: Vec<NodeKey>) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    pub fn path(nodes: Vec<NodeKey>, edges: Vec<(NodeKey, NodeKey)>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// A sink that draws a graph
pub trait GraphRenderer {
    fn render(&mut self, graph: &HierGraph, highlight: Option<&Highlight>, title: &str) -> VizResult<()>;
}

/// Writes DOT text to any [`Write`]
pub struct DotRenderer<W: Write> {
    out: W,
    max_nodes: usize,
}

impl<W: Write> DotRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            max_nodes: MAX_RENDER_NODES,
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GraphRenderer for DotRenderer<W> {
    fn render(&mut self, graph: &HierGraph, highlight: Option<&Highlight>, title: &str) -> VizResult<()> {
        if graph.node_count() > self.max_nodes {
            return Err(VizError::TooManyNodes {
                nodes: graph.node_count(),
                limit: self.max_nodes,
            });
        }
        debug!("Rendering {} nodes as DOT", graph.node_count());
        self.out.write_all(render_dot(graph, highlight, title).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// DOT text for `graph`, without any size limit
pub fn render_dot(graph: &HierGraph, highlight: Option<&Highlight>, title: &str) -> String {
    fn dot_escape(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    let highlight = highlight.filter(|h| !h.is_empty());
    let marked_nodes: HashSet<&str> = highlight
        .map(|h| h.nodes.iter().map(NodeKey::as_str).collect())
        .unwrap_or_default();
    let marked_edges: HashSet<(&str, &str)> = highlight
        .map(|h| h.edges.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str("digraph hiergraph {\n");
    out.push_str("  rankdir=TB;\n");
    if !title.is_empty() {
        out.push_str(&format!("  label=\"{}\";\n  labelloc=t;\n", dot_escape(title)));
    }
    out.push_str("  node [shape=ellipse, style=filled, fontname=\"Helvetica\"];\n");
    out.push_str("  edge [color=gray];\n\n");

    for (key, attrs) in graph.nodes() {
        let id = dot_escape(key.as_str());
        let fill = LEVEL_COLORS[attrs.effective_level() as usize % LEVEL_COLORS.len()];
        if marked_nodes.contains(key.as_str()) {
            out.push_str(&format!(
                "  \"{id}\" [fillcolor=\"{fill}\", color={HIGHLIGHT_COLOR}, penwidth=3, fontcolor=white];\n"
            ));
        } else {
            out.push_str(&format!("  \"{id}\" [fillcolor=\"{fill}\"];\n"));
        }
    }
    out.push('\n');

    for (source, target) in graph.edges() {
        let src = dot_escape(source.as_str());
        let dst = dot_escape(target.as_str());
        if marked_edges.contains(&(source.as_str(), target.as_str())) {
            out.push_str(&format!("  \"{src}\" -> \"{dst}\" [color={HIGHLIGHT_COLOR}, penwidth=2];\n"));
        } else {
            out.push_str(&format!("  \"{src}\" -> \"{dst}\";\n"));
        }
    }

    out.push_str("}\n");
    out
}
