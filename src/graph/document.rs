//! JSON document format for exporting and re-importing a graph
//!
//! ```json
//! {
//!   "nodes": [["BG", {"level": 0, "node_type": "business_group"}]],
//!   "edges": [["BG", "PF1", {}]]
//! }
//! ```

use super::node::NodeAttrs;
use super::store::HierGraph;
use super::types::NodeKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid graph document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Edges carry no attributes; serialized as `{}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttrs {}

/// Plain node-list / edge-list form of a [`HierGraph`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<(NodeKey, NodeAttrs)>,
    pub edges: Vec<(NodeKey, NodeKey, EdgeAttrs)>,
}

impl HierGraph {
    /// Snapshot the graph as a document
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .nodes()
                .map(|(key, attrs)| (key.clone(), attrs.clone()))
                .collect(),
            edges: self
                .edges()
                .map(|(source, target)| (source.clone(), target.clone(), EdgeAttrs::default()))
                .collect(),
        }
    }

    /// Rebuild a graph from a document.
    ///
    /// Repeated node entries merge, and edges to undeclared nodes create
    /// attribute-less nodes, exactly as when the graph was first built.
    pub fn from_document(document: GraphDocument) -> HierGraph {
        let mut graph = HierGraph::new();
        for (key, attrs) in document.nodes {
            graph.add_node(key, attrs);
        }
        for (source, target, _) in document.edges {
            graph.add_edge(source, target);
        }
        graph
    }

    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> DocumentResult<HierGraph> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    /// Write the graph document to a file
    pub fn save_json(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?)?;
        debug!("Wrote graph document to {:?}", path);
        Ok(())
    }

    /// Read a graph document from a file
    pub fn load_json(path: impl AsRef<Path>) -> DocumentResult<HierGraph> {
        let path = path.as_ref();
        let graph = Self::from_json(&fs::read_to_string(path)?)?;
        debug!("Read graph document from {:?}: {} nodes", path, graph.node_count());
        Ok(graph)
    }
}
