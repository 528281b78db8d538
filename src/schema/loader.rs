//! Seed graph construction from a nested JSON hierarchy
//!
//! ```json
//! {"Business Group": {
//!     "name": "BG",
//!     "children": [{"name": "PF1", "connected_to": "PF2"}, {"name": "PF2"}]
//! }}
//! ```

use crate::graph::{HierGraph, NodeAttrs};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Top-level key holding the hierarchy root by default
pub const DEFAULT_ROOT_KEY: &str = "Business Group";

#[derive(Error, Debug)]
pub enum SchemaError {
    /// The input is not valid JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON that does not describe a hierarchy
    #[error("Malformed schema at {path}: {reason}")]
    MalformedSchema { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    fn malformed(path: &str, reason: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Builds seed graphs from hierarchy documents
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    root_key: String,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self {
            root_key: DEFAULT_ROOT_KEY.to_string(),
        }
    }
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the hierarchy root from a different top-level key
    pub fn with_root_key(mut self, root_key: impl Into<String>) -> Self {
        self.root_key = root_key.into();
        self
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// Load a seed graph from JSON text
    pub fn load_str(&self, json: &str) -> SchemaResult<HierGraph> {
        let value: Value = serde_json::from_str(json)?;
        self.load_value(&value)
    }

    /// Load a seed graph from a JSON file
    pub fn load_path(&self, path: impl AsRef<Path>) -> SchemaResult<HierGraph> {
        let path = path.as_ref();
        debug!("Reading schema from {:?}", path);
        self.load_str(&fs::read_to_string(path)?)
    }

    /// Load a seed graph from an already parsed document.
    ///
    /// Nothing is returned unless the whole hierarchy is well formed.
    pub fn load_value(&self, document: &Value) -> SchemaResult<HierGraph> {
        let top = document
            .as_object()
            .ok_or_else(|| SchemaError::malformed("$", "top level must be an object"))?;
        let root = top.get(&self.root_key).ok_or_else(|| {
            SchemaError::malformed("$", format!("missing root key `{}`", self.root_key))
        })?;

        let mut graph = HierGraph::new();
        let path = format!("$.{}", self.root_key);
        add_nodes_recursively(&mut graph, root, None, 0, &path)?;

        info!(
            "Loaded schema: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// Load a seed graph using the default root key
pub fn load_schema(json: &str) -> SchemaResult<HierGraph> {
    SchemaLoader::default().load_str(json)
}

fn add_nodes_recursively(
    graph: &mut HierGraph,
    value: &Value,
    parent: Option<&str>,
    level: u32,
    path: &str,
) -> SchemaResult<()> {
    let node = value
        .as_object()
        .ok_or_else(|| SchemaError::malformed(path, "node must be an object"))?;

    let name = required_str(node, "name", path)?;
    graph.add_node(name, NodeAttrs::at_level(level));

    if let Some(parent) = parent {
        graph.add_edge(parent, name);
    }

    if let Some(target) = optional_str(node, "connected_to", path)? {
        graph.add_edge(name, target);
    }

    match node.get("children") {
        None | Some(Value::Null) => {}
        Some(Value::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{}.children[{}]", path, i);
                add_nodes_recursively(graph, child, Some(name), level + 1, &child_path)?;
            }
        }
        Some(_) => return Err(SchemaError::malformed(path, "`children` must be an array")),
    }

    Ok(())
}

fn required_str<'a>(node: &'a Map<String, Value>, field: &str, path: &str) -> SchemaResult<&'a str> {
    optional_str(node, field, path)?
        .ok_or_else(|| SchemaError::malformed(path, format!("missing `{}`", field)))
}

fn optional_str<'a>(
    node: &'a Map<String, Value>,
    field: &str,
    path: &str,
) -> SchemaResult<Option<&'a str>> {
    match node.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(SchemaError::malformed(path, format!("`{}` must be a string", field))),
    }
}
