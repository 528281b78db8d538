//! Hierarchy graph
//!
//! A directed graph whose nodes are string keys carrying a hierarchy `level`
//! and a `node_type` label derived from it. Edges are unlabeled and
//! inserting the same edge twice has no effect.

pub mod document;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use document::{DocumentError, DocumentResult, EdgeAttrs, GraphDocument};
pub use node::NodeAttrs;
pub use store::{GraphError, GraphResult, HierGraph};
pub use types::{node_type_for_level, NodeKey};
