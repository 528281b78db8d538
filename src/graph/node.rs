//! Node attributes
//!
//! Every declared node carries a `level` and the `node_type` derived from it.
//! Nodes that only appear as an edge endpoint start out with no attributes
//! and pick them up if they are declared later.

use super::types::node_type_for_level;
use serde::{Deserialize, Serialize};

/// Attributes attached to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttrs {
    /// Depth in the synthesized hierarchy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Semantic label derived from `level`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

impl NodeAttrs {
    /// Attributes for a node declared at `level`
    pub fn at_level(level: u32) -> Self {
        NodeAttrs {
            level: Some(level),
            node_type: Some(node_type_for_level(level)),
        }
    }

    /// Attributes of an auto-created edge endpoint
    pub fn stub() -> Self {
        Self::default()
    }

    /// True when nothing has been declared for this node yet
    pub fn is_stub(&self) -> bool {
        self.level.is_none() && self.node_type.is_none()
    }

    /// Level used by level-based lookups; undeclared nodes count as level 0
    pub fn effective_level(&self) -> u32 {
        self.level.unwrap_or(0)
    }

    /// Merge `other` into `self` key by key.
    ///
    /// Keys present in `other` overwrite; keys absent from `other` are kept.
    pub fn merge(&mut self, other: NodeAttrs) {
        if other.level.is_some() {
            self.level = other.level;
        }
        if other.node_type.is_some() {
            self.node_type = other.node_type;
        }
    }
}
