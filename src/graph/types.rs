//! Core type definitions for the hierarchy graph

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique string identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        NodeKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        NodeKey(s)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        NodeKey(s.to_string())
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Semantic labels for the first levels of a product hierarchy.
const LEVEL_TYPES: [&str; 5] = [
    "business_group",
    "product_family",
    "product_offering",
    "module",
    "part",
];

/// Node type label for a hierarchy level.
///
/// Levels past the fixed table fall back to `level_{level}`.
pub fn node_type_for_level(level: u32) -> String {
    match LEVEL_TYPES.get(level as usize) {
        Some(name) => (*name).to_string(),
        None => format!("level_{}", level),
    }
}
