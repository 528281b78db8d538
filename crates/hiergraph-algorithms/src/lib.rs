//! Graph algorithms over a dense, read-only topology view.
//!
//! The algorithms here know nothing about node keys or attributes: callers
//! project their graph into a [`GraphView`] and map the returned [`NodeId`]s
//! back to their own identifiers.

pub mod centrality;
pub mod common;
pub mod pathfinding;
pub mod traversal;

pub use centrality::{degree_centrality, top_by_degree, DegreeScore};
pub use common::{GraphView, NodeId};
pub use pathfinding::{all_simple_paths, bfs, PathResult};
pub use traversal::{ancestors, bfs_order, descendants, dfs_preorder, induced_edge_count, within_hops};
