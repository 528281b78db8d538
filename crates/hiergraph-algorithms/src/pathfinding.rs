//! Pathfinding algorithms
//!
//! Unweighted shortest path (BFS) and bounded simple-path enumeration.

use super::common::{GraphView, NodeId};
use std::collections::VecDeque;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

impl PathResult {
    /// Consecutive (from, to) pairs along the path
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.path.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

/// Breadth-First Search (Unweighted Shortest Path)
pub fn bfs(view: &GraphView, source: NodeId, target: NodeId) -> Option<PathResult> {
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;

    let mut queue = VecDeque::new();
    // index -> parent index, usize::MAX marks the source
    let mut parent = vec![None; view.node_count];

    queue.push_back(source_idx);
    parent[source_idx] = Some(usize::MAX);

    while let Some(current_idx) = queue.pop_front() {
        if current_idx == target_idx {
            let mut path = Vec::new();
            let mut curr = target_idx;
            loop {
                path.push(view.index_to_node[curr]);
                match parent[curr] {
                    Some(prev) if prev != usize::MAX => curr = prev,
                    _ => break,
                }
            }
            path.reverse();
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }

        for &next_idx in view.successors(current_idx) {
            if parent[next_idx].is_none() {
                parent[next_idx] = Some(current_idx);
                queue.push_back(next_idx);
            }
        }
    }

    None
}

/// All simple directed paths from `source` to `target` with at most `cutoff` edges.
///
/// Paths are produced in depth-first order. A path from a node to itself is
/// not reported.
pub fn all_simple_paths(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    cutoff: usize,
) -> Vec<Vec<NodeId>> {
    let (Some(source_idx), Some(target_idx)) = (view.index_of(source), view.index_of(target)) else {
        return Vec::new();
    };
    if source_idx == target_idx || cutoff == 0 {
        return Vec::new();
    }

    let mut paths = Vec::new();
    let mut on_path = vec![false; view.node_count];
    let mut path = vec![source_idx];
    // One successor cursor per node on the current path
    let mut cursors = vec![0usize];
    on_path[source_idx] = true;

    while let Some(&node) = path.last() {
        let depth = path.len() - 1;
        let cursor = cursors[depth];
        let successors = view.successors(node);

        if depth >= cutoff || cursor >= successors.len() {
            on_path[node] = false;
            path.pop();
            cursors.pop();
            continue;
        }

        cursors[depth] += 1;
        let next = successors[cursor];
        if on_path[next] {
            continue;
        }
        if next == target_idx {
            let mut found = path.clone();
            found.push(next);
            paths.push(view.to_node_ids(&found));
            continue;
        }

        on_path[next] = true;
        path.push(next);
        cursors.push(0);
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::view_from_edges;

    #[test]
    fn test_bfs() {
        // 0->1->2
        let view = view_from_edges(3, &[(0, 1), (1, 2)]);

        let result = bfs(&view, 0, 2).unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.cost, 2.0);
        assert_eq!(result.edges(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_bfs_prefers_fewest_hops() {
        // 0->1->2->3 and 0->3
        let view = view_from_edges(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
        let result = bfs(&view, 0, 3).unwrap();
        assert_eq!(result.path, vec![0, 3]);
    }

    #[test]
    fn test_bfs_no_path() {
        let view = view_from_edges(3, &[(0, 1), (2, 1)]);
        assert!(bfs(&view, 0, 2).is_none());
        assert!(bfs(&view, 0, 99).is_none());
    }

    #[test]
    fn test_bfs_source_is_target() {
        let view = view_from_edges(2, &[(0, 1)]);
        let result = bfs(&view, 1, 1).unwrap();
        assert_eq!(result.path, vec![1]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_all_simple_paths() {
        // Diamond with a shortcut: 0->1->3, 0->2->3, 0->3
        let view = view_from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 3), (2, 3)]);

        let paths = all_simple_paths(&view, 0, 3, 5);
        assert_eq!(paths, vec![vec![0, 1, 3], vec![0, 2, 3], vec![0, 3]]);

        let short = all_simple_paths(&view, 0, 3, 1);
        assert_eq!(short, vec![vec![0, 3]]);
    }

    #[test]
    fn test_all_simple_paths_skips_cycles() {
        // 0->1->0 cycle, 1->2
        let view = view_from_edges(3, &[(0, 1), (1, 0), (1, 2)]);
        let paths = all_simple_paths(&view, 0, 2, 10);
        assert_eq!(paths, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_all_simple_paths_none() {
        let view = view_from_edges(3, &[(0, 1)]);
        assert!(all_simple_paths(&view, 0, 2, 5).is_empty());
        assert!(all_simple_paths(&view, 0, 0, 5).is_empty());
    }
}
