//! Traversal algorithms
//!
//! Depth-first and breadth-first orderings, reachability sets and
//! hop-bounded neighborhoods. All traversals follow edge direction.

use super::common::{GraphView, NodeId};
use std::collections::{HashSet, VecDeque};

/// Depth-first preorder starting at `source`.
///
/// Successors are visited in the order they appear in the view, so the result
/// matches a recursive DFS without the recursion depth limit.
pub fn dfs_preorder(view: &GraphView, source: NodeId) -> Vec<NodeId> {
    let Some(source_idx) = view.index_of(source) else {
        return Vec::new();
    };

    let mut visited = vec![false; view.node_count];
    let mut order = Vec::new();
    // (node index, position of the next successor to try)
    let mut stack: Vec<(usize, usize)> = vec![(source_idx, 0)];
    visited[source_idx] = true;
    order.push(source_idx);

    while let Some(&(node, cursor)) = stack.last() {
        if let Some(&next) = view.successors(node).get(cursor) {
            let top = stack.len() - 1;
            stack[top].1 += 1;
            if !visited[next] {
                visited[next] = true;
                order.push(next);
                stack.push((next, 0));
            }
        } else {
            stack.pop();
        }
    }

    view.to_node_ids(&order)
}

/// Breadth-first order starting at `source`.
pub fn bfs_order(view: &GraphView, source: NodeId) -> Vec<NodeId> {
    match view.index_of(source) {
        Some(idx) => view.to_node_ids(&bfs_indices(view, idx, usize::MAX, Direction::Forward)),
        None => Vec::new(),
    }
}

/// All nodes reachable from `source`, excluding `source`, in BFS discovery order.
pub fn descendants(view: &GraphView, source: NodeId) -> Vec<NodeId> {
    reachable_excluding_source(view, source, Direction::Forward)
}

/// All nodes that can reach `source`, excluding `source`, in BFS discovery order.
pub fn ancestors(view: &GraphView, source: NodeId) -> Vec<NodeId> {
    reachable_excluding_source(view, source, Direction::Backward)
}

/// Nodes within `max_depth` outgoing hops of `source`, including `source`.
pub fn within_hops(view: &GraphView, source: NodeId, max_depth: usize) -> Vec<NodeId> {
    match view.index_of(source) {
        Some(idx) => view.to_node_ids(&bfs_indices(view, idx, max_depth, Direction::Forward)),
        None => Vec::new(),
    }
}

/// Number of edges of the view with both endpoints in `nodes`.
pub fn induced_edge_count(view: &GraphView, nodes: &[NodeId]) -> usize {
    let members: HashSet<usize> = nodes.iter().filter_map(|&n| view.index_of(n)).collect();
    members
        .iter()
        .map(|&u| view.successors(u).iter().filter(|v| members.contains(v)).count())
        .sum()
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

fn reachable_excluding_source(view: &GraphView, source: NodeId, direction: Direction) -> Vec<NodeId> {
    let Some(idx) = view.index_of(source) else {
        return Vec::new();
    };
    let order = bfs_indices(view, idx, usize::MAX, direction);
    view.to_node_ids(&order[1..])
}

fn bfs_indices(view: &GraphView, source_idx: usize, max_depth: usize, direction: Direction) -> Vec<usize> {
    let mut visited = vec![false; view.node_count];
    let mut order = vec![source_idx];
    let mut queue = VecDeque::new();

    visited[source_idx] = true;
    queue.push_back((source_idx, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let neighbors = match direction {
            Direction::Forward => view.successors(current),
            Direction::Backward => view.predecessors(current),
        };
        for &next in neighbors {
            if !visited[next] {
                visited[next] = true;
                order.push(next);
                queue.push_back((next, depth + 1));
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::view_from_edges;

    //     0
    //    / \
    //   1   2
    //  / \   \
    // 3   4   5
    fn tree() -> GraphView {
        view_from_edges(6, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)])
    }

    #[test]
    fn test_dfs_preorder() {
        assert_eq!(dfs_preorder(&tree(), 0), vec![0, 1, 3, 4, 2, 5]);
    }

    #[test]
    fn test_bfs_order() {
        assert_eq!(bfs_order(&tree(), 0), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_dfs_handles_cycles() {
        let view = view_from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(dfs_preorder(&view, 1), vec![1, 2, 0]);
    }

    #[test]
    fn test_unknown_source_is_empty() {
        assert!(dfs_preorder(&tree(), 42).is_empty());
        assert!(bfs_order(&tree(), 42).is_empty());
        assert!(descendants(&tree(), 42).is_empty());
    }

    #[test]
    fn test_descendants_and_ancestors() {
        let view = tree();
        assert_eq!(descendants(&view, 1), vec![3, 4]);
        assert_eq!(ancestors(&view, 4), vec![1, 0]);
        assert!(ancestors(&view, 0).is_empty());
        assert!(descendants(&view, 5).is_empty());
    }

    #[test]
    fn test_within_hops() {
        let view = tree();
        assert_eq!(within_hops(&view, 0, 0), vec![0]);
        assert_eq!(within_hops(&view, 0, 1), vec![0, 1, 2]);
        assert_eq!(within_hops(&view, 0, 5).len(), 6);
    }

    #[test]
    fn test_induced_edge_count() {
        let view = tree();
        assert_eq!(induced_edge_count(&view, &[0, 1, 2]), 2);
        assert_eq!(induced_edge_count(&view, &[3, 4, 5]), 0);
    }
}
