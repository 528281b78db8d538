//! Degree centrality
//!
//! For a directed graph the degree of a node is `in_degree + out_degree`,
//! normalized by the largest possible degree `n - 1`.

use super::common::{GraphView, NodeId};
use rayon::prelude::*;

/// Degree centrality of a single node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DegreeScore {
    pub node: NodeId,
    pub in_degree: usize,
    pub out_degree: usize,
    pub centrality: f64,
}

/// Degree centrality for every node, in view index order.
///
/// A graph with a single node gives that node a centrality of 1.0.
pub fn degree_centrality(view: &GraphView) -> Vec<DegreeScore> {
    let n = view.node_count;
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 1.0 };

    (0..n)
        .into_par_iter()
        .map(|idx| {
            let in_degree = view.in_degree(idx);
            let out_degree = view.out_degree(idx);
            let centrality = if n == 1 {
                1.0
            } else {
                (in_degree + out_degree) as f64 * scale
            };
            DegreeScore {
                node: view.index_to_node[idx],
                in_degree,
                out_degree,
                centrality,
            }
        })
        .collect()
}

/// The `k` most central nodes, highest first. Ties keep view index order.
pub fn top_by_degree(view: &GraphView, k: usize) -> Vec<DegreeScore> {
    let mut scores = degree_centrality(view);
    scores.sort_by(|a, b| b.centrality.total_cmp(&a.centrality));
    scores.truncate(k);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::view_from_edges;

    #[test]
    fn test_star_centrality() {
        // 0 -> 1, 2, 3
        let view = view_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        let scores = degree_centrality(&view);

        assert_eq!(scores.len(), 4);
        assert_eq!(scores[0].out_degree, 3);
        assert!((scores[0].centrality - 1.0).abs() < 1e-12);
        assert!((scores[1].centrality - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_node() {
        let view = view_from_edges(1, &[]);
        assert_eq!(degree_centrality(&view)[0].centrality, 1.0);
    }

    #[test]
    fn test_top_by_degree_is_stable() {
        // 1 is the hub; 0, 2, 3 tie
        let view = view_from_edges(4, &[(1, 0), (1, 2), (1, 3)]);
        let top = top_by_degree(&view, 3);
        let nodes: Vec<NodeId> = top.iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![1, 0, 2]);
    }
}
