//! Candidate attachment graph
//!
//! A growing network: nodes arrive one at a time and each new node points at
//! exactly one earlier node, picked with probability proportional to the
//! kernel weight of that node's current in-degree. The result is a tree
//! rooted at node 0 with every edge pointing from newer to older nodes.

use super::kernel::AttachmentKernel;
use super::{GrowthError, GrowthResult};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentGraph {
    in_degrees: Vec<usize>,
    /// (new node, chosen earlier node)
    edges: Vec<(usize, usize)>,
}

impl AttachmentGraph {
    /// Grow a candidate graph of `num_nodes` nodes.
    ///
    /// Fails if the kernel yields invalid weights or gives every candidate
    /// zero weight.
    pub fn grow<K, R>(num_nodes: usize, kernel: &K, rng: &mut R) -> GrowthResult<Self>
    where
        K: AttachmentKernel + ?Sized,
        R: Rng + ?Sized,
    {
        let mut graph = AttachmentGraph {
            in_degrees: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_nodes.saturating_sub(1)),
        };
        if num_nodes == 0 {
            return Ok(graph);
        }
        graph.in_degrees.push(0);

        let mut weights = Vec::with_capacity(num_nodes);
        for source in 1..num_nodes {
            weights.clear();
            weights.extend(graph.in_degrees.iter().map(|&d| kernel.weight(d)));

            let dist = WeightedIndex::new(&weights).map_err(|e| {
                GrowthError::InvalidParameter(format!(
                    "attachment kernel produced unusable weights: {}",
                    e
                ))
            })?;
            let target = dist.sample(rng);

            graph.edges.push((source, target));
            graph.in_degrees[target] += 1;
            graph.in_degrees.push(0);
        }

        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.in_degrees.len()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::kernel::DegreeBucketKernel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_degrees(graph: &AttachmentGraph) -> Vec<usize> {
        let mut degrees = vec![0; graph.node_count()];
        for &(_, target) in graph.edges() {
            degrees[target] += 1;
        }
        degrees
    }

    #[test]
    fn test_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        let kernel = DegreeBucketKernel::default();

        let empty = AttachmentGraph::grow(0, &kernel, &mut rng).unwrap();
        assert_eq!(empty.node_count(), 0);
        assert!(empty.edges().is_empty());

        let single = AttachmentGraph::grow(1, &kernel, &mut rng).unwrap();
        assert_eq!(single.node_count(), 1);
        assert!(single.edges().is_empty());
    }

    #[test]
    fn test_tree_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = AttachmentGraph::grow(50, &DegreeBucketKernel::default(), &mut rng).unwrap();

        assert_eq!(graph.node_count(), 50);
        assert_eq!(graph.edges().len(), 49);
        for (i, &(source, target)) in graph.edges().iter().enumerate() {
            assert_eq!(source, i + 1);
            assert!(target < source);
        }
        // Node 0 is the only one that can gather children before node 1 exists
        assert!(in_degrees(&graph)[0] >= 1);
    }

    #[test]
    fn test_zero_weight_bucket_is_never_chosen() {
        // Only in-degree-0 nodes may be picked, so nobody gets a second child.
        let kernel = |d: usize| if d == 0 { 1.0 } else { 0.0 };
        let mut rng = StdRng::seed_from_u64(3);
        let graph = AttachmentGraph::grow(20, &kernel, &mut rng).unwrap();
        assert!(in_degrees(&graph).iter().all(|&d| d <= 1));
    }

    #[test]
    fn test_all_zero_weights_fail() {
        let kernel = |_: usize| 0.0;
        let mut rng = StdRng::seed_from_u64(3);
        let result = AttachmentGraph::grow(3, &kernel, &mut rng);
        assert!(matches!(result, Err(GrowthError::InvalidParameter(_))));
    }

    #[test]
    fn test_seeded_growth_is_reproducible() {
        let kernel = DegreeBucketKernel::default();
        let a = AttachmentGraph::grow(30, &kernel, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = AttachmentGraph::grow(30, &kernel, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
