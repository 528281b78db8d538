//! Level-by-level graph extension
//!
//! Each requested level is grown as a candidate attachment graph, attached
//! to the level directly below it, and optionally sprinkled with random
//! long-range jump edges.

use super::attachment::AttachmentGraph;
use super::config::{validate_connections, validate_probability, GrowthConfig};
use super::kernel::{AttachmentKernel, DegreeBucketKernel};
use super::{GrowthError, GrowthResult, LevelPlan};
use crate::graph::{GraphResult, HierGraph, NodeAttrs, NodeKey};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// What one extension level added
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    /// Key of the level in the requested plan
    pub logical_index: u32,
    /// Level assigned to the new nodes
    pub level: u32,
    pub nodes: Vec<NodeKey>,
    pub parent_edges: usize,
    pub internal_edges: usize,
    /// Jump edges drawn; one that duplicates an existing edge is counted
    /// but not inserted twice
    pub jump_edges: usize,
    /// No level below existed, so only the root was linked to this level
    pub root_fallback: bool,
}

/// Outcome of one extension call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtensionReport {
    pub levels: Vec<LevelReport>,
}

impl ExtensionReport {
    pub fn nodes_added(&self) -> usize {
        self.levels.iter().map(|l| l.nodes.len()).sum()
    }

    pub fn jump_edges(&self) -> usize {
        self.levels.iter().map(|l| l.jump_edges).sum()
    }

    pub fn edges_added(&self) -> usize {
        self.levels
            .iter()
            .map(|l| l.parent_edges + l.internal_edges + l.jump_edges)
            .sum()
    }
}

/// Grows a graph by whole levels
#[derive(Debug, Clone)]
pub struct GraphExtender<K = DegreeBucketKernel> {
    kernel: K,
    connections_per_node: usize,
    jump_probability: f64,
}

impl Default for GraphExtender<DegreeBucketKernel> {
    fn default() -> Self {
        Self::new(DegreeBucketKernel::default())
    }
}

impl GraphExtender<DegreeBucketKernel> {
    /// Extender using the config's normalized bucket kernel and parameters
    pub fn from_config(config: &GrowthConfig) -> GrowthResult<Self> {
        config.validate()?;
        Ok(Self::new(config.kernel()?)
            .with_connections_per_node(config.connections_per_node)
            .with_jump_probability(config.jump_probability))
    }
}

impl<K: AttachmentKernel> GraphExtender<K> {
    /// One parent per node and no jump edges
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            connections_per_node: 1,
            jump_probability: 0.0,
        }
    }

    pub fn with_connections_per_node(mut self, connections_per_node: usize) -> Self {
        self.connections_per_node = connections_per_node;
        self
    }

    pub fn with_jump_probability(mut self, jump_probability: f64) -> Self {
        self.jump_probability = jump_probability;
        self
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn validate(&self) -> GrowthResult<()> {
        validate_connections(self.connections_per_node)?;
        validate_probability(self.jump_probability)
    }

    /// Append the levels of `plan` to `graph`, lowest logical index first.
    ///
    /// The first planned level lands one above the highest level currently
    /// in the graph. If a level fails, the levels before it stay in the
    /// graph and the failing level adds nothing. A plan that would place a
    /// level past `u32::MAX` is rejected before anything is added.
    pub fn extend<R: Rng + ?Sized>(
        &self,
        graph: &mut HierGraph,
        plan: &LevelPlan,
        rng: &mut R,
    ) -> GrowthResult<ExtensionReport> {
        self.validate()?;

        let mut report = ExtensionReport::default();
        let Some(&min_index) = plan.keys().next() else {
            return Ok(report);
        };
        let levels = adjusted_levels(graph.max_level(), plan, min_index)?;
        // Resolved against the graph as it was before this call
        let root = graph.find_root_index();

        for (logical_index, level, num_nodes) in levels {
            match self.extend_level(graph, logical_index, level, num_nodes, &root, rng) {
                Ok(level_report) => {
                    info!(
                        "Level {} (plan index {}): {} nodes, {} parent edges, {} internal edges, {} jump edges",
                        level,
                        logical_index,
                        level_report.nodes.len(),
                        level_report.parent_edges,
                        level_report.internal_edges,
                        level_report.jump_edges
                    );
                    report.levels.push(level_report);
                }
                Err(e) => {
                    warn!(
                        "Extension stopped at level {} after {} committed levels: {}",
                        level,
                        report.levels.len(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        Ok(report)
    }

    fn extend_level<R: Rng + ?Sized>(
        &self,
        graph: &mut HierGraph,
        logical_index: u32,
        level: u32,
        num_nodes: usize,
        root: &GraphResult<usize>,
        rng: &mut R,
    ) -> GrowthResult<LevelReport> {
        // Everything that can fail happens before the graph is touched.
        let candidate = AttachmentGraph::grow(num_nodes, &self.kernel, rng)?;
        let parents = match level.checked_sub(1) {
            Some(below) => graph.node_indices_at_level(below),
            None => Vec::new(),
        };
        let fallback_root = if parents.is_empty() && num_nodes > 0 {
            Some(root.clone()?)
        } else {
            None
        };

        let new_nodes = materialize_nodes(graph, level, candidate.node_count());

        let mut parent_edges = 0;
        if let Some(root_idx) = fallback_root {
            warn!(
                "Level {} has no level below it; linking the root to a single new node",
                level
            );
            if graph.add_edge_by_index(root_idx, new_nodes[0]) {
                parent_edges += 1;
            }
        } else {
            let k = self.connections_per_node.min(parents.len());
            for &node in &new_nodes {
                for &parent in parents.choose_multiple(rng, k) {
                    if graph.add_edge_by_index(parent, node) {
                        parent_edges += 1;
                    }
                }
            }
        }

        let mut internal_edges = 0;
        for &(source, target) in candidate.edges() {
            if graph.add_edge_by_index(new_nodes[source], new_nodes[target]) {
                internal_edges += 1;
            }
        }

        let mut jump_edges = 0;
        if self.jump_probability > 0.0 {
            let total = graph.node_count();
            for &node in &new_nodes {
                if rng.gen::<f64>() < self.jump_probability {
                    let target = rng.gen_range(0..total);
                    if target != node {
                        graph.add_edge_by_index(node, target);
                        jump_edges += 1;
                    }
                }
            }
        }

        let nodes = new_nodes
            .iter()
            .filter_map(|&idx| graph.key_at(idx).cloned())
            .collect();

        Ok(LevelReport {
            logical_index,
            level,
            nodes,
            parent_edges,
            internal_edges,
            jump_edges,
            root_fallback: fallback_root.is_some(),
        })
    }
}

/// Pair each planned level with the level its nodes will get, keeping the
/// gaps of the plan. Fails if any of them would pass `u32::MAX`.
fn adjusted_levels(
    max_level: Option<u32>,
    plan: &LevelPlan,
    min_index: u32,
) -> GrowthResult<Vec<(u32, u32, usize)>> {
    let overflow = || {
        GrowthError::InvalidParameter("level plan runs past the largest level index".to_string())
    };
    let start_level = match max_level {
        Some(level) => level.checked_add(1).ok_or_else(overflow)?,
        None => 0,
    };
    plan.iter()
        .map(|(&logical_index, &num_nodes)| {
            let level = start_level
                .checked_add(logical_index - min_index)
                .ok_or_else(overflow)?;
            Ok((logical_index, level, num_nodes))
        })
        .collect()
}

/// Append `count` nodes named `level_{level}_{n}`, where `n` is the node
/// count at creation time, skipping forward past names already taken.
fn materialize_nodes(graph: &mut HierGraph, level: u32, count: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(count);
    for _ in 0..count {
        let mut n = graph.node_count();
        let mut key = format!("level_{}_{}", level, n);
        while graph.contains_node(&key) {
            n += 1;
            key = format!("level_{}_{}", level, n);
        }
        debug!("Creating node {}", key);
        indices.push(graph.add_node(key, NodeAttrs::at_level(level)));
    }
    indices
}

/// Extend `graph` with the levels and parameters of `config`
pub fn extend_levels<R: Rng + ?Sized>(
    graph: &mut HierGraph,
    config: &GrowthConfig,
    rng: &mut R,
) -> GrowthResult<ExtensionReport> {
    GraphExtender::from_config(config)?.extend(graph, &config.levels, rng)
}
