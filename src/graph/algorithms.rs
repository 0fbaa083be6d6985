//! Structural graph operations shared by the metrics and the backbone selector

use crate::graph::FollowGraph;
use itertools::Itertools;
use rayon::prelude::*;

/// Find mutual follow relationships.
///
/// Returns each unordered pair once as `(a, b)` with `a < b`, sorted.
/// Self-loops never count as mutual.
pub fn find_mutual_follows(graph: &FollowGraph) -> Vec<(u32, u32)> {
    let pairs: Vec<(u32, u32)> = (0..graph.node_count)
        .into_par_iter()
        .flat_map_iter(move |src| {
            graph
                .out_neighbors(src)
                // Only look forward so each pair is visited once
                .filter(move |&dst| (dst as usize) > src)
                .filter(move |&dst| graph.has_edge_idx(dst as usize, src as u32))
                .map(move |dst| (src as u32, dst))
        })
        .collect();

    log::debug!("Found {} mutual follow relationships", pairs.len());
    pairs
}

/// Extract the subgraph induced by `keep`.
///
/// Only nodes in `keep` survive, and only edges with both endpoints kept.
/// Duplicate edges are carried over. Node order (and therefore identifier
/// order) is preserved.
pub fn induced_subgraph(graph: &FollowGraph, keep: &[u32]) -> FollowGraph {
    let mut keep: Vec<u32> = keep.to_vec();
    keep.sort_unstable();
    keep.dedup();

    // Create mapping from original to subgraph indices
    let mut orig_to_sub = vec![u32::MAX; graph.node_count];
    for (sub_idx, &orig) in keep.iter().enumerate() {
        orig_to_sub[orig as usize] = sub_idx as u32;
    }

    let mut node_ids = Vec::with_capacity(keep.len());
    let mut rows = Vec::with_capacity(keep.len());
    for &orig in &keep {
        node_ids.push(graph.id(orig).to_string());
        let row: Vec<u32> = graph
            .outgoing_edges(orig as usize)
            .iter()
            .map(|&dst| orig_to_sub[dst as usize])
            .filter(|&dst| dst != u32::MAX)
            .collect();
        rows.push(row);
    }

    FollowGraph::from_rows(node_ids, rows)
}

/// Direction-erased view of a follow graph; mirrored edges merge into one
pub struct UndirectedView<'a> {
    graph: &'a FollowGraph,
}

impl<'a> UndirectedView<'a> {
    pub fn new(graph: &'a FollowGraph) -> Self {
        Self { graph }
    }

    /// Distinct neighbours in either direction, ascending
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = u32> + 'a {
        let graph = self.graph;
        graph
            .out_neighbors(node)
            .merge(graph.in_neighbors(node))
            .dedup()
    }
}

impl FollowGraph {
    /// Undirected view used for hop expansion
    pub fn to_undirected(&self) -> UndirectedView<'_> {
        UndirectedView::new(self)
    }
}

/// All nodes within `hops` undirected hops of `root`, root included, ascending.
///
/// Expands one frontier per hop and never revisits a node.
pub fn ego_network(graph: &FollowGraph, root: u32, hops: usize) -> Vec<u32> {
    let view = graph.to_undirected();
    let mut seen = vec![false; graph.node_count];
    seen[root as usize] = true;
    let mut members = vec![root];
    let mut frontier = vec![root];

    for _ in 0..hops {
        let mut next = Vec::new();
        for &node in &frontier {
            for neighbor in view.neighbors(node as usize) {
                if !seen[neighbor as usize] {
                    seen[neighbor as usize] = true;
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        members.extend_from_slice(&next);
        frontier = next;
    }

    members.sort_unstable();
    members
}
