//! Graph construction module

use crate::graph::FollowGraph;
use std::collections::HashMap;

/// Builder for incrementally constructing a FollowGraph.
///
/// Nodes registered with [`GraphBuilder::add_node`] are "known". An edge
/// touching an identifier that is not known either drops (the default) or
/// registers the identifier as an external node, depending on
/// `keep_external_targets`. Register every known node before adding edges.
pub struct GraphBuilder {
    /// Mapping from string IDs to insertion indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs in insertion order
    node_ids: Vec<String>,

    /// Adjacency lists for each node, in insertion indices
    adjacency_lists: Vec<Vec<u32>>,

    /// Whether unknown edge endpoints become nodes
    keep_external_targets: bool,

    /// Edges dropped because an endpoint was unknown
    dropped_edges: usize,
}

impl GraphBuilder {
    pub fn new(keep_external_targets: bool) -> Self {
        Self::with_capacity(0, keep_external_targets)
    }

    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize, keep_external_targets: bool) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
            keep_external_targets,
            dropped_edges: 0,
        }
    }

    /// Get or create a node index for the given string ID
    pub fn add_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    fn resolve(&mut self, id: &str) -> Option<u32> {
        if let Some(&idx) = self.id_to_index.get(id) {
            return Some(idx);
        }
        self.keep_external_targets.then(|| self.add_node(id))
    }

    /// Add an edge from one node to another.
    ///
    /// Returns `false` when the edge was dropped by the external-target policy.
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str) -> bool {
        let (Some(src_idx), Some(dst_idx)) = (self.resolve(src_id), self.resolve(dst_id)) else {
            self.dropped_edges += 1;
            return false;
        };

        self.adjacency_lists[src_idx as usize].push(dst_idx);
        true
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Build the compressed graph, renumbering nodes in identifier order
    pub fn build(self) -> FollowGraph {
        let node_count = self.node_ids.len();

        let mut order: Vec<u32> = (0..node_count as u32).collect();
        order.sort_unstable_by(|&a, &b| self.node_ids[a as usize].cmp(&self.node_ids[b as usize]));

        let mut old_to_new = vec![0u32; node_count];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx as usize] = new_idx as u32;
        }

        let mut node_ids = self.node_ids;
        let mut adjacency_lists = self.adjacency_lists;
        let mut sorted_ids = Vec::with_capacity(node_count);
        let mut rows: Vec<Vec<u32>> = Vec::with_capacity(node_count);
        for &old_idx in &order {
            sorted_ids.push(std::mem::take(&mut node_ids[old_idx as usize]));
            let row = std::mem::take(&mut adjacency_lists[old_idx as usize]);
            rows.push(row.into_iter().map(|dst| old_to_new[dst as usize]).collect());
        }

        if self.dropped_edges > 0 {
            log::debug!(
                "Dropped {} edges pointing outside the known node set",
                self.dropped_edges
            );
        }

        FollowGraph::from_rows(sorted_ids, rows)
    }
}

/// Build a graph from a node set and an edge sequence in one call
pub fn build<'a, N, E>(nodes: N, edges: E, keep_external_targets: bool) -> FollowGraph
where
    N: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut builder = GraphBuilder::new(keep_external_targets);
    for node in nodes {
        builder.add_node(node);
    }
    for (src, dst) in edges {
        builder.add_edge(src, dst);
    }
    builder.build()
}
