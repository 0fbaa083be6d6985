//! Memory-efficient follow graph representation

use itertools::Itertools;
use std::collections::HashMap;
use std::mem;

/// Degree counts stored apart from adjacency to keep traversal cache friendly
#[derive(Debug, Clone, Default)]
pub struct NodeMetadata {
    /// Number of incoming follow edges per node (multiplicity counted)
    pub follower_counts: Vec<u32>,

    /// Number of outgoing follow edges per node (multiplicity counted)
    pub following_counts: Vec<u32>,
}

impl NodeMetadata {
    /// Calculate the memory usage of the metadata
    pub fn memory_usage(&self) -> usize {
        let follower_counts = self.follower_counts.capacity() * mem::size_of::<u32>();
        let following_counts = self.following_counts.capacity() * mem::size_of::<u32>();

        follower_counts + following_counts
    }
}

/// Compressed sparse representation of a directed follow graph.
///
/// Nodes are indexed in ascending identifier order, so comparing two
/// indices gives the same answer as comparing the identifiers. Rows of
/// both the forward and the reverse adjacency are sorted and keep
/// duplicate edges; the `*_neighbors` accessors hide the duplicates.
#[derive(Debug, Clone, Default)]
pub struct FollowGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// offsets[i] to offsets[i+1] is the range of node i's targets in `edges`
    pub offsets: Vec<u32>,

    /// Concatenated, per-row sorted lists of follow targets
    pub edges: Vec<u32>,

    /// Same layout as `offsets`, over `reverse_edges`
    pub reverse_offsets: Vec<u32>,

    /// Concatenated, per-row sorted lists of followers
    pub reverse_edges: Vec<u32>,

    /// Identifier of each node, ascending
    pub node_ids: Vec<String>,

    /// Degree counts
    pub metadata: NodeMetadata,

    id_to_index: HashMap<String, u32>,
}

impl FollowGraph {
    /// Assemble a graph from sorted node identifiers and per-node target rows.
    ///
    /// `rows[i]` holds the targets of `node_ids[i]` and may be unsorted.
    pub(crate) fn from_rows(node_ids: Vec<String>, mut rows: Vec<Vec<u32>>) -> Self {
        debug_assert!(node_ids.windows(2).all(|w| w[0] < w[1]));
        debug_assert_eq!(node_ids.len(), rows.len());

        let node_count = node_ids.len();
        let edge_count: usize = rows.iter().map(Vec::len).sum();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut edges = Vec::with_capacity(edge_count);
        let mut follower_counts = vec![0u32; node_count];
        let mut following_counts = Vec::with_capacity(node_count);

        offsets.push(0);
        for row in &mut rows {
            // Sort for binary search efficiency
            row.sort_unstable();
            for &dst in row.iter() {
                follower_counts[dst as usize] += 1;
            }
            following_counts.push(row.len() as u32);
            edges.extend_from_slice(row);
            offsets.push(edges.len() as u32);
        }

        // Reverse adjacency: bucket sources by target. Sources are visited in
        // ascending order, so every reverse row comes out sorted.
        let mut reverse_offsets = Vec::with_capacity(node_count + 1);
        reverse_offsets.push(0);
        let mut running = 0u32;
        for &count in &follower_counts {
            running += count;
            reverse_offsets.push(running);
        }
        let mut reverse_edges = vec![0u32; edge_count];
        let mut cursor: Vec<u32> = reverse_offsets[..node_count].to_vec();
        for (src, row) in rows.iter().enumerate() {
            for &dst in row {
                let slot = &mut cursor[dst as usize];
                reverse_edges[*slot as usize] = src as u32;
                *slot += 1;
            }
        }

        let id_to_index = node_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx as u32))
            .collect();

        Self {
            node_count,
            offsets,
            edges,
            reverse_offsets,
            reverse_edges,
            node_ids,
            metadata: NodeMetadata {
                follower_counts,
                following_counts,
            },
            id_to_index,
        }
    }

    /// Total number of edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Index of an identifier, if it is a node
    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.id_to_index.get(id).copied()
    }

    /// Identifier of a node index
    pub fn id(&self, node: u32) -> &str {
        &self.node_ids[node as usize]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Get outgoing edges for a node, duplicates included
    pub fn outgoing_edges(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    /// Get incoming edges for a node, duplicates included
    pub fn incoming_edges(&self, node: usize) -> &[u32] {
        let start = self.reverse_offsets[node] as usize;
        let end = self.reverse_offsets[node + 1] as usize;
        &self.reverse_edges[start..end]
    }

    /// Distinct follow targets of a node, ascending
    pub fn out_neighbors(&self, node: usize) -> impl Iterator<Item = u32> + '_ {
        self.outgoing_edges(node).iter().copied().dedup()
    }

    /// Distinct followers of a node, ascending
    pub fn in_neighbors(&self, node: usize) -> impl Iterator<Item = u32> + '_ {
        self.incoming_edges(node).iter().copied().dedup()
    }

    /// Check if there's an edge from src to dst.
    ///
    /// Binary search over the sorted row: O(log out-degree of `src`).
    pub fn has_edge_idx(&self, src: usize, dst: u32) -> bool {
        self.outgoing_edges(src).binary_search(&dst).is_ok()
    }

    /// Get out-degree of a node
    pub fn out_degree_idx(&self, node: usize) -> usize {
        self.metadata.following_counts[node] as usize
    }

    /// Get in-degree of a node
    pub fn in_degree_idx(&self, node: usize) -> usize {
        self.metadata.follower_counts[node] as usize
    }

    /// In-degree of an account; 0 if unknown
    pub fn in_degree(&self, id: &str) -> usize {
        self.index_of(id)
            .map_or(0, |idx| self.in_degree_idx(idx as usize))
    }

    /// Out-degree of an account; 0 if unknown
    pub fn out_degree(&self, id: &str) -> usize {
        self.index_of(id)
            .map_or(0, |idx| self.out_degree_idx(idx as usize))
    }

    /// Accounts followed by `id`; empty if unknown
    pub fn successors(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(idx) => self
                .out_neighbors(idx as usize)
                .map(|n| self.id(n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Accounts following `id`; empty if unknown
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(idx) => self
                .in_neighbors(idx as usize)
                .map(|n| self.id(n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether `src` follows `dst`; a hash lookup per identifier, then
    /// O(log out-degree) as in [`FollowGraph::has_edge_idx`]
    pub fn has_edge(&self, src: &str, dst: &str) -> bool {
        match (self.index_of(src), self.index_of(dst)) {
            (Some(s), Some(d)) => self.has_edge_idx(s as usize, d),
            _ => false,
        }
    }

    /// Iterate every edge as (source, target) indices, duplicates included
    pub fn edge_iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.node_count).flat_map(move |src| {
            self.outgoing_edges(src)
                .iter()
                .map(move |&dst| (src as u32, dst))
        })
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = (self.offsets.capacity() + self.reverse_offsets.capacity())
            * mem::size_of::<u32>();
        let edges =
            (self.edges.capacity() + self.reverse_edges.capacity()) * mem::size_of::<u32>();
        let ids = self.node_ids.iter().map(|s| s.capacity()).sum::<usize>() * 2;

        base + offsets + edges + ids + self.metadata.memory_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn sample() -> FollowGraph {
        let mut builder = GraphBuilder::new(false);
        for id in ["a", "b", "c"] {
            builder.add_node(id);
        }
        builder.add_edge("a", "b");
        builder.add_edge("a", "b");
        builder.add_edge("b", "a");
        builder.add_edge("c", "a");
        builder.build()
    }

    #[test]
    fn degrees_count_duplicates() {
        let graph = sample();
        assert_eq!(graph.out_degree("a"), 2);
        assert_eq!(graph.in_degree("b"), 2);
        assert_eq!(graph.in_degree("a"), 2);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn degree_sums_match_edge_count() {
        let graph = sample();
        let total_in: usize = (0..graph.node_count).map(|n| graph.in_degree_idx(n)).sum();
        let total_out: usize = (0..graph.node_count).map(|n| graph.out_degree_idx(n)).sum();
        assert_eq!(total_in, graph.edge_count());
        assert_eq!(total_out, graph.edge_count());
    }

    #[test]
    fn neighbour_sets_are_deduplicated() {
        let graph = sample();
        assert_eq!(graph.successors("a"), vec!["b"]);
        assert_eq!(graph.predecessors("a"), vec!["b", "c"]);
        assert!(graph.successors("zzz").is_empty());
        assert!(graph.predecessors("zzz").is_empty());
    }

    #[test]
    fn edge_lookup() {
        let graph = sample();
        assert!(graph.has_edge("c", "a"));
        assert!(!graph.has_edge("a", "c"));
        assert!(!graph.has_edge("a", "missing"));
    }
}
