//! Degree rankings

use crate::graph::FollowGraph;

/// Top `k` nodes by in-degree, descending, ties by identifier ascending
pub fn top_in_degree(graph: &FollowGraph, k: usize) -> Vec<(u32, usize)> {
    top_k_by(graph.node_count, k, |node| graph.in_degree_idx(node))
}

/// Top `k` nodes by out-degree, descending, ties by identifier ascending
pub fn top_out_degree(graph: &FollowGraph, k: usize) -> Vec<(u32, usize)> {
    top_k_by(graph.node_count, k, |node| graph.out_degree_idx(node))
}

fn top_k_by(node_count: usize, k: usize, degree: impl Fn(usize) -> usize) -> Vec<(u32, usize)> {
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(u32, usize)> = (0..node_count)
        .map(|node| (node as u32, degree(node)))
        .collect();

    // Node indices are in identifier order, so the index is the tie-break
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

/// Rank nodes by a floating-point score, descending, ties by identifier ascending
pub fn top_k_by_score(scores: &[f64], k: usize) -> Vec<(u32, f64)> {
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(u32, f64)> = scores
        .iter()
        .enumerate()
        .map(|(node, &score)| (node as u32, score))
        .collect();

    ranked.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}
