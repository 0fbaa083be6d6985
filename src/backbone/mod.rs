//! Backbone extraction: a size-capped subgraph that keeps the graph's shape
//!
//! Nodes are the union of four signals (hubs, bridges, reciprocal pair
//! endpoints, ego network) plus the root. When the union is over the node
//! cap it is trimmed by a priority score. Edges of the induced subgraph are
//! then ranked and capped.

use crate::config::BackboneConfig;
use crate::error::Result;
use crate::graph::algorithms::{ego_network, induced_subgraph};
use crate::graph::FollowGraph;
use crate::metrics::{betweenness, degree, reciprocity};

/// Priority weight of in-degree
pub const IN_DEGREE_WEIGHT: f64 = 1.0;
/// Priority weight of out-degree
pub const OUT_DEGREE_WEIGHT: f64 = 0.1;
/// Priority weight of normalized betweenness, scaled to compete with degree
pub const BETWEENNESS_WEIGHT: f64 = 5000.0;
/// Priority bonus for reciprocal pair endpoints
pub const RECIPROCAL_BONUS: f64 = 50.0;
/// Priority bonus for ego network members
pub const EGO_BONUS: f64 = 25.0;
/// Priority bonus that keeps the root above every other node
pub const ROOT_BONUS: f64 = 1e9;
/// Edge score bonus for edges whose reverse edge is also kept
pub const RECIPROCAL_EDGE_BONUS: usize = 3;

/// A kept edge, in indices of the source graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeptEdge {
    pub source: u32,
    pub target: u32,
    pub score: usize,
}

/// Output of backbone extraction
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneSelection {
    /// Kept nodes, ascending
    pub nodes: Vec<u32>,
    /// Kept edges, highest score first
    pub edges: Vec<KeptEdge>,
}

/// Per-node membership of each selection signal
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub hubs: Vec<bool>,
    pub bridges: Vec<bool>,
    pub reciprocal: Vec<bool>,
    pub ego: Vec<bool>,
    pub root: Option<u32>,
}

impl Signals {
    fn empty(node_count: usize) -> Self {
        Self {
            hubs: vec![false; node_count],
            bridges: vec![false; node_count],
            reciprocal: vec![false; node_count],
            ego: vec![false; node_count],
            root: None,
        }
    }

    /// Nodes carrying at least one signal, plus the root, ascending
    pub fn union(&self) -> Vec<u32> {
        (0..self.hubs.len())
            .filter(|&n| {
                self.hubs[n]
                    || self.bridges[n]
                    || self.reciprocal[n]
                    || self.ego[n]
                    || self.root == Some(n as u32)
            })
            .map(|n| n as u32)
            .collect()
    }
}

/// Compute betweenness (when enabled) and select the backbone
pub fn select_backbone(graph: &FollowGraph, config: &BackboneConfig) -> Result<BackboneSelection> {
    config.validate()?;

    let scores = if config.betweenness_k > 0 && config.top_bridge > 0 && !graph.is_empty() {
        betweenness::approximate_betweenness(graph, config.betweenness_k, config.betweenness_seed)
    } else {
        Vec::new()
    };

    let nodes = select_nodes(graph, config, &scores);
    let edges = select_edges(graph, &nodes, config.max_edges);

    log::info!(
        "Backbone keeps {} of {} nodes and {} of {} edges",
        nodes.len(),
        graph.node_count,
        edges.len(),
        graph.edge_count()
    );

    Ok(BackboneSelection { nodes, edges })
}

/// Gather the four selection signals.
///
/// `betweenness` is empty when bridges are disabled.
pub fn collect_signals(graph: &FollowGraph, config: &BackboneConfig, betweenness: &[f64]) -> Signals {
    let mut signals = Signals::empty(graph.node_count);

    for (node, _) in degree::top_in_degree(graph, config.top_in) {
        signals.hubs[node as usize] = true;
    }

    if config.top_bridge > 0 && !betweenness.is_empty() {
        for (node, _) in degree::top_k_by_score(betweenness, config.top_bridge) {
            signals.bridges[node as usize] = true;
        }
    }

    if config.reciprocal_pairs > 0 {
        for pair in reciprocity::reciprocal_pairs(graph)
            .into_iter()
            .take(config.reciprocal_pairs)
        {
            signals.reciprocal[pair.a as usize] = true;
            signals.reciprocal[pair.b as usize] = true;
        }
    }

    signals.root = config.root.as_deref().and_then(|root| graph.index_of(root));
    if let Some(root) = signals.root {
        if config.ego_hops > 0 {
            for node in ego_network(graph, root, config.ego_hops) {
                signals.ego[node as usize] = true;
            }
        }
    } else if config.root.is_some() {
        log::info!("Root account is not in the graph; ego network skipped");
    }

    signals
}

/// Trimming priority of a node
pub fn priority(graph: &FollowGraph, signals: &Signals, betweenness: &[f64], node: u32) -> f64 {
    let idx = node as usize;
    let mut score = graph.in_degree_idx(idx) as f64 * IN_DEGREE_WEIGHT
        + graph.out_degree_idx(idx) as f64 * OUT_DEGREE_WEIGHT
        + betweenness.get(idx).copied().unwrap_or(0.0) * BETWEENNESS_WEIGHT;
    if signals.reciprocal[idx] {
        score += RECIPROCAL_BONUS;
    }
    if signals.ego[idx] {
        score += EGO_BONUS;
    }
    if signals.root == Some(node) {
        score += ROOT_BONUS;
    }
    score
}

/// Select the capped node set, ascending
pub fn select_nodes(graph: &FollowGraph, config: &BackboneConfig, betweenness: &[f64]) -> Vec<u32> {
    let signals = collect_signals(graph, config, betweenness);
    let mut keep = signals.union();

    if keep.len() > config.max_nodes {
        log::info!(
            "Trimming {} candidate nodes to the cap of {}",
            keep.len(),
            config.max_nodes
        );
        let mut ranked: Vec<(u32, f64)> = keep
            .iter()
            .map(|&node| (node, priority(graph, &signals, betweenness, node)))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(config.max_nodes);

        keep = ranked.into_iter().map(|(node, _)| node).collect();
        keep.sort_unstable();
    }

    keep
}

/// Rank the edges of the subgraph induced by `nodes` and keep the best
/// `max_edges`.
///
/// Score = in-degree of both endpoints within the induced subgraph, plus a
/// bonus when the reverse edge is also present there. Parallel edges count
/// once. Ties are broken by (source, target) ascending.
pub fn select_edges(graph: &FollowGraph, nodes: &[u32], max_edges: usize) -> Vec<KeptEdge> {
    if nodes.is_empty() || max_edges == 0 {
        return Vec::new();
    }

    let mut nodes = nodes.to_vec();
    nodes.sort_unstable();
    nodes.dedup();
    let sub = induced_subgraph(graph, &nodes);

    let mut scored: Vec<KeptEdge> = Vec::with_capacity(sub.edge_count());
    for u in 0..sub.node_count {
        for v in sub.out_neighbors(u) {
            let mut score = sub.in_degree_idx(u) + sub.in_degree_idx(v as usize);
            if sub.has_edge_idx(v as usize, u as u32) {
                score += RECIPROCAL_EDGE_BONUS;
            }
            // Subgraph indices map back through the sorted keep list
            scored.push(KeptEdge {
                source: nodes[u],
                target: nodes[v as usize],
                score,
            });
        }
    }

    scored.sort_unstable_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.source.cmp(&b.source))
            .then(a.target.cmp(&b.target))
    });
    if scored.len() > max_edges {
        log::info!("Trimming {} induced edges to the cap of {}", scored.len(), max_edges);
        scored.truncate(max_edges);
    }
    scored
}
