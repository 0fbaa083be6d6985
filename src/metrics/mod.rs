//! Structural metrics over a follow graph
//!
//! The five computations are independent pure functions of the graph.
//! [`analyze`] runs them concurrently; each task owns its result until the
//! join.

pub mod betweenness;
pub mod cofollow;
pub mod components;
pub mod degree;
pub mod reciprocity;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::graph::FollowGraph;

/// Two accounts following each other; `a < b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReciprocalPair {
    pub a: u32,
    pub b: u32,
    /// Combined in-degree of both accounts
    pub score: usize,
}

/// Two accounts with overlapping following sets; `a < b`
#[derive(Debug, Clone, PartialEq)]
pub struct CoFollowPair {
    pub a: u32,
    pub b: u32,
    /// Targets followed by both (from the capped inverted index)
    pub shared: usize,
    /// Exact Jaccard index of the full following sets
    pub jaccard: f64,
}

/// A strongly connected component; members ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub members: Vec<u32>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Everything the structural report is assembled from
#[derive(Debug, Clone)]
pub struct Analysis {
    pub top_in_degree: Vec<(u32, usize)>,
    pub top_out_degree: Vec<(u32, usize)>,
    /// Total number of reciprocal pairs, before truncation
    pub reciprocal_count: usize,
    pub top_reciprocals: Vec<ReciprocalPair>,
    pub top_cofollow: Vec<CoFollowPair>,
    /// Empty when betweenness is disabled
    pub betweenness: Vec<f64>,
    pub top_bridges: Vec<(u32, f64)>,
    /// All components, largest first
    pub components: Vec<Component>,
}

/// Run every metric over `graph`
pub fn analyze(graph: &FollowGraph, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    log::info!(
        "Analyzing graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );

    let top = config.top;
    let (((top_in_degree, top_out_degree), reciprocals), ((top_cofollow, betweenness), components)) =
        rayon::join(
            || {
                rayon::join(
                    || {
                        (
                            degree::top_in_degree(graph, top),
                            degree::top_out_degree(graph, top),
                        )
                    },
                    || reciprocity::reciprocal_pairs(graph),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || {
                                cofollow::cofollow_pairs(
                                    graph,
                                    config.min_shared,
                                    top,
                                    config.follower_cap,
                                )
                            },
                            || {
                                betweenness::approximate_betweenness(
                                    graph,
                                    config.betweenness_k,
                                    config.betweenness_seed,
                                )
                            },
                        )
                    },
                    || components::strongly_connected_components(graph),
                )
            },
        );

    let reciprocal_count = reciprocals.len();
    let top_reciprocals = reciprocals.into_iter().take(top).collect();
    let top_bridges = degree::top_k_by_score(&betweenness, top);

    log::info!(
        "Found {} reciprocal pairs, {} co-follow pairs, {} components",
        reciprocal_count,
        top_cofollow.len(),
        components.len()
    );

    Ok(Analysis {
        top_in_degree,
        top_out_degree,
        reciprocal_count,
        top_reciprocals,
        top_cofollow,
        betweenness,
        top_bridges,
        components,
    })
}
