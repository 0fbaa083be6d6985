//! Structural report payload

use crate::config::AnalysisConfig;
use crate::graph::FollowGraph;
use crate::metrics::Analysis;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub nodes: usize,
    pub edges: usize,
    pub reciprocal_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InDegreeEntry {
    pub node: String,
    pub in_degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutDegreeEntry {
    pub node: String,
    pub out_degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReciprocalEntry {
    pub a: String,
    pub b: String,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoFollowEntry {
    pub a: String,
    pub b: String,
    pub shared: usize,
    pub jaccard: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeEntry {
    pub node: String,
    pub betweenness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentEntry {
    /// Full component size
    pub size: usize,
    /// Members, possibly truncated for display
    pub nodes: Vec<String>,
}

/// The analysis report as written to disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub top_in_degree: Vec<InDegreeEntry>,
    pub top_out_degree: Vec<OutDegreeEntry>,
    pub top_reciprocals: Vec<ReciprocalEntry>,
    pub top_cofollow_pairs: Vec<CoFollowEntry>,
    pub top_bridges_betweenness: Vec<BridgeEntry>,
    pub top_strongly_connected_components: Vec<ComponentEntry>,
}

/// Resolve node indices to identifiers and shape the report sections.
///
/// Only components with more than one member are listed.
pub fn build_report(graph: &FollowGraph, analysis: &Analysis, config: &AnalysisConfig) -> AnalysisReport {
    let name = |node: u32| graph.id(node).to_string();

    AnalysisReport {
        summary: Summary {
            nodes: graph.node_count,
            edges: graph.edge_count(),
            reciprocal_pairs: analysis.reciprocal_count,
        },
        top_in_degree: analysis
            .top_in_degree
            .iter()
            .map(|&(node, in_degree)| InDegreeEntry {
                node: name(node),
                in_degree,
            })
            .collect(),
        top_out_degree: analysis
            .top_out_degree
            .iter()
            .map(|&(node, out_degree)| OutDegreeEntry {
                node: name(node),
                out_degree,
            })
            .collect(),
        top_reciprocals: analysis
            .top_reciprocals
            .iter()
            .map(|pair| ReciprocalEntry {
                a: name(pair.a),
                b: name(pair.b),
                score: pair.score,
            })
            .collect(),
        top_cofollow_pairs: analysis
            .top_cofollow
            .iter()
            .map(|pair| CoFollowEntry {
                a: name(pair.a),
                b: name(pair.b),
                shared: pair.shared,
                jaccard: pair.jaccard,
            })
            .collect(),
        top_bridges_betweenness: analysis
            .top_bridges
            .iter()
            .map(|&(node, betweenness)| BridgeEntry {
                node: name(node),
                betweenness,
            })
            .collect(),
        top_strongly_connected_components: analysis
            .components
            .iter()
            .take(config.scc_limit)
            .filter(|component| component.len() > 1)
            .map(|component| ComponentEntry {
                size: component.len(),
                nodes: component
                    .members
                    .iter()
                    .take(config.scc_member_limit)
                    .map(|&node| name(node))
                    .collect(),
            })
            .collect(),
    }
}
