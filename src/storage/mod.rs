//! Results persistence module
//!
//! Shapes metric and backbone results into the two JSON payloads: the
//! structural report and the filtered adjacency document.

pub mod report;

use crate::backbone::BackboneSelection;
use crate::data::{AccountRecord, RawGraph};
use crate::error::{GraphError, Result};
use crate::graph::FollowGraph;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::collections::{HashMap, VecDeque};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use report::{build_report, AnalysisReport};

/// Save the structural report
pub fn save_report(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<()> {
    log::info!("Saving analysis report to {}", path.as_ref().display());
    write_json(report, path.as_ref())
}

/// Assemble the filtered adjacency document for a backbone selection.
///
/// Every kept node gets a record; `following` lists kept edges only,
/// sorted. `linked_from` is the first parent found by a breadth-first walk
/// from `root` over the kept edges (highest scoring edges first), or blank
/// when there is no root or it was not kept. `did` is copied from the input
/// record when the account had one.
pub fn filtered_adjacency(
    graph: &FollowGraph,
    raw: &RawGraph,
    selection: &BackboneSelection,
    root: Option<&str>,
) -> RawGraph {
    let mut following: HashMap<u32, Vec<u32>> = HashMap::with_capacity(selection.nodes.len());
    for edge in &selection.edges {
        following.entry(edge.source).or_default().push(edge.target);
    }

    let mut linked_from: HashMap<u32, u32> = HashMap::new();
    let root = root
        .and_then(|id| graph.index_of(id))
        .filter(|idx| selection.nodes.binary_search(idx).is_ok());
    if let Some(root) = root {
        let mut queue = VecDeque::from([root]);
        let mut seen = vec![false; graph.node_count];
        seen[root as usize] = true;
        while let Some(node) = queue.pop_front() {
            for &next in following.get(&node).map(Vec::as_slice).unwrap_or_default() {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    linked_from.insert(next, node);
                    queue.push_back(next);
                }
            }
        }
    }

    selection
        .nodes
        .iter()
        .map(|&node| {
            let id = graph.id(node);
            let mut targets: Vec<String> = following
                .get(&node)
                .map(|targets| targets.iter().map(|&t| graph.id(t).to_string()).collect())
                .unwrap_or_default();
            targets.sort_unstable();

            let record = AccountRecord {
                following: targets,
                linked_from: linked_from
                    .get(&node)
                    .map(|&parent| graph.id(parent).to_string())
                    .unwrap_or_default(),
                did: raw.get(id).map(|r| r.did.clone()).unwrap_or_default(),
            };
            (id.to_string(), record)
        })
        .collect()
}

/// Save a filtered adjacency document (keys sorted)
pub fn save_filtered_graph(filtered: &RawGraph, path: impl AsRef<Path>) -> Result<()> {
    log::info!(
        "Saving filtered graph with {} accounts to {}",
        filtered.len(),
        path.as_ref().display()
    );
    write_json(filtered, path.as_ref())
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| GraphError::io(parent, err))?;
    }

    let body = to_string_pretty(value).map_err(GraphError::Serialize)?;
    let mut file = File::create(path).map_err(|err| GraphError::io(path, err))?;
    file.write_all(body.as_bytes())
        .map_err(|err| GraphError::io(path, err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backbone::KeptEdge;
    use crate::data::input::{parse_raw_graph, to_follow_graph};
    use crate::config::LoadOptions;

    fn fixture() -> (RawGraph, FollowGraph) {
        let raw = parse_raw_graph(
            br#"{
                "root": {"following": ["a", "b"], "did": "did:root"},
                "a": {"following": ["c", "root"]},
                "b": {"following": ["c"]},
                "c": {"following": ["zz"]}
            }"#,
        )
        .unwrap();
        let graph = to_follow_graph(&raw, &LoadOptions::default());
        (raw, graph)
    }

    fn edge(graph: &FollowGraph, source: &str, target: &str, score: usize) -> KeptEdge {
        KeptEdge {
            source: graph.index_of(source).unwrap(),
            target: graph.index_of(target).unwrap(),
            score,
        }
    }

    #[test]
    fn linked_from_follows_kept_edges_from_root() {
        let (raw, graph) = fixture();
        let selection = BackboneSelection {
            nodes: (0..graph.node_count as u32).collect(),
            edges: vec![
                edge(&graph, "b", "c", 9),
                edge(&graph, "root", "b", 8),
                edge(&graph, "root", "a", 7),
                edge(&graph, "a", "c", 6),
            ],
        };
        let out = filtered_adjacency(&graph, &raw, &selection, Some("root"));

        assert_eq!(out["root"].following, vec!["a", "b"]);
        assert_eq!(out["root"].linked_from, "");
        assert_eq!(out["root"].did, "did:root");
        assert_eq!(out["a"].linked_from, "root");
        assert_eq!(out["b"].linked_from, "root");
        // b is dequeued before a, so b claims c
        assert_eq!(out["c"].linked_from, "b");
        assert!(out["c"].following.is_empty());
    }

    #[test]
    fn no_root_means_blank_links() {
        let (raw, graph) = fixture();
        let selection = BackboneSelection {
            nodes: vec![graph.index_of("a").unwrap(), graph.index_of("c").unwrap()],
            edges: vec![edge(&graph, "a", "c", 1)],
        };
        let out = filtered_adjacency(&graph, &raw, &selection, None);
        assert_eq!(out.len(), 2);
        assert!(out.values().all(|r| r.linked_from.is_empty()));
        assert_eq!(out["a"].following, vec!["c"]);

        // A root outside the kept set behaves the same
        let out = filtered_adjacency(&graph, &raw, &selection, Some("root"));
        assert!(out.values().all(|r| r.linked_from.is_empty()));
    }

    #[test]
    fn filtered_graph_round_trips_through_disk() {
        let (raw, graph) = fixture();
        let selection = BackboneSelection {
            nodes: (0..graph.node_count as u32).collect(),
            edges: vec![edge(&graph, "root", "a", 1)],
        };
        let out = filtered_adjacency(&graph, &raw, &selection, Some("root"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("filtered.json");
        save_filtered_graph(&out, &path).unwrap();

        let reread = crate::data::input::read_raw_graph(&path).unwrap();
        assert_eq!(reread, out);
    }
}
