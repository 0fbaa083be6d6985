//! Follow-graph JSON input
//!
//! The document maps each account identifier to a record listing the
//! accounts it follows. Missing or null fields fall back to empty values.

use crate::config::LoadOptions;
use crate::error::{GraphError, Result};
use crate::graph::{FollowGraph, GraphBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One account's entry in the input (and filtered output) document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Followed accounts; may repeat or name accounts that are not keys
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: Vec<String>,

    /// Account through which this one was discovered
    #[serde(default, deserialize_with = "null_as_default")]
    pub linked_from: String,

    /// Secondary identifier, carried through untouched
    #[serde(default, deserialize_with = "null_as_default")]
    pub did: String,
}

/// Whole input document, keyed by account identifier
pub type RawGraph = BTreeMap<String, AccountRecord>;

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse an input document from bytes
pub fn parse_raw_graph(bytes: &[u8]) -> Result<RawGraph> {
    serde_json::from_slice(bytes).map_err(|err| GraphError::malformed(err.to_string()))
}

/// Read and parse an input document
pub fn read_raw_graph(path: impl AsRef<Path>) -> Result<RawGraph> {
    let path = path.as_ref();
    log::info!("Reading follow graph: {}", path.display());

    let bytes = fs::read(path).map_err(|err| GraphError::io(path, err))?;
    let raw = parse_raw_graph(&bytes)?;

    log::info!("Loaded {} account records", raw.len());
    Ok(raw)
}

/// Build the follow graph described by a parsed document.
///
/// Top-level keys are known nodes. Edges to other identifiers are kept as
/// external nodes or dropped according to `options`.
pub fn to_follow_graph(raw: &RawGraph, options: &LoadOptions) -> FollowGraph {
    let mut builder = GraphBuilder::with_capacity(raw.len(), options.keep_external_targets);
    for account in raw.keys() {
        builder.add_node(account);
    }
    for (account, record) in raw {
        for target in &record.following {
            builder.add_edge(account, target);
        }
    }

    let graph = builder.build();
    log::info!(
        "Built graph with {} nodes and {} edges ({:.1} MiB)",
        graph.node_count,
        graph.edge_count(),
        graph.memory_usage() as f64 / (1024.0 * 1024.0)
    );
    graph
}

/// Read a document and build its graph
pub fn load_graph(path: impl AsRef<Path>, options: &LoadOptions) -> Result<(RawGraph, FollowGraph)> {
    let raw = read_raw_graph(path)?;
    let graph = to_follow_graph(&raw, options);
    Ok((raw, graph))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_default() {
        let raw = parse_raw_graph(
            br#"{
                "a": {"following": ["b"], "linked_from": "", "did": "did:plc:a"},
                "b": {},
                "c": {"following": null, "linked_from": null}
            }"#,
        )
        .unwrap();
        assert_eq!(raw["a"].following, vec!["b"]);
        assert_eq!(raw["a"].did, "did:plc:a");
        assert!(raw["b"].following.is_empty());
        assert!(raw["c"].following.is_empty());
        assert_eq!(raw["c"].linked_from, "");
    }

    #[test]
    fn wrong_types_are_malformed() {
        let docs: [&[u8]; 6] = [
            br#"[1, 2]"#,
            br#"{"a": {"following": "b"}}"#,
            br#"{"a": {"following": [1]}}"#,
            br#"{"a": 3}"#,
            br#"{"a": "#,
            b"",
        ];
        for doc in docs {
            let err = parse_raw_graph(doc).unwrap_err();
            assert!(matches!(err, GraphError::MalformedInput { .. }), "{err}");
        }
    }

    #[test]
    fn external_targets_follow_the_option() {
        let raw = parse_raw_graph(br#"{"a": {"following": ["b", "x", "b"]}, "b": {}}"#).unwrap();

        let dropped = to_follow_graph(&raw, &LoadOptions::default());
        assert_eq!(dropped.node_count, 2);
        assert_eq!(dropped.edge_count(), 2);

        let kept = to_follow_graph(
            &raw,
            &LoadOptions {
                keep_external_targets: true,
            },
        );
        assert_eq!(kept.node_count, 3);
        assert_eq!(kept.edge_count(), 3);
    }

    #[test]
    fn reads_documents_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("graph.json");
        fs::write(&path, br#"{"a": {"following": ["b"]}, "b": {}}"#).unwrap();
        let raw = read_raw_graph(&path).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["a"].following, vec!["b"]);

        let empty = dir.path().join("empty.json");
        fs::write(&empty, b"").unwrap();
        let err = read_raw_graph(&empty).unwrap_err();
        assert!(matches!(err, GraphError::MalformedInput { .. }), "{err}");

        let err = read_raw_graph(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }), "{err}");
    }

    #[test]
    fn target_listed_later_is_still_known() {
        let raw = parse_raw_graph(br#"{"a": {"following": ["z"]}, "z": {}}"#).unwrap();
        let graph = to_follow_graph(&raw, &LoadOptions::default());
        assert!(graph.has_edge("a", "z"));
    }
}
