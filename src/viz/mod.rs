//! Processing-compatible XML export
//!
//! `<graph>` holds one `<node id=".."/>` per account, sorted, followed by
//! one `<edge source=".." target=".."/>` per follow edge.

use crate::backbone::BackboneSelection;
use crate::data::RawGraph;
use crate::error::{GraphError, Result};
use crate::graph::FollowGraph;
use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write nodes and edges as Processing XML
pub fn write_processing_xml<'a, N, E>(path: impl AsRef<Path>, nodes: N, edges: E) -> Result<()>
where
    N: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| GraphError::io(parent, err))?;
    }

    let file = File::create(path).map_err(|err| GraphError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    render(&mut writer, nodes, edges)
        .and_then(|_| writer.flush())
        .map_err(|err| GraphError::io(path, err))?;

    log::info!("Wrote Processing XML to {}", path.display());
    Ok(())
}

fn render<'a, W, N, E>(out: &mut W, nodes: N, edges: E) -> std::io::Result<()>
where
    W: Write,
    N: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut sorted: Vec<&str> = nodes.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    writeln!(out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
    writeln!(out, "<graph>")?;
    for node in sorted {
        writeln!(out, "  <node id=\"{}\"/>", escape(node))?;
    }
    for (source, target) in edges {
        writeln!(
            out,
            "  <edge source=\"{}\" target=\"{}\"/>",
            escape(source),
            escape(target)
        )?;
    }
    writeln!(out, "</graph>")?;
    Ok(())
}

/// Escape a string for use inside a double-quoted attribute
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Export a backbone selection; edges keep their selection order
pub fn write_backbone_xml(
    path: impl AsRef<Path>,
    graph: &FollowGraph,
    selection: &BackboneSelection,
) -> Result<()> {
    write_processing_xml(
        path,
        selection.nodes.iter().map(|&n| graph.id(n)),
        selection
            .edges
            .iter()
            .map(|e| (graph.id(e.source), graph.id(e.target))),
    )
}

/// Export a raw input document.
///
/// Follow targets that are not keys are emitted as nodes when
/// `include_external_nodes` is set and skipped otherwise. With
/// `dedupe_edges`, repeated (source, target) pairs are written once.
pub fn write_raw_graph_xml(
    path: impl AsRef<Path>,
    raw: &RawGraph,
    include_external_nodes: bool,
    dedupe_edges: bool,
) -> Result<()> {
    let mut nodes: BTreeSet<&str> = raw.keys().map(String::as_str).collect();
    if include_external_nodes {
        for record in raw.values() {
            nodes.extend(record.following.iter().map(String::as_str));
        }
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let edges = raw.iter().flat_map(|(source, record)| {
        record
            .following
            .iter()
            .map(move |target| (source.as_str(), target.as_str()))
    });
    let edges: Vec<(&str, &str)> = edges
        .filter(|(_, target)| nodes.contains(target))
        .filter(|&edge| !dedupe_edges || seen.insert(edge))
        .collect();

    write_processing_xml(path, nodes.iter().copied(), edges)
}
