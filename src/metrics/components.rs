//! Strongly connected components

use crate::graph::FollowGraph;
use crate::metrics::Component;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

/// Partition the graph into strongly connected components.
///
/// Members of each component are ascending; components are ordered by size
/// descending, then by their lowest member. Singletons are included.
pub fn strongly_connected_components(graph: &FollowGraph) -> Vec<Component> {
    let mut digraph: DiGraph<(), (), u32> = DiGraph::with_capacity(graph.node_count, graph.edge_count());
    for _ in 0..graph.node_count {
        digraph.add_node(());
    }
    digraph.extend_with_edges(graph.edge_iter());

    let mut components: Vec<Component> = tarjan_scc(&digraph)
        .into_iter()
        .map(|scc| {
            let mut members: Vec<u32> = scc.into_iter().map(|idx| idx.index() as u32).collect();
            members.sort_unstable();
            Component { members }
        })
        .collect();

    components.sort_unstable_by(|x, y| {
        y.members
            .len()
            .cmp(&x.members.len())
            .then(x.members.first().cmp(&y.members.first()))
    });

    log::debug!(
        "Found {} strongly connected components ({} non-trivial)",
        components.len(),
        components.iter().filter(|c| c.len() > 1).count()
    );

    components
}
