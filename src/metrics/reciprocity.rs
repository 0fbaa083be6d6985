//! Reciprocal (mutual follow) pair detection and ranking

use crate::graph::algorithms::find_mutual_follows;
use crate::graph::FollowGraph;
use crate::metrics::ReciprocalPair;

/// Every reciprocal pair, ranked by combined in-degree.
///
/// Each unordered pair appears once with `a < b`. Ties are broken by
/// `(a, b)` ascending.
pub fn reciprocal_pairs(graph: &FollowGraph) -> Vec<ReciprocalPair> {
    let mut pairs: Vec<ReciprocalPair> = find_mutual_follows(graph)
        .into_iter()
        .map(|(a, b)| ReciprocalPair {
            a,
            b,
            score: graph.in_degree_idx(a as usize) + graph.in_degree_idx(b as usize),
        })
        .collect();

    pairs.sort_unstable_by(|x, y| {
        y.score
            .cmp(&x.score)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::build;

    #[test]
    fn pair_requires_both_directions() {
        let graph = build(
            ["a", "b", "c"],
            [("a", "b"), ("b", "a"), ("a", "c")],
            false,
        );
        let pairs = reciprocal_pairs(&graph);
        assert_eq!(pairs.len(), 1);
        assert_eq!(graph.id(pairs[0].a), "a");
        assert_eq!(graph.id(pairs[0].b), "b");
        assert_eq!(pairs[0].score, 2);
    }

    #[test]
    fn ranked_by_combined_in_degree() {
        // c and d are followed by extra accounts, so their pair ranks first
        let graph = build(
            ["a", "b", "c", "d", "e"],
            [
                ("a", "b"),
                ("b", "a"),
                ("c", "d"),
                ("d", "c"),
                ("e", "c"),
                ("e", "d"),
            ],
            false,
        );
        let pairs = reciprocal_pairs(&graph);
        let names: Vec<(&str, &str, usize)> = pairs
            .iter()
            .map(|p| (graph.id(p.a), graph.id(p.b), p.score))
            .collect();
        assert_eq!(names, vec![("c", "d", 4), ("a", "b", 2)]);
    }

    #[test]
    fn self_follow_is_not_a_pair() {
        let graph = build(["a", "b"], [("a", "a"), ("b", "b"), ("a", "b")], false);
        assert!(reciprocal_pairs(&graph).is_empty());

        // A self-follow does not disturb a real pair
        let graph = build(["a", "b"], [("a", "a"), ("a", "b"), ("b", "a")], false);
        let pairs = reciprocal_pairs(&graph);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 1));
        assert_eq!(pairs[0].score, 3);
    }

    #[test]
    fn repeated_runs_agree() {
        let graph = build(
            ["x", "y", "z"],
            [("x", "y"), ("y", "x"), ("y", "z"), ("z", "y"), ("z", "x")],
            false,
        );
        assert_eq!(reciprocal_pairs(&graph), reciprocal_pairs(&graph));
    }
}
