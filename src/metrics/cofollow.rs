//! Co-follow similarity between accounts
//!
//! Comparing every pair of accounts is quadratic, so shared targets are
//! counted through the inverted index instead: the follower list of each
//! target is exactly the reverse adjacency row of the graph. Every pair of
//! followers of a target shares that target.
//!
//! A single target with a very large follower list would still produce a
//! quadratic number of pairs. Follower lists longer than `follower_cap` are
//! truncated (lowest identifiers kept) before pairs are generated. Shared
//! counts are then exact only for pairs whose common targets were all under
//! the cap; this loss of recall is the price of a bounded worst case.

use crate::graph::FollowGraph;
use crate::metrics::CoFollowPair;
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashMap;

/// Jaccard index of two sorted, deduplicated sets; 0.0 when both are empty
pub fn jaccard(a: &[u32], b: &[u32]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let inter = intersection_size(a, b);
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

fn intersection_size(a: &[u32], b: &[u32]) -> usize {
    a.iter()
        .merge_join_by(b.iter(), |x, y| x.cmp(y))
        .filter(|either| either.is_both())
        .count()
}

/// Count shared follow targets for every pair of accounts that share one.
///
/// Keys are `(a, b)` with `a < b`.
pub fn shared_counts(graph: &FollowGraph, follower_cap: usize) -> HashMap<(u32, u32), u32> {
    let capped = (0..graph.node_count)
        .filter(|&target| graph.in_neighbors(target).count() > follower_cap)
        .count();
    if capped > 0 {
        log::debug!(
            "{} targets exceed the follower cap of {} and were truncated",
            capped,
            follower_cap
        );
    }

    (0..graph.node_count)
        .into_par_iter()
        .fold(HashMap::new, |mut counts: HashMap<(u32, u32), u32>, target| {
            let followers: Vec<u32> = graph.in_neighbors(target).take(follower_cap).collect();
            if followers.len() >= 2 {
                // Followers are ascending, so each combination is already (low, high)
                for (a, b) in followers.iter().copied().tuple_combinations::<(u32, u32)>() {
                    *counts.entry((a, b)).or_insert(0) += 1;
                }
            }
            counts
        })
        .reduce(HashMap::new, |left, right| {
            // Fold the smaller map into the larger one
            if left.len() >= right.len() {
                merge_counts(left, right)
            } else {
                merge_counts(right, left)
            }
        })
}

fn merge_counts(
    mut into: HashMap<(u32, u32), u32>,
    from: HashMap<(u32, u32), u32>,
) -> HashMap<(u32, u32), u32> {
    for (pair, count) in from {
        *into.entry(pair).or_insert(0) += count;
    }
    into
}

/// Most similar account pairs by shared follow targets.
///
/// Candidates are scanned in descending shared-count order (ties by pair
/// ascending). The scan ends at the first candidate below `min_shared`, or
/// once `top` pairs have been emitted. Jaccard uses the full following
/// sets, not the capped follower lists.
pub fn cofollow_pairs(
    graph: &FollowGraph,
    min_shared: usize,
    top: usize,
    follower_cap: usize,
) -> Vec<CoFollowPair> {
    if top == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<((u32, u32), u32)> = shared_counts(graph, follower_cap)
        .into_iter()
        .filter(|&(_, shared)| shared as usize >= min_shared)
        .collect();
    candidates.sort_unstable_by(|x, y| y.1.cmp(&x.1).then(x.0.cmp(&y.0)));

    log::debug!("{} co-follow candidates meet the floor of {}", candidates.len(), min_shared);

    let following = |node: u32| -> Vec<u32> { graph.out_neighbors(node as usize).collect() };

    let mut pairs = Vec::new();
    for ((a, b), shared) in candidates {
        if (shared as usize) < min_shared {
            break;
        }
        pairs.push(CoFollowPair {
            a,
            b,
            shared: shared as usize,
            jaccard: jaccard(&following(a), &following(b)),
        });
        if pairs.len() >= top {
            break;
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FOLLOWER_CAP;
    use crate::graph::builder::build;
    use rstest::rstest;

    #[rstest]
    #[case(&[], &[], 0.0)]
    #[case(&[1, 2], &[1, 2], 1.0)]
    #[case(&[1, 2], &[3], 0.0)]
    #[case(&[1, 2, 3], &[2, 3, 4], 0.5)]
    #[case(&[], &[7], 0.0)]
    fn jaccard_index(#[case] a: &[u32], #[case] b: &[u32], #[case] expected: f64) {
        assert!((jaccard(a, b) - expected).abs() < 1e-12);
    }

    #[test]
    fn three_identical_followers_pair_up() {
        let graph = build(
            ["p", "q", "r", "x", "y"],
            [
                ("p", "x"),
                ("p", "y"),
                ("q", "x"),
                ("q", "y"),
                ("r", "x"),
                ("r", "y"),
            ],
            false,
        );
        let pairs = cofollow_pairs(&graph, 2, 50, DEFAULT_FOLLOWER_CAP);
        let names: Vec<(&str, &str, usize)> = pairs
            .iter()
            .map(|p| (graph.id(p.a), graph.id(p.b), p.shared))
            .collect();
        assert_eq!(names, vec![("p", "q", 2), ("p", "r", 2), ("q", "r", 2)]);
        assert!(pairs.iter().all(|p| p.jaccard == 1.0));
    }

    #[test]
    fn shared_count_matches_set_intersection_without_cap() {
        let graph = build(
            ["a", "b", "t1", "t2", "t3", "t4"],
            [
                ("a", "t1"),
                ("a", "t2"),
                ("a", "t3"),
                ("b", "t2"),
                ("b", "t3"),
                ("b", "t4"),
                ("b", "t4"),
            ],
            false,
        );
        let counts = shared_counts(&graph, DEFAULT_FOLLOWER_CAP);
        let a = graph.index_of("a").unwrap();
        let b = graph.index_of("b").unwrap();
        assert_eq!(counts.get(&(a, b)), Some(&2));

        let pairs = cofollow_pairs(&graph, 1, 10, DEFAULT_FOLLOWER_CAP);
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].jaccard - 0.5).abs() < 1e-12);
    }

    #[test]
    fn floor_ends_the_scan() {
        let graph = build(
            ["a", "b", "c", "x", "y"],
            [("a", "x"), ("a", "y"), ("b", "x"), ("b", "y"), ("c", "x")],
            false,
        );
        let pairs = cofollow_pairs(&graph, 2, 10, DEFAULT_FOLLOWER_CAP);
        assert_eq!(pairs.len(), 1);
        assert_eq!((graph.id(pairs[0].a), graph.id(pairs[0].b)), ("a", "b"));
    }

    #[test]
    fn top_limits_results() {
        let graph = build(
            ["p", "q", "r", "x"],
            [("p", "x"), ("q", "x"), ("r", "x")],
            false,
        );
        assert_eq!(cofollow_pairs(&graph, 1, 2, DEFAULT_FOLLOWER_CAP).len(), 2);
        assert!(cofollow_pairs(&graph, 1, 0, DEFAULT_FOLLOWER_CAP).is_empty());
    }

    #[test]
    fn follower_cap_truncates_pair_generation() {
        let graph = build(
            ["p", "q", "r", "x"],
            [("p", "x"), ("q", "x"), ("r", "x")],
            false,
        );
        // Only p and q survive the cap of 2
        let counts = shared_counts(&graph, 2);
        assert_eq!(counts.len(), 1);
        let p = graph.index_of("p").unwrap();
        let q = graph.index_of("q").unwrap();
        assert_eq!(counts.get(&(p, q)), Some(&1));
    }
}
