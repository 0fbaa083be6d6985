//! Approximate betweenness centrality by pivot sampling
//!
//! Exact betweenness needs a shortest-path search from every node. Here
//! only `k` pivots, drawn with a seeded RNG, run Brandes' dependency
//! accumulation; their sum is rescaled by `n / k`. With `k = n` the result
//! is exact.

use crate::graph::FollowGraph;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Pivots handled sequentially by one task. Fixed, so that partial sums are
/// formed and added in the same order whatever the thread count.
const PIVOTS_PER_TASK: usize = 16;

/// Normalized approximate betweenness per node, in [0, 1].
///
/// Returns an empty vector when `k == 0` or the graph is empty. `k` is
/// clamped to the node count. Duplicate edges do not add shortest paths.
pub fn approximate_betweenness(graph: &FollowGraph, k: usize, seed: u64) -> Vec<f64> {
    let n = graph.node_count;
    if k == 0 || n == 0 {
        return Vec::new();
    }
    let k = k.min(n);

    let mut rng = StdRng::seed_from_u64(seed);
    let pivots = rand::seq::index::sample(&mut rng, n, k).into_vec();

    log::info!("Estimating betweenness from {} of {} pivots", k, n);

    let partials: Vec<Vec<f64>> = pivots
        .par_chunks(PIVOTS_PER_TASK)
        .map(|chunk| {
            let mut scratch = Scratch::new(n);
            let mut centrality = vec![0.0; n];
            for &source in chunk {
                accumulate_dependencies(graph, source, &mut scratch, &mut centrality);
            }
            centrality
        })
        .collect();

    let mut centrality = vec![0.0; n];
    for partial in partials {
        for (total, value) in centrality.iter_mut().zip(partial) {
            *total += value;
        }
    }

    // Directed normalization 1/((n-1)(n-2)), then the sampling ratio
    if n > 2 {
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64) * (n as f64 / k as f64);
        for value in &mut centrality {
            *value = (*value * scale).clamp(0.0, 1.0);
        }
    }

    centrality
}

/// Per-search buffers, reused across pivots
struct Scratch {
    sigma: Vec<f64>,
    dist: Vec<i64>,
    delta: Vec<f64>,
    order: Vec<u32>,
    queue: VecDeque<u32>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self {
            sigma: vec![0.0; n],
            dist: vec![-1; n],
            delta: vec![0.0; n],
            order: Vec::with_capacity(n),
            queue: VecDeque::new(),
        }
    }

    fn reset(&mut self) {
        // Only nodes reached by the previous search were touched
        for &node in &self.order {
            let node = node as usize;
            self.sigma[node] = 0.0;
            self.dist[node] = -1;
            self.delta[node] = 0.0;
        }
        self.order.clear();
        self.queue.clear();
    }
}

/// Single-source Brandes pass: BFS counting shortest paths, then dependency
/// accumulation in reverse BFS order. Predecessors are found through the
/// reverse adjacency instead of being stored.
fn accumulate_dependencies(
    graph: &FollowGraph,
    source: usize,
    scratch: &mut Scratch,
    centrality: &mut [f64],
) {
    scratch.reset();

    scratch.sigma[source] = 1.0;
    scratch.dist[source] = 0;
    scratch.queue.push_back(source as u32);

    while let Some(v) = scratch.queue.pop_front() {
        scratch.order.push(v);
        let v = v as usize;
        let next = scratch.dist[v] + 1;
        for w in graph.out_neighbors(v) {
            let w = w as usize;
            if scratch.dist[w] < 0 {
                scratch.dist[w] = next;
                scratch.queue.push_back(w as u32);
            }
            if scratch.dist[w] == next {
                scratch.sigma[w] += scratch.sigma[v];
            }
        }
    }

    for &w in scratch.order.iter().rev() {
        let w = w as usize;
        let coefficient = (1.0 + scratch.delta[w]) / scratch.sigma[w];
        for v in graph.in_neighbors(w) {
            let v = v as usize;
            if scratch.dist[v] >= 0 && scratch.dist[v] + 1 == scratch.dist[w] {
                scratch.delta[v] += scratch.sigma[v] * coefficient;
            }
        }
        if w != source {
            centrality[w] += scratch.delta[w];
        }
    }
}
