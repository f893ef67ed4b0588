//! Up to K distinct simple paths between two nodes, cheapest first.
//!
//! Frontier expansion over partial paths ordered by accumulated weight, FIFO
//! within equal weight. A partial path never revisits one of its own nodes,
//! but nothing is deduplicated across partial paths, so the frontier grows
//! exponentially on dense or highly cyclic graphs. That is acceptable for a
//! fixed lot of a few dozen nodes and is not meant for road-network scale.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{LotGraph, ParkingError, Route};

/// Partial path on the frontier, ordered lowest weight first then FIFO.
struct PartialPath {
    nodes: Vec<usize>,
    weight: f64,
    seq: u64,
}

impl PartialEq for PartialPath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PartialPath {}

impl PartialOrd for PartialPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PartialPath {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for max-heap: lighter first, then earlier insertion.
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Enumerate up to `k` simple paths from `start` to `end`, ascending by weight.
///
/// The first path returned is a shortest path. When `start == end` the only
/// path is the single-node one.
pub fn k_shortest_paths(
    graph: &LotGraph,
    start: &str,
    end: &str,
    k: usize,
) -> Result<Vec<Route>, ParkingError> {
    let start_idx = graph
        .index_of(start)
        .ok_or_else(|| ParkingError::NotFound(format!("node `{start}`")))?;
    let end_idx = graph
        .index_of(end)
        .ok_or_else(|| ParkingError::NotFound(format!("node `{end}`")))?;

    let mut accepted = Vec::with_capacity(k.min(16));
    let mut frontier = BinaryHeap::new();
    let mut seq = 0_u64;
    frontier.push(PartialPath {
        nodes: vec![start_idx],
        weight: 0.0,
        seq,
    });

    while accepted.len() < k {
        let Some(partial) = frontier.pop() else { break };
        let last = partial.nodes[partial.nodes.len() - 1];

        if last == end_idx {
            accepted.push(Route {
                path: partial
                    .nodes
                    .iter()
                    .map(|&i| graph.id_at(i).clone())
                    .collect(),
                weight: partial.weight,
            });
            continue;
        }

        for &(next, weight) in graph.neighbors_at(last) {
            if partial.nodes.contains(&next) {
                continue;
            }
            seq += 1;
            let mut nodes = Vec::with_capacity(partial.nodes.len() + 1);
            nodes.extend_from_slice(&partial.nodes);
            nodes.push(next);
            frontier.push(PartialPath {
                nodes,
                weight: partial.weight + weight,
                seq,
            });
        }
    }

    tracing::debug!(start, end, k, found = accepted.len(), "alternate routes computed");
    Ok(accepted)
}
