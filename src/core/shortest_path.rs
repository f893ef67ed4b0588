//! Single-source shortest paths (Dijkstra) with optional node exclusion.
//!
//! Node counts in a lot are in the tens, so the frontier is a linear scan over
//! unvisited nodes in insertion order rather than a heap. Ties between equal
//! tentative distances go to the earlier-inserted node.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{LotGraph, ParkingError};
use crate::util::serde::NodeId;

/// A path through the lot with its total weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Ordered node ids from start to end.
    pub path: Vec<NodeId>,
    /// Sum of edge weights along the path.
    pub weight: f64,
}

/// Distances and predecessors from one start node to every node of the graph.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    start: NodeId,
    distances: HashMap<NodeId, f64>,
    predecessors: HashMap<NodeId, Option<NodeId>>,
}

impl ShortestPaths {
    /// Start node of the search.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Finite distance to `target`, `None` when unknown or unreachable.
    pub fn distance(&self, target: &str) -> Option<f64> {
        self.distances
            .get(target)
            .copied()
            .filter(|d| d.is_finite())
    }

    /// Full distance map; unreachable nodes hold `f64::INFINITY`.
    pub const fn distances(&self) -> &HashMap<NodeId, f64> {
        &self.distances
    }

    /// Full predecessor map; the start and unreachable nodes map to `None`.
    pub const fn predecessors(&self) -> &HashMap<NodeId, Option<NodeId>> {
        &self.predecessors
    }

    /// Path from the start to `target`, or `None` if it is unreachable.
    pub fn path_to(&self, target: &str) -> Option<Vec<NodeId>> {
        reconstruct_path(&self.predecessors, &self.start, target)
    }

    /// Path and distance to `target` as a [`Route`].
    pub fn route_to(&self, target: &str) -> Option<Route> {
        let weight = self.distance(target)?;
        let path = self.path_to(target)?;
        Some(Route { path, weight })
    }
}

/// Run Dijkstra from `start`, treating every node in `excluded` as impassable.
///
/// The start node is always expanded even if it appears in `excluded`.
pub fn shortest_paths(
    graph: &LotGraph,
    start: &str,
    excluded: &HashSet<NodeId>,
) -> Result<ShortestPaths, ParkingError> {
    let start_idx = graph
        .index_of(start)
        .ok_or_else(|| ParkingError::NotFound(format!("node `{start}`")))?;

    let n = graph.len();
    let blocked: Vec<bool> = (0..n)
        .map(|i| excluded.contains(graph.id_at(i)))
        .collect();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    dist[start_idx] = 0.0;

    loop {
        let mut current = None;
        let mut best = f64::INFINITY;
        for i in 0..n {
            if !visited[i] && dist[i] < best {
                best = dist[i];
                current = Some(i);
            }
        }
        let Some(u) = current else { break };
        visited[u] = true;

        for &(v, weight) in graph.neighbors_at(u) {
            if blocked[v] {
                continue;
            }
            let candidate = dist[u] + weight;
            if candidate < dist[v] {
                dist[v] = candidate;
                prev[v] = Some(u);
            }
        }
    }

    let mut distances = HashMap::with_capacity(n);
    let mut predecessors = HashMap::with_capacity(n);
    for i in 0..n {
        let id = graph.id_at(i).clone();
        distances.insert(id.clone(), dist[i]);
        predecessors.insert(id, prev[i].map(|p| graph.id_at(p).clone()));
    }
    tracing::trace!(start, reachable = dist.iter().filter(|d| d.is_finite()).count(), "dijkstra done");

    Ok(ShortestPaths {
        start: start.to_owned(),
        distances,
        predecessors,
    })
}

/// Shortest route between two nodes over the full graph.
pub fn shortest_route(graph: &LotGraph, start: &str, target: &str) -> Result<Route, ParkingError> {
    if !graph.contains(target) {
        return Err(ParkingError::NotFound(format!("node `{target}`")));
    }
    shortest_paths(graph, start, &HashSet::new())?
        .route_to(target)
        .ok_or_else(|| ParkingError::Unreachable {
            from: start.to_owned(),
            to: target.to_owned(),
        })
}

/// Walk predecessors back from `target` to `start`.
///
/// Returns `None` when the chain ends anywhere other than `start`.
pub fn reconstruct_path(
    predecessors: &HashMap<NodeId, Option<NodeId>>,
    start: &str,
    target: &str,
) -> Option<Vec<NodeId>> {
    if !predecessors.contains_key(target) {
        return None;
    }
    let mut path = vec![target.to_owned()];
    let mut current = target;
    while current != start {
        let prev = predecessors.get(current)?.as_deref()?;
        // A predecessor chain longer than the node count has a cycle.
        if path.len() > predecessors.len() {
            return None;
        }
        path.push(prev.to_owned());
        current = prev;
    }
    path.reverse();
    Some(path)
}
