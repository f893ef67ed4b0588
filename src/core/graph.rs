//! Static lot topology: nodes, undirected weighted edges and the export view.
//!
//! The graph is built once at startup and never mutated afterwards. Nodes are
//! kept in insertion order; path engines work on dense indices into that order
//! so iteration (and therefore tie-breaking) is deterministic.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::ParkingError;
use crate::util::serde::NodeId;

/// Role of a node in the lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Vehicle entry point.
    Entrance,
    /// Lane split or other pass-through point.
    Junction,
    /// Parking slot.
    Slot,
}

/// Planar position used by renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node of the lot topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Node role.
    pub kind: NodeKind,
    /// Human-readable name.
    pub name: String,
    /// Rendering position.
    pub position: Position,
}

/// One entry of an exported adjacency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Neighbouring node.
    pub node: NodeId,
    /// Edge weight towards it.
    pub weight: f64,
}

/// Serializable snapshot of the topology for renderers and external callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Nodes keyed by id.
    pub nodes: BTreeMap<NodeId, Node>,
    /// Neighbour lists keyed by node id, in edge insertion order.
    pub adjacency: BTreeMap<NodeId, Vec<Neighbor>>,
}

/// Weighted undirected graph of the lot.
#[derive(Debug, Clone, Default)]
pub struct LotGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
    edge_count: usize,
}

impl LotGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Ids must be unique.
    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        kind: NodeKind,
        name: impl Into<String>,
        position: Position,
    ) -> Result<(), ParkingError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ParkingError::InvalidLayout("node id must not be empty".into()));
        }
        if self.index.contains_key(&id) {
            tracing::error!(node = %id, "duplicate node id in layout");
            return Err(ParkingError::InvalidLayout(format!("duplicate node `{id}`")));
        }
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            name: name.into(),
            position,
        });
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Add an undirected edge; both directions get the same weight.
    ///
    /// Both endpoints must already exist and the weight must be a finite,
    /// strictly positive number.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<(), ParkingError> {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            tracing::error!(from = a, to = b, "edge references unknown node");
            return Err(ParkingError::InvalidLayout(format!(
                "edge {a} -> {b} references an unknown node"
            )));
        };
        if ia == ib {
            return Err(ParkingError::InvalidLayout(format!("self-loop on `{a}`")));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ParkingError::InvalidLayout(format!(
                "edge {a} -> {b} has non-positive weight {weight}"
            )));
        }
        self.adjacency[ia].push((ib, weight));
        self.adjacency[ib].push((ia, weight));
        self.edge_count += 1;
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges.
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Ids of all slot nodes, in insertion order.
    pub fn slot_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Slot)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Lightest edge weight between two adjacent nodes.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        self.adjacency[ia]
            .iter()
            .filter(|(n, _)| *n == ib)
            .map(|(_, w)| *w)
            .reduce(f64::min)
    }

    /// Total weight of a node sequence, or `None` if two consecutive nodes are
    /// not adjacent.
    pub fn path_weight(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .try_fold(0.0, |acc, pair| Some(acc + self.edge_weight(&pair[0], &pair[1])?))
    }

    /// Serializable view of nodes and adjacency.
    pub fn export(&self) -> GraphExport {
        let nodes = self
            .nodes
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect();
        let adjacency = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let neighbors = self.adjacency[i]
                    .iter()
                    .map(|&(j, weight)| Neighbor {
                        node: self.nodes[j].id.clone(),
                        weight,
                    })
                    .collect();
                (n.id.clone(), neighbors)
            })
            .collect();
        GraphExport { nodes, adjacency }
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> &NodeId {
        &self.nodes[idx].id
    }

    pub(crate) fn neighbors_at(&self, idx: usize) -> &[(usize, f64)] {
        &self.adjacency[idx]
    }
}
