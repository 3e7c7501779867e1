//! Immutable room-connectivity graph keyed by stable integer ids.
//!
//! Neighbour sets live in one adjacency table; nodes never hold references to
//! each other. A subset of edges is designated as cycle-closing: each of them
//! closes a loop in the level and seeds a circular chain during decomposition.

pub mod pool;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::rng::GenRng;

pub use pool::GraphPool;

pub type NodeId = u32;

/// Degree cap for [`Graph::random`], low enough for rooms with three or four doors.
pub const RANDOM_MAX_DEGREE: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    cycle_edges: Vec<(NodeId, NodeId)>,
}

/// On-disk shape of a graph file.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct GraphFile {
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    cycle_edges: Vec<(NodeId, NodeId)>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    #[serde(default)]
    neighbours: Vec<NodeId>,
}

impl Graph {
    /// Builds a graph from node ids, undirected edges, and the cycle-closing subset.
    /// Cycle-closing edges must also be present in `edges`.
    pub fn from_edges(
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
        cycle_edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self, GraphError> {
        let mut adjacency = BTreeMap::new();
        for node in nodes {
            if adjacency.insert(node, BTreeSet::new()).is_some() {
                return Err(GraphError::DuplicateNode(node));
            }
        }
        if adjacency.is_empty() {
            return Err(GraphError::Empty);
        }

        for (a, b) in edges {
            link(&mut adjacency, a, b)?;
        }

        let mut normalized_cycle_edges = Vec::new();
        for (a, b) in cycle_edges {
            let is_edge = adjacency.get(&a).is_some_and(|neighbours| neighbours.contains(&b));
            if !is_edge {
                return Err(GraphError::UnknownCycleEdge(a, b));
            }
            let edge = (a.min(b), a.max(b));
            if !normalized_cycle_edges.contains(&edge) {
                normalized_cycle_edges.push(edge);
            }
        }

        Ok(Self { adjacency, cycle_edges: normalized_cycle_edges })
    }

    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_str(json)?;
        let edges: Vec<(NodeId, NodeId)> = file
            .nodes
            .iter()
            .flat_map(|record| record.neighbours.iter().map(move |&other| (record.id, other)))
            .collect();
        Self::from_edges(file.nodes.iter().map(|record| record.id), edges, file.cycle_edges)
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let json = fs::read_to_string(path)
            .map_err(|source| GraphError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, GraphError> {
        let file = GraphFile {
            nodes: self
                .adjacency
                .iter()
                .map(|(&id, neighbours)| NodeRecord {
                    id,
                    neighbours: neighbours.iter().copied().collect(),
                })
                .collect(),
            cycle_edges: self.cycle_edges.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Random connected graph: a random spanning tree plus up to
    /// `extra_edges` cycle-closing edges between previously unconnected
    /// pairs. No node gets more than [`RANDOM_MAX_DEGREE`] neighbours.
    pub fn random(
        node_count: usize,
        extra_edges: usize,
        rng: &mut GenRng,
    ) -> Result<Self, GraphError> {
        if node_count == 0 {
            return Err(GraphError::Empty);
        }
        let nodes: Vec<NodeId> = (0..node_count as NodeId).collect();
        let mut degree = vec![0_usize; node_count];
        let mut edges = Vec::new();
        for child in 1..node_count {
            let open: Vec<usize> =
                (0..child).filter(|&parent| degree[parent] < RANDOM_MAX_DEGREE).collect();
            let parent = rng.choose(&open).copied().unwrap_or(child - 1);
            degree[parent] += 1;
            degree[child] += 1;
            edges.push((parent as NodeId, child as NodeId));
        }

        let mut candidates = Vec::new();
        for a in 0..node_count as NodeId {
            for b in (a + 1)..node_count as NodeId {
                if !edges.contains(&(a, b)) {
                    candidates.push((a, b));
                }
            }
        }
        rng.shuffle(&mut candidates);
        let mut cycle_edges = Vec::new();
        for (a, b) in candidates {
            if cycle_edges.len() == extra_edges {
                break;
            }
            let (a_index, b_index) = (a as usize, b as usize);
            if degree[a_index] < RANDOM_MAX_DEGREE && degree[b_index] < RANDOM_MAX_DEGREE {
                degree[a_index] += 1;
                degree[b_index] += 1;
                cycle_edges.push((a, b));
            }
        }
        edges.extend(cycle_edges.iter().copied());

        Self::from_edges(nodes, edges, cycle_edges)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Neighbours in ascending id order. Unknown nodes have none.
    pub fn neighbours(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&node).into_iter().flat_map(|neighbours| neighbours.iter().copied())
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeSet::len)
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(&a).is_some_and(|neighbours| neighbours.contains(&b))
    }

    pub fn cycle_edges(&self) -> &[(NodeId, NodeId)] {
        &self.cycle_edges
    }

    pub fn is_connected(&self) -> bool {
        let Some(start) = self.adjacency.keys().next().copied() else {
            return true;
        };
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some(node) = open.pop_front() {
            for next in self.neighbours(node) {
                if seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen.len() == self.adjacency.len()
    }
}

fn link(
    adjacency: &mut BTreeMap<NodeId, BTreeSet<NodeId>>,
    a: NodeId,
    b: NodeId,
) -> Result<(), GraphError> {
    if a == b {
        return Err(GraphError::SelfLoop(a));
    }
    if !adjacency.contains_key(&b) {
        return Err(GraphError::UnknownNeighbour { node: a, neighbour: b });
    }
    let Some(a_neighbours) = adjacency.get_mut(&a) else {
        return Err(GraphError::UnknownNeighbour { node: b, neighbour: a });
    };
    a_neighbours.insert(b);
    if let Some(b_neighbours) = adjacency.get_mut(&b) {
        b_neighbours.insert(a);
    }
    Ok(())
}
