//! Decomposition of a graph into circular and linear chains.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::graph::{Graph, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    nodes: Vec<NodeId>,
    is_circle: bool,
}

impl Chain {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn is_circle(&self) -> bool {
        self.is_circle
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Circles first, then shorter chains, then lowest first node.
    pub(super) fn order_key(&self) -> (bool, usize, NodeId) {
        (!self.is_circle, self.nodes.len(), self.nodes.first().copied().unwrap_or(NodeId::MAX))
    }
}

/// Splits `graph` so that every node lands in exactly one chain.
///
/// Each cycle-closing edge contributes the still-unassigned nodes of the
/// shortest cycle through it as a circular chain. Remaining nodes are grown
/// into linear chains from the lowest unassigned id outwards in both
/// directions.
pub fn split_in_chains(graph: &Graph) -> Vec<Chain> {
    let mut unassigned: BTreeSet<NodeId> = graph.node_ids().collect();
    let mut chains = Vec::new();

    for &(a, b) in graph.cycle_edges() {
        let Some(cycle) = shortest_cycle_through(graph, a, b) else {
            continue;
        };
        let nodes: Vec<NodeId> = cycle.into_iter().filter(|node| unassigned.remove(node)).collect();
        if !nodes.is_empty() {
            chains.push(Chain { nodes, is_circle: true });
        }
    }

    while let Some(seed) = unassigned.pop_first() {
        let mut nodes = follow_chain(graph, seed, &mut unassigned);
        nodes.reverse();
        nodes.push(seed);
        nodes.extend(follow_chain(graph, seed, &mut unassigned));
        chains.push(Chain { nodes, is_circle: false });
    }

    chains
}

/// Shortest path from `a` to `b` that does not use the edge `a`-`b` directly.
/// Together with that edge it forms the shortest cycle containing it.
fn shortest_cycle_through(graph: &Graph, a: NodeId, b: NodeId) -> Option<Vec<NodeId>> {
    let mut came_from = BTreeMap::new();
    let mut open = VecDeque::from([a]);
    let mut seen = BTreeSet::from([a]);

    while let Some(node) = open.pop_front() {
        for next in graph.neighbours(node) {
            if node == a && next == b {
                continue;
            }
            if !seen.insert(next) {
                continue;
            }
            came_from.insert(next, node);
            if next == b {
                let mut path = vec![b];
                let mut current = b;
                while let Some(&previous) = came_from.get(&current) {
                    path.push(previous);
                    current = previous;
                }
                path.reverse();
                return Some(path);
            }
            open.push_back(next);
        }
    }
    None
}

fn follow_chain(graph: &Graph, start: NodeId, unassigned: &mut BTreeSet<NodeId>) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = start;
    loop {
        let next = graph.neighbours(current).find(|node| unassigned.contains(node));
        let Some(next) = next else {
            break;
        };
        unassigned.remove(&next);
        path.push(next);
        current = next;
    }
    path
}
