//! Placement order: chains grown outward from the shortest circle, flattened to nodes.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::{Graph, NodeId};

use super::chains::Chain;

/// Orders all chains breadth-first by graph adjacency, starting from the
/// shortest circular chain (or the first chain when there is no circle), and
/// flattens them into a node sequence without repeats.
///
/// Chains unreachable from the seed are appended in their original order so
/// the sequence always covers every chained node.
pub fn solve_sequence(chains: &[Chain], graph: &Graph) -> Vec<NodeId> {
    if chains.is_empty() {
        return Vec::new();
    }

    let chain_of: BTreeMap<NodeId, usize> = chains
        .iter()
        .enumerate()
        .flat_map(|(index, chain)| chain.nodes().iter().map(move |&node| (node, index)))
        .collect();

    let seed = chains
        .iter()
        .enumerate()
        .filter(|(_, chain)| chain.is_circle())
        .min_by_key(|(_, chain)| chain.len())
        .map_or(0, |(index, _)| index);

    let mut included = vec![false; chains.len()];
    included[seed] = true;
    let mut ordered = vec![seed];
    let mut frontier = vec![seed];

    loop {
        while !frontier.is_empty() {
            let mut adjacent = Vec::new();
            for &chain_index in &frontier {
                for &node in chains[chain_index].nodes() {
                    for neighbour in graph.neighbours(node) {
                        let Some(&neighbour_chain) = chain_of.get(&neighbour) else {
                            continue;
                        };
                        if !included[neighbour_chain] {
                            included[neighbour_chain] = true;
                            adjacent.push(neighbour_chain);
                        }
                    }
                }
            }
            adjacent.sort_by_key(|&index| chains[index].order_key());
            ordered.extend(adjacent.iter().copied());
            frontier = adjacent;
        }

        let Some(unreached) = included.iter().position(|&is_included| !is_included) else {
            break;
        };
        included[unreached] = true;
        ordered.push(unreached);
        frontier = vec![unreached];
    }

    let mut emitted = BTreeSet::new();
    ordered
        .into_iter()
        .flat_map(|index| chains[index].nodes().iter().copied())
        .filter(|&node| emitted.insert(node))
        .collect()
}
