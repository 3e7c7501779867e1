//! Backtracking placement search over configuration spaces.
//!
//! The search runs on an explicit stack of frames, one per node being placed.
//! Candidate placements live in a slot-map arena and frames refer to them by
//! id; the list of placed ids doubles as the undo log, so backtracking pops
//! entries instead of copying partial solutions.

use std::collections::{BTreeMap, VecDeque};

use slotmap::{SlotMap, new_key_type};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{NoSolution, NoSolutionReason};
use crate::graph::{Graph, NodeId};
use crate::rng::GenRng;
use crate::types::Pos;

use super::space::ConfigurationSpace;
use super::template::RoomTemplate;

new_key_type! {
    pub struct SpaceId;
}

struct Frame {
    node: NodeId,
    candidates: Vec<SpaceId>,
    /// Index of the next candidate to try; the one before it is currently placed.
    next: usize,
    /// How far the pending queue was rotated to reach a placeable node.
    deferrals: usize,
}

struct Search<'a, 'g> {
    graph: &'g Graph,
    variants: &'a [RoomTemplate],
    branching_factor: usize,
    step_limit: Option<u64>,
    arena: SlotMap<SpaceId, ConfigurationSpace<'a>>,
    placed: Vec<SpaceId>,
    placed_by_node: BTreeMap<NodeId, SpaceId>,
    pending: VecDeque<NodeId>,
    stack: Vec<Frame>,
    steps: u64,
}

/// Places every node of `sequence` so that each room (after the first) shares
/// a door cell with an already placed graph neighbour and no two rooms overlap.
///
/// Nodes whose neighbours all come later in the sequence are deferred until a
/// neighbour is placed. At most `branching_factor` shuffled candidates are
/// tried per node.
pub fn solve<'a>(
    graph: &Graph,
    sequence: &[NodeId],
    variants: &'a [RoomTemplate],
    config: &GeneratorConfig,
    rng: &mut GenRng,
) -> Result<Vec<ConfigurationSpace<'a>>, NoSolution> {
    if variants.is_empty() {
        return Err(NoSolution { reason: NoSolutionReason::NoTemplates, steps: 0 });
    }
    if !graph.is_connected() {
        return Err(NoSolution { reason: NoSolutionReason::Disconnected, steps: 0 });
    }

    let mut search = Search {
        graph,
        variants,
        branching_factor: config.branching_factor.max(1),
        step_limit: config.search_step_limit,
        arena: SlotMap::with_key(),
        placed: Vec::with_capacity(sequence.len()),
        placed_by_node: BTreeMap::new(),
        pending: sequence.iter().copied().collect(),
        stack: Vec::with_capacity(sequence.len()),
        steps: 0,
    };
    let solution = search.run(rng)?;
    debug!(steps = search.steps, rooms = solution.len(), "placement found");
    Ok(solution)
}

impl<'a> Search<'a, '_> {
    fn run(&mut self, rng: &mut GenRng) -> Result<Vec<ConfigurationSpace<'a>>, NoSolution> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }
        self.open_frame(rng)?;

        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Err(self.failure(NoSolutionReason::Exhausted));
            };

            if frame.next > 0 {
                self.placed.pop();
                self.placed_by_node.remove(&frame.node);
            }

            if let Some(&candidate) = frame.candidates.get(frame.next) {
                frame.next += 1;
                let node = frame.node;
                self.placed.push(candidate);
                self.placed_by_node.insert(node, candidate);

                if self.pending.is_empty() {
                    return Ok(self.placed.iter().map(|&id| self.arena[id]).collect());
                }
                self.open_frame(rng)?;
                continue;
            }

            let Some(frame) = self.stack.pop() else {
                continue;
            };
            for id in &frame.candidates {
                self.arena.remove(*id);
            }
            self.pending.push_front(frame.node);
            self.pending.rotate_right(frame.deferrals);
            debug!(node = frame.node, depth = self.stack.len(), "backtracking");
        }
    }

    /// Takes the next placeable node off the pending queue and pushes a frame
    /// holding its surviving candidates.
    fn open_frame(&mut self, rng: &mut GenRng) -> Result<(), NoSolution> {
        self.steps += 1;
        if self.step_limit.is_some_and(|limit| self.steps > limit) {
            return Err(self.failure(NoSolutionReason::StepLimit));
        }

        let mut deferrals = 0;
        if !self.placed.is_empty() {
            while !self.has_placed_neighbour(self.pending[0]) {
                deferrals += 1;
                if deferrals == self.pending.len() {
                    return Err(self.failure(NoSolutionReason::Disconnected));
                }
                self.pending.rotate_left(1);
            }
        }

        let Some(node) = self.pending.pop_front() else {
            return Err(self.failure(NoSolutionReason::Exhausted));
        };
        let mut candidates = self.enumerate(node);
        rng.shuffle(&mut candidates);
        let survivors: Vec<ConfigurationSpace<'a>> = candidates
            .into_iter()
            .filter(|candidate| {
                self.placed.iter().all(|&id| !self.arena[id].overlaps(candidate))
            })
            .take(self.branching_factor)
            .collect();

        let candidates = survivors.into_iter().map(|space| self.arena.insert(space)).collect();
        self.stack.push(Frame { node, candidates, next: 0, deferrals });
        Ok(())
    }

    fn has_placed_neighbour(&self, node: NodeId) -> bool {
        self.graph.neighbours(node).any(|neighbour| self.placed_by_node.contains_key(&neighbour))
    }

    /// Every door-to-door pairing against placed neighbours, or every variant
    /// at the origin for the first room.
    fn enumerate(&self, node: NodeId) -> Vec<ConfigurationSpace<'a>> {
        let variants = self.variants;
        if self.placed.is_empty() {
            return variants
                .iter()
                .map(|template| ConfigurationSpace::placed_at(template, node, Pos::ORIGIN))
                .collect();
        }

        let mut found = Vec::new();
        for neighbour in self.graph.neighbours(node) {
            let Some(&anchor_id) = self.placed_by_node.get(&neighbour) else {
                continue;
            };
            let anchor = self.arena[anchor_id];
            for (_, anchor_door) in anchor.global_doors() {
                for template in variants {
                    for &door in template.doors() {
                        found.push(ConfigurationSpace::new(template, node, door, anchor_door));
                    }
                }
            }
        }
        found
    }

    fn failure(&self, reason: NoSolutionReason) -> NoSolution {
        debug!(?reason, steps = self.steps, "placement search gave up");
        NoSolution { reason, steps: self.steps }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::roomgraph::chains::split_in_chains;
    use crate::roomgraph::library::TemplateLibrary;
    use crate::roomgraph::sequence::solve_sequence;
    use crate::types::DesignLabel;

    fn solve_graph<'a>(
        graph: &Graph,
        variants: &'a [RoomTemplate],
        seed: u64,
    ) -> Result<Vec<ConfigurationSpace<'a>>, NoSolution> {
        let sequence = solve_sequence(&split_in_chains(graph), graph);
        solve(graph, &sequence, variants, &GeneratorConfig::default(), &mut GenRng::seeded(seed))
    }

    #[test]
    fn chain_of_rooms_is_joined_door_to_door() {
        let variants = TemplateLibrary::builtin().unwrap().variants();
        let graph = Graph::from_edges([0, 1, 2], [(0, 1), (1, 2)], []).unwrap();
        let solution = solve_graph(&graph, &variants, 7).unwrap();

        assert_eq!(solution.len(), 3);
        for &(a, b) in &[(0, 1), (1, 2)] {
            let first = solution.iter().find(|space| space.node() == a).unwrap();
            let second = solution.iter().find(|space| space.node() == b).unwrap();
            let first_doors: BTreeSet<Pos> = first.global_doors().map(|(_, g)| g).collect();
            assert!(second.global_doors().any(|(_, g)| first_doors.contains(&g)));
        }
    }

    #[test]
    fn empty_variant_pool_reports_no_templates() {
        let graph = Graph::from_edges([0], [], []).unwrap();
        let error = solve_graph(&graph, &[], 1).unwrap_err();
        assert_eq!(error.reason, NoSolutionReason::NoTemplates);
    }

    #[test]
    fn disconnected_graph_reports_disconnected() {
        let variants = TemplateLibrary::builtin().unwrap().variants();
        let graph = Graph::from_edges([0, 1, 2], [(0, 1)], []).unwrap();
        let error = solve_graph(&graph, &variants, 1).unwrap_err();
        assert_eq!(error.reason, NoSolutionReason::Disconnected);
    }

    #[test]
    fn single_door_room_cannot_host_two_neighbours() {
        let closet =
            RoomTemplate::parse(&["WWW", "WFW", "WDW"], DesignLabel::Default, Pos { y: 1, x: 1 })
                .unwrap();
        let variants = closet.all_rotations().to_vec();
        let graph = Graph::from_edges([0, 1, 2], [(0, 1), (1, 2)], []).unwrap();
        let error = solve_graph(&graph, &variants, 3).unwrap_err();
        assert_eq!(error.reason, NoSolutionReason::Exhausted);
        assert!(error.steps > 1);
    }

    #[test]
    fn step_limit_is_enforced() {
        let variants = TemplateLibrary::builtin().unwrap().variants();
        let graph = Graph::from_edges([0, 1, 2, 3], [(0, 1), (1, 2), (2, 3)], []).unwrap();
        let sequence = solve_sequence(&split_in_chains(&graph), &graph);
        let config = GeneratorConfig { search_step_limit: Some(2), ..GeneratorConfig::default() };
        let error = solve(&graph, &sequence, &variants, &config, &mut GenRng::seeded(5))
            .unwrap_err();
        assert_eq!(error.reason, NoSolutionReason::StepLimit);
        assert_eq!(error.steps, 3);
    }

    #[test]
    fn nodes_listed_before_their_neighbours_are_deferred() {
        let variants = TemplateLibrary::builtin().unwrap().variants();
        let graph = Graph::from_edges([0, 1, 2], [(0, 1), (1, 2)], []).unwrap();
        let solution = solve(
            &graph,
            &[0, 2, 1],
            &variants,
            &GeneratorConfig::default(),
            &mut GenRng::seeded(11),
        )
        .unwrap();
        let order: Vec<NodeId> = solution.iter().map(|space| space.node()).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn same_seed_gives_same_placement() {
        let variants = TemplateLibrary::builtin().unwrap().variants();
        let graph =
            Graph::from_edges([0, 1, 2, 3], [(0, 1), (1, 2), (2, 3), (3, 0)], [(3, 0)]).unwrap();
        let first = solve_graph(&graph, &variants, 99);
        let second = solve_graph(&graph, &variants, 99);
        let summary = |result: &Result<Vec<ConfigurationSpace<'_>>, NoSolution>| {
            result.as_ref().ok().map(|spaces| {
                spaces.iter().map(|space| (space.node(), space.origin())).collect::<Vec<_>>()
            })
        };
        assert_eq!(summary(&first), summary(&second));
    }

    #[test]
    fn random_trees_are_usually_solved() {
        let variants = TemplateLibrary::builtin().unwrap().variants();
        let total = 40;
        let solved = (0..total)
            .filter(|&seed| {
                let mut rng = GenRng::seeded(seed);
                let node_count = rng.between(1, 8);
                let graph = Graph::random(node_count, 0, &mut rng).unwrap();
                solve_graph(&graph, &variants, seed).is_ok()
            })
            .count() as u64;
        assert!(solved * 10 >= total * 9, "only {solved} of {total} trees were solved");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn solutions_place_every_node_once_without_overlap(
            seed in any::<u64>(),
            node_count in 1_usize..9,
        ) {
            let variants = TemplateLibrary::builtin().unwrap().variants();
            let mut rng = GenRng::seeded(seed);
            let graph = Graph::random(node_count, 0, &mut rng).unwrap();
            if let Ok(solution) = solve_graph(&graph, &variants, seed) {
                let nodes: BTreeSet<NodeId> = solution.iter().map(|space| space.node()).collect();
                prop_assert_eq!(nodes.len(), solution.len());
                prop_assert_eq!(nodes, graph.node_ids().collect::<BTreeSet<_>>());
                for (index, a) in solution.iter().enumerate() {
                    for b in &solution[index + 1..] {
                        prop_assert!(!a.overlaps(b));
                    }
                }
            }
        }
    }
}
