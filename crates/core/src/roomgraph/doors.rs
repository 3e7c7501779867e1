//! Matching of coincident door cells between placed rooms.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::Pos;

use super::space::ConfigurationSpace;

/// For each placement, the local coordinates of its doors that coincide with
/// a door cell of a different placement. Indexed like `spaces`.
///
/// Matching is symmetric: if a door of `a` is used because it sits on a door
/// of `b`, that door of `b` is used as well.
pub fn resolve_doors(spaces: &[ConfigurationSpace<'_>]) -> Vec<BTreeSet<Pos>> {
    let mut doors_at: BTreeMap<Pos, Vec<(usize, Pos)>> = BTreeMap::new();
    for (index, space) in spaces.iter().enumerate() {
        for (local, global) in space.global_doors() {
            doors_at.entry(global).or_default().push((index, local));
        }
    }

    let mut used = vec![BTreeSet::new(); spaces.len()];
    for owners in doors_at.values() {
        let first_owner = owners[0].0;
        if owners.iter().all(|&(index, _)| index == first_owner) {
            continue;
        }
        for &(index, local) in owners {
            used[index].insert(local);
        }
    }
    used
}
