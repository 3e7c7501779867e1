//! Shortest paths and reachable sets over tile connection links.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::types::Pos;

use super::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

/// A* from `start` to `goal`, both included. `None` when either end is not
/// accessible or no connected path exists.
pub(super) fn astar_path(level: &Level, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    let start_tile = level.tile_at(start).filter(|tile| tile.is_accessible())?;
    level.tile_at(goal).filter(|tile| tile.is_accessible())?;
    if start == goal {
        return Some(vec![start_tile.pos()]);
    }

    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let h = start.manhattan(goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);

    while let Some(current) = open_set.pop_first() {
        let pos = Pos { y: current.y, x: current.x };
        if pos == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }
        let Some(tile) = level.tile_at(pos) else {
            continue;
        };
        let current_g = g_score.get(&pos).copied().unwrap_or(u32::MAX);
        for &next in tile.connections() {
            let tentative = current_g.saturating_add(1);
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, pos);
                g_score.insert(next, tentative);
                let h = next.manhattan(goal);
                open_set.insert(OpenNode { f: tentative + h, h, y: next.y, x: next.x });
            }
        }
    }
    None
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut pos = goal;
    while pos != start {
        let Some(&previous) = came_from.get(&pos) else {
            break;
        };
        path.push(previous);
        pos = previous;
    }
    path.reverse();
    path
}

/// Every position reachable from `start` through connection links.
pub(super) fn reachable_from(level: &Level, start: Pos) -> BTreeSet<Pos> {
    let mut visited = BTreeSet::new();
    if !level.tile_at(start).is_some_and(|tile| tile.is_accessible()) {
        return visited;
    }

    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    while let Some(current) = queue.pop_front() {
        let Some(tile) = level.tile_at(current) else {
            continue;
        };
        for &next in tile.connections() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}
