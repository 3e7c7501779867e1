//! Candidate placements of a template for one graph node.

use crate::graph::NodeId;
use crate::types::Pos;

use super::template::{RoomElement, RoomTemplate};

/// A template pinned to the level: the template cell `local_ref` sits at
/// `global_ref`. Borrows its template from the variant pool.
#[derive(Clone, Copy, Debug)]
pub struct ConfigurationSpace<'a> {
    template: &'a RoomTemplate,
    node: NodeId,
    local_ref: Pos,
    global_ref: Pos,
}

/// Inclusive global bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: Pos,
    pub max: Pos,
}

impl Bounds {
    pub fn intersects(self, other: Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: Pos { y: self.min.y.min(other.min.y), x: self.min.x.min(other.min.x) },
            max: Pos { y: self.max.y.max(other.max.y), x: self.max.x.max(other.max.x) },
        }
    }
}

impl<'a> ConfigurationSpace<'a> {
    pub fn new(template: &'a RoomTemplate, node: NodeId, local_ref: Pos, global_ref: Pos) -> Self {
        Self { template, node, local_ref, global_ref }
    }

    /// Places the template with its anchor at `global_ref`.
    pub fn placed_at(template: &'a RoomTemplate, node: NodeId, global_ref: Pos) -> Self {
        Self::new(template, node, template.anchor(), global_ref)
    }

    pub fn template(&self) -> &'a RoomTemplate {
        self.template
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn local_ref(&self) -> Pos {
        self.local_ref
    }

    pub fn global_ref(&self) -> Pos {
        self.global_ref
    }

    /// Global position of the template's (0, 0) cell.
    pub fn origin(&self) -> Pos {
        self.global_ref - self.local_ref
    }

    pub fn bounds(&self) -> Bounds {
        let min = self.origin();
        Bounds {
            min,
            max: Pos {
                y: min.y + self.template.height() as i32 - 1,
                x: min.x + self.template.width() as i32 - 1,
            },
        }
    }

    pub fn to_global(&self, local: Pos) -> Pos {
        local + self.origin()
    }

    pub fn element_at_global(&self, global: Pos) -> RoomElement {
        self.template.element_at(global - self.origin())
    }

    /// Door cells as `(local, global)` pairs, row-major.
    pub fn global_doors(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        let origin = self.origin();
        self.template.doors().iter().map(move |&local| (local, local + origin))
    }

    /// True when the two placements cannot coexist. Floor never shares a
    /// cell; walls may be shared; a door may only coincide with a door.
    pub fn overlaps(&self, other: &ConfigurationSpace<'_>) -> bool {
        let (mine, theirs) = (self.bounds(), other.bounds());
        if !mine.intersects(theirs) {
            return false;
        }
        let min = Pos { y: mine.min.y.max(theirs.min.y), x: mine.min.x.max(theirs.min.x) };
        let max = Pos { y: mine.max.y.min(theirs.max.y), x: mine.max.x.min(theirs.max.x) };

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let pos = Pos { y, x };
                if cells_conflict(self.element_at_global(pos), other.element_at_global(pos)) {
                    return true;
                }
            }
        }
        false
    }
}

fn cells_conflict(a: RoomElement, b: RoomElement) -> bool {
    if !a.is_occupied() || !b.is_occupied() {
        return false;
    }
    a == RoomElement::Floor || b == RoomElement::Floor || a.is_door() != b.is_door()
}
