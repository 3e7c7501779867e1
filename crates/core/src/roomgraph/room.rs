//! Finalized rooms: a placed template with its doors resolved.

use std::collections::BTreeSet;

use crate::types::{DesignLabel, Pos};

use super::space::ConfigurationSpace;
use super::template::RoomElement;

/// A placed room. Its layout contains no `Door` cells: used doors became
/// `PlacedDoor` and the rest were walled up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    width: usize,
    height: usize,
    cells: Vec<RoomElement>,
    design: DesignLabel,
    local_ref: Pos,
    global_ref: Pos,
}

impl Room {
    pub fn from_placement(
        space: &ConfigurationSpace<'_>,
        used_doors: &BTreeSet<Pos>,
        design: DesignLabel,
    ) -> Self {
        let template = space.template();
        let cells = template
            .cells()
            .map(|(pos, element)| match element {
                RoomElement::Door if used_doors.contains(&pos) => RoomElement::PlacedDoor,
                RoomElement::Door => RoomElement::Wall,
                other => other,
            })
            .collect();
        Self {
            width: template.width(),
            height: template.height(),
            cells,
            design,
            local_ref: space.local_ref(),
            global_ref: space.global_ref(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn design(&self) -> DesignLabel {
        self.design
    }

    pub fn local_ref(&self) -> Pos {
        self.local_ref
    }

    pub fn global_ref(&self) -> Pos {
        self.global_ref
    }

    pub fn origin(&self) -> Pos {
        self.global_ref - self.local_ref
    }

    pub fn element_at(&self, local: Pos) -> RoomElement {
        if local.x < 0
            || local.y < 0
            || local.x as usize >= self.width
            || local.y as usize >= self.height
        {
            return RoomElement::Skip;
        }
        self.cells[local.y as usize * self.width + local.x as usize]
    }

    /// Every cell with its global coordinate, row-major.
    pub fn global_cells(&self) -> impl Iterator<Item = (Pos, RoomElement)> + '_ {
        let origin = self.origin();
        self.cells.iter().enumerate().map(move |(index, &element)| {
            let local = Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 };
            (local + origin, element)
        })
    }
}
