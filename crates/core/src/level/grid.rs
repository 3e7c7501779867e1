//! Raw element grid produced by assembly, before tiles and textures exist.

use crate::types::{LevelElement, Pos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementGrid {
    width: usize,
    height: usize,
    cells: Vec<LevelElement>,
}

impl ElementGrid {
    pub fn new(width: usize, height: usize, fill: LevelElement) -> Self {
        Self { width, height, cells: vec![fill; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<LevelElement> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// Out-of-bounds writes are ignored and reported as `false`.
    pub fn set(&mut self, pos: Pos, element: LevelElement) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let index = self.index(pos);
        self.cells[index] = element;
        true
    }

    pub fn is_accessible(&self, pos: Pos) -> bool {
        self.get(pos).is_some_and(LevelElement::is_accessible)
    }

    /// Every cell with its position, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, LevelElement)> + '_ {
        self.cells.iter().enumerate().map(|(index, &element)| {
            (Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 }, element)
        })
    }

    pub fn accessible_positions(&self) -> Vec<Pos> {
        self.cells().filter(|(_, element)| element.is_accessible()).map(|(pos, _)| pos).collect()
    }

    fn index(&self, pos: Pos) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_outside_the_grid_are_rejected() {
        let mut grid = ElementGrid::new(3, 2, LevelElement::Void);
        assert!(grid.set(Pos { y: 1, x: 2 }, LevelElement::Floor));
        assert!(!grid.set(Pos { y: 2, x: 0 }, LevelElement::Floor));
        assert!(!grid.set(Pos { y: 0, x: -1 }, LevelElement::Floor));

        assert_eq!(grid.get(Pos { y: 1, x: 2 }), Some(LevelElement::Floor));
        assert_eq!(grid.get(Pos { y: 5, x: 5 }), None);
        assert_eq!(grid.accessible_positions(), vec![Pos { y: 1, x: 2 }]);
    }
}
