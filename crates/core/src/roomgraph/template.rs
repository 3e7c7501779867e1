//! Room templates: cell-kind grids with an anchor and derived door positions.

use std::sync::OnceLock;

use crate::error::TemplateError;
use crate::types::{DesignLabel, LevelElement, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomElement {
    Skip,
    Wall,
    Floor,
    Door,
    PlacedDoor,
}

/// Indexed by `RoomElement as usize`.
const LEVEL_ELEMENT_BY_ROOM_ELEMENT: [LevelElement; 5] = [
    LevelElement::Void,
    LevelElement::Wall,
    LevelElement::Floor,
    LevelElement::Wall,
    LevelElement::Floor,
];

impl RoomElement {
    pub fn level_element(self) -> LevelElement {
        LEVEL_ELEMENT_BY_ROOM_ELEMENT[self as usize]
    }

    pub fn is_occupied(self) -> bool {
        self != RoomElement::Skip
    }

    pub fn is_door(self) -> bool {
        matches!(self, RoomElement::Door | RoomElement::PlacedDoor)
    }

    pub fn from_char(cell: char) -> Option<Self> {
        match cell {
            ' ' | 'S' => Some(RoomElement::Skip),
            'W' => Some(RoomElement::Wall),
            'F' => Some(RoomElement::Floor),
            'D' => Some(RoomElement::Door),
            'P' => Some(RoomElement::PlacedDoor),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            RoomElement::Skip => ' ',
            RoomElement::Wall => 'W',
            RoomElement::Floor => 'F',
            RoomElement::Door => 'D',
            RoomElement::PlacedDoor => 'P',
        }
    }
}

/// Blueprint of a room. Door cells are derived from the layout on first use.
#[derive(Clone, Debug)]
pub struct RoomTemplate {
    width: usize,
    height: usize,
    cells: Vec<RoomElement>,
    design: DesignLabel,
    anchor: Pos,
    doors: OnceLock<Vec<Pos>>,
}

impl PartialEq for RoomTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.cells == other.cells
            && self.design == other.design
            && self.anchor == other.anchor
    }
}

impl Eq for RoomTemplate {}

impl RoomTemplate {
    pub fn new(
        rows: Vec<Vec<RoomElement>>,
        design: DesignLabel,
        anchor: Pos,
    ) -> Result<Self, TemplateError> {
        Self::from_rows(0, rows, design, anchor)
    }

    /// Parses rows of cell characters (see [`RoomElement::from_char`]).
    pub fn parse(rows: &[&str], design: DesignLabel, anchor: Pos) -> Result<Self, TemplateError> {
        let owned: Vec<String> = rows.iter().map(|row| (*row).to_string()).collect();
        Self::parse_indexed(0, &owned, design, anchor)
    }

    pub(super) fn parse_indexed(
        index: usize,
        rows: &[String],
        design: DesignLabel,
        anchor: Pos,
    ) -> Result<Self, TemplateError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for row in rows {
            let cells = row
                .chars()
                .map(|cell| {
                    RoomElement::from_char(cell)
                        .ok_or(TemplateError::UnknownCell { index, found: cell })
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(cells);
        }
        Self::from_rows(index, parsed, design, anchor)
    }

    fn from_rows(
        index: usize,
        rows: Vec<Vec<RoomElement>>,
        design: DesignLabel,
        anchor: Pos,
    ) -> Result<Self, TemplateError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(TemplateError::EmptyLayout { index });
        }
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(TemplateError::RaggedLayout {
                    index,
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        if anchor.x < 0 || anchor.y < 0 || anchor.x as usize >= width || anchor.y as usize >= height
        {
            return Err(TemplateError::AnchorOutOfBounds { index, x: anchor.x, y: anchor.y });
        }

        let cells: Vec<RoomElement> = rows.into_iter().flatten().collect();
        if !cells.contains(&RoomElement::Door) {
            return Err(TemplateError::NoDoors { index });
        }
        Ok(Self { width, height, cells, design, anchor, doors: OnceLock::new() })
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

    /// Local reference point used when a room is placed without a door pairing.
    pub fn anchor(&self) -> Pos {
        self.anchor
    }

    /// Cell at a local coordinate; `Skip` outside the layout.
    pub fn element_at(&self, pos: Pos) -> RoomElement {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return RoomElement::Skip;
        }
        self.cells[pos.y as usize * self.width + pos.x as usize]
    }

    /// Local coordinates of every `Door` cell, row-major.
    pub fn doors(&self) -> &[Pos] {
        self.doors.get_or_init(|| {
            self.cells()
                .filter(|(_, element)| *element == RoomElement::Door)
                .map(|(pos, _)| pos)
                .collect()
        })
    }

    /// Every cell with its local coordinate, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, RoomElement)> + '_ {
        self.cells.iter().enumerate().map(|(index, &element)| {
            (Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 }, element)
        })
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|element| element.to_char()).collect())
            .collect()
    }

    /// Quarter turn clockwise. The anchor turns with the layout.
    pub fn rotate(&self) -> RoomTemplate {
        let rotated_width = self.height;
        let rotated_height = self.width;
        let mut cells = vec![RoomElement::Skip; self.cells.len()];
        for (pos, element) in self.cells() {
            let turned = rotate_pos(pos, self.height);
            cells[turned.y as usize * rotated_width + turned.x as usize] = element;
        }
        RoomTemplate {
            width: rotated_width,
            height: rotated_height,
            cells,
            design: self.design,
            anchor: rotate_pos(self.anchor, self.height),
            doors: OnceLock::new(),
        }
    }

    /// The template at 0, 90, 180 and 270 degrees.
    pub fn all_rotations(&self) -> [RoomTemplate; 4] {
        let quarter = self.rotate();
        let half = quarter.rotate();
        let three_quarters = half.rotate();
        [self.clone(), quarter, half, three_quarters]
    }
}

fn rotate_pos(pos: Pos, height: usize) -> Pos {
    Pos { y: pos.x, x: height as i32 - 1 - pos.y }
}
