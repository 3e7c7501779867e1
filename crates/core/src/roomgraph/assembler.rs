//! Merging of finalized rooms into one element grid.

use crate::level::ElementGrid;
use crate::types::{LevelElement, Pos};

use super::room::Room;
use super::space::Bounds;

/// Copies every room into a grid sized to the union of their footprints.
/// Skip cells leave the grid untouched; elsewhere later rooms overwrite
/// earlier ones. `None` for an empty room list.
pub fn assemble(rooms: &[Room]) -> Option<ElementGrid> {
    let bounds = rooms.iter().map(room_bounds).reduce(Bounds::union)?;
    let width = (bounds.max.x - bounds.min.x + 1) as usize;
    let height = (bounds.max.y - bounds.min.y + 1) as usize;

    let mut grid = ElementGrid::new(width, height, LevelElement::Void);
    for room in rooms {
        for (global, element) in room.global_cells() {
            if element.is_occupied() {
                grid.set(global - bounds.min, element.level_element());
            }
        }
    }
    Some(grid)
}

fn room_bounds(room: &Room) -> Bounds {
    let min = room.origin();
    Bounds {
        min,
        max: Pos { y: min.y + room.height() as i32 - 1, x: min.x + room.width() as i32 - 1 },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::roomgraph::doors::resolve_doors;
    use crate::roomgraph::space::ConfigurationSpace;
    use crate::roomgraph::template::RoomTemplate;
    use crate::types::DesignLabel;

    #[test]
    fn joined_corridors_become_one_walkable_strip() {
        let corridor = RoomTemplate::parse(
            &["WWWWW", "DFFFD", "WWWWW"],
            DesignLabel::Default,
            Pos { y: 1, x: 0 },
        )
        .unwrap();
        let spaces = [
            ConfigurationSpace::placed_at(&corridor, 0, Pos { y: -4, x: -2 }),
            ConfigurationSpace::placed_at(&corridor, 1, Pos { y: -4, x: 2 }),
        ];
        let used = resolve_doors(&spaces);
        let rooms: Vec<Room> = spaces
            .iter()
            .zip(&used)
            .map(|(space, used)| Room::from_placement(space, used, DesignLabel::Default))
            .collect();
        let grid = assemble(&rooms).unwrap();

        assert_eq!((grid.width(), grid.height()), (9, 3));
        let middle: Vec<LevelElement> =
            (0..9).map(|x| grid.get(Pos { y: 1, x }).unwrap()).collect();
        assert_eq!(middle[0], LevelElement::Wall);
        assert!(middle[1..8].iter().all(|element| *element == LevelElement::Floor));
        assert_eq!(middle[8], LevelElement::Wall);
    }

    #[test]
    fn skip_cells_stay_void() {
        let notch =
            RoomTemplate::parse(&["WD ", "WFW", "WWW"], DesignLabel::Default, Pos::ORIGIN).unwrap();
        let space = ConfigurationSpace::placed_at(&notch, 0, Pos { y: 3, x: 3 });
        let room = Room::from_placement(&space, &BTreeSet::new(), DesignLabel::Default);
        let grid = assemble(&[room]).unwrap();

        assert_eq!(grid.get(Pos { y: 0, x: 2 }), Some(LevelElement::Void));
        assert_eq!(grid.get(Pos { y: 0, x: 1 }), Some(LevelElement::Wall));
        assert_eq!(grid.get(Pos { y: 1, x: 1 }), Some(LevelElement::Floor));
    }

    #[test]
    fn no_rooms_no_grid() {
        assert!(assemble(&[]).is_none());
    }
}
