//! Assembled levels: a tile grid with a start tile and an end tile.
//!
//! Tiles carry their element kind, a texture reference and links to the
//! accessible orthogonal neighbours. Links are built once, after assembly, and
//! are what path queries and the reachability check walk.

mod grid;
mod pathing;
mod reachability;
mod texture;

use xxhash_rust::xxh3::xxh3_64;

use crate::rng::GenRng;
use crate::types::{DesignLabel, LevelElement, Pos};

pub use grid::ElementGrid;
pub use reachability::validate;
pub use texture::{DefaultTextures, TextureMapper};

/// Compass directions with north towards increasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pos: Pos,
    element: LevelElement,
    texture: String,
    connections: Vec<Pos>,
}

impl Tile {
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn element(&self) -> LevelElement {
        self.element
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Accessible orthogonal neighbours. Empty for inaccessible tiles.
    pub fn connections(&self) -> &[Pos] {
        &self.connections
    }

    pub fn is_accessible(&self) -> bool {
        self.element.is_accessible()
    }

    /// One or two directions towards `goal`, east/west first. Empty when both
    /// tiles share a position.
    pub fn direction_to(&self, goal: &Tile) -> Vec<Direction> {
        let mut directions = Vec::with_capacity(2);
        if self.pos.x < goal.pos.x {
            directions.push(Direction::E);
        } else if self.pos.x > goal.pos.x {
            directions.push(Direction::W);
        }
        if self.pos.y < goal.pos.y {
            directions.push(Direction::N);
        } else if self.pos.y > goal.pos.y {
            directions.push(Direction::S);
        }
        directions
    }
}

/// Receives every visible tile of a level in row-major order.
pub trait TilePainter {
    fn paint(&mut self, texture: &str, pos: Pos);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    width: usize,
    height: usize,
    design: DesignLabel,
    tiles: Vec<Tile>,
    start: usize,
    end: usize,
}

impl Level {
    /// Builds tiles and links from `grid`. `start` and `end` must lie inside it.
    pub(crate) fn build(
        grid: &ElementGrid,
        design: DesignLabel,
        start: Pos,
        end: Pos,
        textures: &dyn TextureMapper,
    ) -> Self {
        let width = grid.width();
        let tiles = grid
            .cells()
            .map(|(pos, element)| {
                let connections = if element.is_accessible() {
                    pos.neighbors().into_iter().filter(|next| grid.is_accessible(*next)).collect()
                } else {
                    Vec::new()
                };
                Tile { pos, element, texture: textures.texture_for(grid, pos, design), connections }
            })
            .collect();
        let index = |pos: Pos| pos.y as usize * width + pos.x as usize;
        Self { width, height: grid.height(), design, tiles, start: index(start), end: index(end) }
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

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        self.tiles.get(pos.y as usize * self.width + pos.x as usize)
    }

    pub fn start_tile(&self) -> &Tile {
        &self.tiles[self.start]
    }

    pub fn end_tile(&self) -> &Tile {
        &self.tiles[self.end]
    }

    /// Uniformly chosen accessible tile.
    pub fn random_floor_tile(&self, rng: &mut GenRng) -> Option<&Tile> {
        let accessible: Vec<&Tile> =
            self.tiles.iter().filter(|tile| tile.is_accessible()).collect();
        rng.choose(&accessible).copied()
    }

    /// Row-major.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter()
    }

    /// Hands every non-void tile to `painter`.
    pub fn draw(&self, painter: &mut impl TilePainter) {
        for tile in self.tiles.iter().filter(|tile| tile.element != LevelElement::Void) {
            painter.paint(&tile.texture, tile.pos);
        }
    }

    pub fn find_path(&self, from: Pos, to: Pos) -> Option<Vec<Pos>> {
        pathing::astar_path(self, from, to)
    }

    /// Stable byte encoding of the layout: dimensions, design, endpoints and
    /// one code per cell. Textures are not included.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(26 + self.tiles.len());
        bytes.extend_from_slice(&(self.width as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.height as u32).to_le_bytes());
        bytes.push(self.design.code());
        bytes.push(0);
        for pos in [self.start_tile().pos, self.end_tile().pos] {
            bytes.extend_from_slice(&pos.y.to_le_bytes());
            bytes.extend_from_slice(&pos.x.to_le_bytes());
        }
        bytes.extend(self.tiles.iter().map(|tile| tile.element.code()));
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// Picks a random start and a different random end among accessible cells.
pub(crate) fn pick_endpoints(grid: &ElementGrid, rng: &mut GenRng) -> Option<(Pos, Pos)> {
    let accessible = grid.accessible_positions();
    if accessible.len() < 2 {
        return None;
    }
    let start_index = rng.below(accessible.len());
    let mut end_index = rng.below(accessible.len() - 1);
    if end_index >= start_index {
        end_index += 1;
    }
    Some((accessible[start_index], accessible[end_index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttemptFailure;

    /// Two floor pockets split by a wall column, with an exit on the right.
    fn split_grid() -> ElementGrid {
        let mut grid = ElementGrid::new(5, 3, LevelElement::Wall);
        for y in 0..3 {
            grid.set(Pos { y, x: 0 }, LevelElement::Floor);
            grid.set(Pos { y, x: 1 }, LevelElement::Floor);
            grid.set(Pos { y, x: 3 }, LevelElement::Floor);
        }
        grid.set(Pos { y: 0, x: 4 }, LevelElement::Void);
        grid.set(Pos { y: 2, x: 4 }, LevelElement::Exit);
        grid
    }

    #[derive(Default)]
    struct RecordingPainter {
        painted: Vec<(String, Pos)>,
    }

    impl TilePainter for RecordingPainter {
        fn paint(&mut self, texture: &str, pos: Pos) {
            self.painted.push((texture.to_string(), pos));
        }
    }

    #[test]
    fn links_only_join_accessible_neighbours() {
        let level = Level::build(
            &split_grid(),
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );

        let corner = level.tile_at(Pos { y: 0, x: 0 }).unwrap();
        assert_eq!(corner.connections(), &[Pos { y: 0, x: 1 }, Pos { y: 1, x: 0 }]);
        assert!(level.tile_at(Pos { y: 1, x: 2 }).unwrap().connections().is_empty());
        assert_eq!(level.end_tile().element(), LevelElement::Exit);
        assert!(level.tile_at(Pos { y: 3, x: 0 }).is_none());
    }

    #[test]
    fn path_queries_respect_walls() {
        let level = Level::build(
            &split_grid(),
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );

        assert_eq!(
            level.find_path(Pos { y: 0, x: 3 }, Pos { y: 2, x: 4 }),
            Some(vec![
                Pos { y: 0, x: 3 },
                Pos { y: 1, x: 3 },
                Pos { y: 2, x: 3 },
                Pos { y: 2, x: 4 },
            ])
        );
        assert_eq!(level.find_path(Pos { y: 0, x: 0 }, Pos { y: 2, x: 4 }), None);
        assert_eq!(level.find_path(Pos { y: 1, x: 2 }, Pos { y: 1, x: 1 }), None);
    }

    #[test]
    fn validation_rejects_split_levels_and_accepts_joined_ones() {
        let mut grid = split_grid();
        let split = Level::build(
            &grid,
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );
        assert!(matches!(validate(&split), Err(AttemptFailure::Unreachable { .. })));

        grid.set(Pos { y: 1, x: 2 }, LevelElement::Floor);
        let joined = Level::build(
            &grid,
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );
        assert!(validate(&joined).is_ok());
        let path = joined.find_path(joined.start_tile().pos(), joined.end_tile().pos()).unwrap();
        assert!(path.len() > 1);
    }

    #[test]
    fn draw_skips_void_tiles() {
        let level = Level::build(
            &split_grid(),
            DesignLabel::Forest,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );
        let mut painter = RecordingPainter::default();
        level.draw(&mut painter);

        assert_eq!(painter.painted.len(), 14);
        assert!(painter.painted.iter().all(|(_, pos)| *pos != Pos { y: 0, x: 4 }));
        assert!(painter.painted[0].0.starts_with("textures/dungeon/forest/"));
    }

    #[test]
    fn direction_points_east_west_then_north_south() {
        let level = Level::build(
            &split_grid(),
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );
        let start = level.start_tile();
        let end = level.end_tile();

        assert_eq!(start.direction_to(end), vec![Direction::E, Direction::N]);
        assert_eq!(end.direction_to(start), vec![Direction::W, Direction::S]);
        assert!(start.direction_to(start).is_empty());
    }

    #[test]
    fn endpoints_are_distinct_accessible_cells() {
        let grid = split_grid();
        let mut rng = GenRng::seeded(4);
        for _ in 0..50 {
            let (start, end) = pick_endpoints(&grid, &mut rng).unwrap();
            assert_ne!(start, end);
            assert!(grid.is_accessible(start));
            assert!(grid.is_accessible(end));
        }

        let lonely = ElementGrid::new(2, 2, LevelElement::Wall);
        assert_eq!(pick_endpoints(&lonely, &mut rng), None);
    }

    #[test]
    fn fingerprint_tracks_layout_not_textures() {
        let grid = split_grid();
        let plain = Level::build(
            &grid,
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );

        struct Blank;
        impl TextureMapper for Blank {
            fn texture_for(&self, _: &ElementGrid, _: Pos, _: DesignLabel) -> String {
                String::new()
            }
        }
        let blank = Level::build(
            &grid,
            DesignLabel::Default,
            Pos { y: 0, x: 0 },
            Pos { y: 2, x: 4 },
            &Blank,
        );
        assert_eq!(plain.fingerprint(), blank.fingerprint());

        let moved = Level::build(
            &grid,
            DesignLabel::Default,
            Pos { y: 1, x: 0 },
            Pos { y: 2, x: 4 },
            &DefaultTextures,
        );
        assert_ne!(plain.canonical_bytes(), moved.canonical_bytes());
    }
}
