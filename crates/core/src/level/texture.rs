//! Seam between level elements and the texture paths a renderer draws.

use crate::types::{DesignLabel, LevelElement, Pos};

use super::grid::ElementGrid;

/// Maps a cell to a texture reference. Implementations may inspect the
/// surrounding grid, for example to pick wall edges.
pub trait TextureMapper: Send + Sync {
    fn texture_for(&self, grid: &ElementGrid, pos: Pos, design: DesignLabel) -> String;
}

/// `textures/dungeon/<design>/<kind>/<variant>.png`.
///
/// Wall variants name the sides that face an accessible cell, top, right,
/// bottom and left in that order (`wall_tb` for a wall between two floors).
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTextures;

impl TextureMapper for DefaultTextures {
    fn texture_for(&self, grid: &ElementGrid, pos: Pos, design: DesignLabel) -> String {
        let (kind, variant) = match grid.get(pos).unwrap_or(LevelElement::Void) {
            LevelElement::Void => ("void", "empty".to_string()),
            LevelElement::Floor => ("floor", "floor_1".to_string()),
            LevelElement::Exit => ("floor", "floor_ladder".to_string()),
            LevelElement::Wall => ("wall", wall_variant(grid, pos)),
        };
        format!("textures/dungeon/{design}/{kind}/{variant}.png")
    }
}

fn wall_variant(grid: &ElementGrid, pos: Pos) -> String {
    let sides: String = pos
        .neighbors()
        .into_iter()
        .zip(['t', 'r', 'b', 'l'])
        .filter(|(neighbour, _)| grid.is_accessible(*neighbour))
        .map(|(_, side)| side)
        .collect();
    if sides.is_empty() { "wall_outer".to_string() } else { format!("wall_{sides}") }
}
