//! Plain-text rendering of generated levels.

use levelgen::{Level, LevelElement, Pos};

/// `#` wall, `.` floor, `S` start, `E` exit, blank for void.
pub fn render(level: &Level) -> String {
    let start = level.start_tile().pos();
    let mut out = String::with_capacity((level.width() + 1) * level.height());
    for y in 0..level.height() as i32 {
        let row: String = (0..level.width() as i32)
            .map(|x| {
                let pos = Pos { y, x };
                match level.tile_at(pos).map(|tile| tile.element()) {
                    _ if pos == start => 'S',
                    Some(LevelElement::Exit) => 'E',
                    Some(LevelElement::Floor) => '.',
                    Some(LevelElement::Wall) => '#',
                    Some(LevelElement::Void) | None => ' ',
                }
            })
            .collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

pub fn rows(level: &Level) -> Vec<String> {
    render(level).lines().map(str::to_string).collect()
}
