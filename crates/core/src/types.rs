use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::rng::GenRng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { y: 0, x: 0 };

    pub fn neighbors(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
        ]
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos { y: self.y + rhs.y, x: self.x + rhs.x }
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos { y: self.y - rhs.y, x: self.x - rhs.x }
    }
}

/// Kind of a single cell in an assembled level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelElement {
    Void,
    Floor,
    Wall,
    Exit,
}

impl LevelElement {
    pub fn is_accessible(self) -> bool {
        matches!(self, LevelElement::Floor | LevelElement::Exit)
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            LevelElement::Void => 0,
            LevelElement::Floor => 1,
            LevelElement::Wall => 2,
            LevelElement::Exit => 3,
        }
    }
}

/// Cosmetic theme of a level. Orthogonal to layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignLabel {
    #[default]
    Default,
    Fire,
    Forest,
    Ice,
    Temple,
    Dark,
    Rainbow,
}

impl DesignLabel {
    pub const ALL: [DesignLabel; 7] = [
        DesignLabel::Default,
        DesignLabel::Fire,
        DesignLabel::Forest,
        DesignLabel::Ice,
        DesignLabel::Temple,
        DesignLabel::Dark,
        DesignLabel::Rainbow,
    ];

    pub fn random(rng: &mut GenRng) -> Self {
        *rng.choose(&Self::ALL).unwrap_or(&DesignLabel::Default)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DesignLabel::Default => "default",
            DesignLabel::Fire => "fire",
            DesignLabel::Forest => "forest",
            DesignLabel::Ice => "ice",
            DesignLabel::Temple => "temple",
            DesignLabel::Dark => "dark",
            DesignLabel::Rainbow => "rainbow",
        }
    }

    pub(crate) fn code(self) -> u8 {
        Self::ALL.iter().position(|label| *label == self).unwrap_or(0) as u8
    }
}

impl fmt::Display for DesignLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested level size. Each generator interprets it on its own terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSize {
    Small,
    Medium,
    Large,
}

impl LevelSize {
    pub const ALL: [LevelSize; 3] = [LevelSize::Small, LevelSize::Medium, LevelSize::Large];

    pub fn random(rng: &mut GenRng) -> Self {
        *rng.choose(&Self::ALL).unwrap_or(&LevelSize::Medium)
    }

    /// Inclusive edge-length range used by the noise generator.
    pub fn dimension_range(self) -> (usize, usize) {
        match self {
            LevelSize::Small => (30, 39),
            LevelSize::Medium => (40, 59),
            LevelSize::Large => (60, 79),
        }
    }

    /// Inclusive room-count range used by the graph generator.
    pub fn node_count_range(self) -> (usize, usize) {
        match self {
            LevelSize::Small => (3, 6),
            LevelSize::Medium => (7, 12),
            LevelSize::Large => (13, 20),
        }
    }
}
