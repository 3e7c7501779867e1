//! Room-graph level generation.
//!
//! A connectivity graph is split into chains, the chains are ordered into a
//! placement sequence, and a backtracking search pins one rotated template per
//! node so that neighbours meet door-to-door without overlapping. Coincident
//! doors are then resolved and the rooms merged into a single element grid.

mod assembler;
mod chains;
mod doors;
mod generator;
mod library;
mod room;
mod sequence;
mod solver;
mod space;
mod template;

pub use assembler::assemble;
pub use chains::{Chain, split_in_chains};
pub use doors::resolve_doors;
pub use generator::RoomGenerator;
pub use library::TemplateLibrary;
pub use room::Room;
pub use sequence::solve_sequence;
pub use solver::solve;
pub use space::{Bounds, ConfigurationSpace};
pub use template::{RoomElement, RoomTemplate};
