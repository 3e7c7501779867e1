pub mod config;
pub mod error;
pub mod graph;
pub mod level;
pub mod noise_area;
pub mod rng;
pub mod roomgraph;
pub mod types;

pub use config::{GeneratorConfig, NoiseConfig};
pub use error::{
    AttemptFailure, GenerationError, GraphError, NoSolution, NoSolutionReason, TemplateError,
};
pub use graph::{Graph, GraphPool, NodeId};
pub use level::{DefaultTextures, Direction, ElementGrid, Level, TextureMapper, Tile, TilePainter};
pub use noise_area::NoiseAreaGenerator;
pub use rng::GenRng;
pub use roomgraph::{RoomGenerator, RoomTemplate, TemplateLibrary};
pub use types::*;
