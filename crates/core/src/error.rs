//! Error types surfaced by graph/template loading and level generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;
use crate::types::Pos;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph has no nodes")]
    Empty,
    #[error("node id {0} appears more than once")]
    DuplicateNode(NodeId),
    #[error("node {node} lists unknown neighbour {neighbour}")]
    UnknownNeighbour { node: NodeId, neighbour: NodeId },
    #[error("node {0} lists itself as a neighbour")]
    SelfLoop(NodeId),
    #[error("cycle-closing edge ({0}, {1}) is not an edge of the graph")]
    UnknownCycleEdge(NodeId, NodeId),
    #[error("graph pool in {0} contains no graph files")]
    EmptyPool(PathBuf),
    #[error("failed to read graph file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {index} has an empty layout")]
    EmptyLayout { index: usize },
    #[error("template {index} row {row} has width {found}, expected {expected}")]
    RaggedLayout { index: usize, row: usize, expected: usize, found: usize },
    #[error("template {index} uses unknown cell character {found:?}")]
    UnknownCell { index: usize, found: char },
    #[error("template {index} anchor ({x}, {y}) lies outside its layout")]
    AnchorOutOfBounds { index: usize, x: i32, y: i32 },
    #[error("template {index} has no door cells")]
    NoDoors { index: usize },
    #[error("template library is empty")]
    EmptyLibrary,
    #[error("failed to read template file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why the configuration-space search gave up on a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoSolutionReason {
    /// Every branch was tried and failed.
    Exhausted,
    /// The configured step limit was reached.
    StepLimit,
    /// Remaining nodes have no placed neighbour, so the graph is disconnected.
    Disconnected,
    /// The template pool holds no usable variant.
    NoTemplates,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no placement found for the graph ({reason:?} after {steps} search steps)")]
pub struct NoSolution {
    pub reason: NoSolutionReason,
    pub steps: u64,
}

/// Failure of a single generation attempt; recovered by retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    NoSolution(#[from] NoSolution),
    #[error("start tile {start:?} cannot reach end tile {end:?}")]
    Unreachable { start: Pos, end: Pos },
    #[error("level has fewer than two accessible tiles")]
    TooFewFloorTiles,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("level generation failed after {attempts} attempts; last failure: {last}")]
    AttemptsExhausted { attempts: u32, last: AttemptFailure },
    #[error("no stored graph with {nodes} nodes and {cycle_edges} cycle edges")]
    NoMatchingGraph { nodes: usize, cycle_edges: usize },
    #[error("noise level must be at least 2x2, got {width}x{height}")]
    InvalidSize { width: usize, height: usize },
    #[error("noise field produced no region with two or more floor tiles")]
    EmptyRegion,
    #[error("generator has no graph pool configured")]
    NoGraphPool,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}
