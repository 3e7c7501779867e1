//! Graph-driven level generation with bounded whole-pipeline retries.

use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{AttemptFailure, GenerationError};
use crate::graph::{Graph, GraphPool};
use crate::level::{DefaultTextures, Level, TextureMapper, pick_endpoints, validate};
use crate::rng::GenRng;
use crate::types::{DesignLabel, LevelElement, LevelSize};

use super::assembler::assemble;
use super::chains::split_in_chains;
use super::doors::resolve_doors;
use super::library::TemplateLibrary;
use super::room::Room;
use super::sequence::solve_sequence;
use super::solver::solve;
use super::template::RoomTemplate;

pub struct RoomGenerator {
    variants: Vec<RoomTemplate>,
    pool: Option<GraphPool>,
    config: GeneratorConfig,
    textures: Box<dyn TextureMapper>,
}

impl RoomGenerator {
    pub fn new(library: &TemplateLibrary, config: GeneratorConfig) -> Self {
        Self {
            variants: library.variants(),
            pool: None,
            config,
            textures: Box::new(DefaultTextures),
        }
    }

    pub fn with_graph_pool(mut self, pool: GraphPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_textures(mut self, textures: impl TextureMapper + 'static) -> Self {
        self.textures = Box::new(textures);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn graph_pool(&self) -> Option<&GraphPool> {
        self.pool.as_ref()
    }

    /// Generates a level for a fixed graph; each retry reuses the graph with
    /// fresh randomness.
    pub fn generate_from_graph(
        &self,
        graph: &Graph,
        design: DesignLabel,
        rng: &mut GenRng,
    ) -> Result<Level, GenerationError> {
        info!(
            seed = rng.seed(),
            nodes = graph.node_count(),
            %design,
            "generating level from graph"
        );
        self.retry(rng, |generator, rng| Ok(generator.attempt(graph, design, rng)))
    }

    /// Draws a fresh graph from the pool for every attempt.
    pub fn generate_from_pool(
        &self,
        design: DesignLabel,
        rng: &mut GenRng,
    ) -> Result<Level, GenerationError> {
        let pool = self.pool.as_ref().ok_or(GenerationError::NoGraphPool)?;
        info!(seed = rng.seed(), graphs = pool.len(), %design, "generating level from graph pool");
        self.retry(rng, |generator, rng| {
            let graph = pool.pick(rng);
            Ok(generator.attempt(graph, design, rng))
        })
    }

    /// Uses the first pooled graph with exactly these node and cycle-edge counts.
    pub fn generate_with_counts(
        &self,
        node_count: usize,
        cycle_edge_count: usize,
        design: DesignLabel,
        rng: &mut GenRng,
    ) -> Result<Level, GenerationError> {
        let pool = self.pool.as_ref().ok_or(GenerationError::NoGraphPool)?;
        let graph = pool.find(node_count, cycle_edge_count).ok_or(
            GenerationError::NoMatchingGraph { nodes: node_count, cycle_edges: cycle_edge_count },
        )?;
        self.generate_from_graph(graph, design, rng)
    }

    /// Pooled graphs sized for `size` when a pool is configured, otherwise a
    /// new random graph per attempt with a size-appropriate room count.
    pub fn generate(
        &self,
        design: DesignLabel,
        size: LevelSize,
        rng: &mut GenRng,
    ) -> Result<Level, GenerationError> {
        info!(seed = rng.seed(), ?size, %design, "generating level");
        match &self.pool {
            Some(pool) => self.retry(rng, |generator, rng| {
                let graph = pool.pick_for_size(size, rng);
                Ok(generator.attempt(graph, design, rng))
            }),
            None => self.retry(rng, |generator, rng| {
                let (min_nodes, max_nodes) = size.node_count_range();
                let node_count = rng.between(min_nodes, max_nodes);
                let extra_edges = rng.between(1, 2);
                let graph = Graph::random(node_count, extra_edges, rng)?;
                Ok(generator.attempt(&graph, design, rng))
            }),
        }
    }

    /// Runs `attempt` until it yields a level or `max_attempts` is used up.
    /// Errors from the outer `Result` are not retried.
    fn retry(
        &self,
        rng: &mut GenRng,
        mut attempt: impl FnMut(
            &Self,
            &mut GenRng,
        ) -> Result<Result<Level, AttemptFailure>, GenerationError>,
    ) -> Result<Level, GenerationError> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt_number = 1;
        loop {
            match attempt(self, rng)? {
                Ok(level) => {
                    info!(
                        attempt = attempt_number,
                        width = level.width(),
                        height = level.height(),
                        "level generated"
                    );
                    return Ok(level);
                }
                Err(failure) if attempt_number >= attempts => {
                    return Err(GenerationError::AttemptsExhausted { attempts, last: failure });
                }
                Err(failure) => {
                    warn!(
                        attempt = attempt_number,
                        %failure,
                        "generation attempt failed; retrying"
                    );
                    attempt_number += 1;
                }
            }
        }
    }

    /// One pass of the full pipeline. Nothing is shared between attempts.
    fn attempt(
        &self,
        graph: &Graph,
        design: DesignLabel,
        rng: &mut GenRng,
    ) -> Result<Level, AttemptFailure> {
        let rooms = self.place_rooms(graph, design, rng)?;
        let mut grid = assemble(&rooms).ok_or(AttemptFailure::TooFewFloorTiles)?;
        let (start, end) = pick_endpoints(&grid, rng).ok_or(AttemptFailure::TooFewFloorTiles)?;
        grid.set(end, LevelElement::Exit);

        let level = Level::build(&grid, design, start, end, self.textures.as_ref());
        validate(&level)?;
        Ok(level)
    }

    /// Decomposes, sequences and solves `graph`, then resolves doors into
    /// finalized rooms in placement order.
    pub fn place_rooms(
        &self,
        graph: &Graph,
        design: DesignLabel,
        rng: &mut GenRng,
    ) -> Result<Vec<Room>, AttemptFailure> {
        let sequence = solve_sequence(&split_in_chains(graph), graph);
        let spaces = solve(graph, &sequence, &self.variants, &self.config, rng)?;
        let used_doors = resolve_doors(&spaces);
        Ok(spaces
            .iter()
            .zip(&used_doors)
            .map(|(space, used)| Room::from_placement(space, used, design))
            .collect())
    }
}
