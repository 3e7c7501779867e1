//! Noise-path level generator: field, band mask, largest region, tiles.

use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::level::{DefaultTextures, ElementGrid, Level, TextureMapper, pick_endpoints};
use crate::rng::GenRng;
use crate::types::{DesignLabel, LevelElement, LevelSize};

use super::field::NoiseField;
use super::regions::{Region, connected_regions, floor_mask, largest_region};

/// Intermediate products of one carving pass.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseCarving {
    pub field: NoiseField,
    pub mask: Vec<bool>,
    /// Largest connected floor region; `None` when the mask has no floor.
    pub region: Option<Region>,
}

pub struct NoiseAreaGenerator {
    config: GeneratorConfig,
    textures: Box<dyn TextureMapper>,
}

impl NoiseAreaGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config, textures: Box::new(DefaultTextures) }
    }

    pub fn with_textures(mut self, textures: impl TextureMapper + 'static) -> Self {
        self.textures = Box::new(textures);
        self
    }

    /// Random dimensions from the configured size range.
    pub fn generate(&self, rng: &mut GenRng) -> Result<Level, GenerationError> {
        let noise = &self.config.noise;
        let (min_size, max_size) =
            (noise.min_size.min(noise.max_size), noise.min_size.max(noise.max_size));
        let width = rng.between(min_size, max_size);
        let height = rng.between(min_size, max_size);
        self.generate_sized(width, height, rng)
    }

    pub fn generate_for_size(
        &self,
        size: LevelSize,
        rng: &mut GenRng,
    ) -> Result<Level, GenerationError> {
        let (min_size, max_size) = size.dimension_range();
        let width = rng.between(min_size, max_size);
        let height = rng.between(min_size, max_size);
        self.generate_sized(width, height, rng)
    }

    pub fn generate_seeded(
        &self,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<Level, GenerationError> {
        self.generate_sized(width, height, &mut GenRng::seeded(seed))
    }

    /// Always a level with a distinct start and exit inside one connected
    /// region, or an error. A field whose largest region has fewer than two
    /// cells is re-rolled up to `max_attempts` times.
    pub fn generate_sized(
        &self,
        width: usize,
        height: usize,
        rng: &mut GenRng,
    ) -> Result<Level, GenerationError> {
        if width < 2 || height < 2 {
            return Err(GenerationError::InvalidSize { width, height });
        }
        info!(seed = rng.seed(), width, height, "generating noise level");

        let attempts = self.config.max_attempts.max(1);
        for attempt in 1..=attempts {
            let carving = self.carve(width, height, rng);
            let Some(region) = carving.region.filter(|region| region.len() >= 2) else {
                warn!(attempt, "noise field has no usable region; retrying");
                continue;
            };

            let designs = &DesignLabel::ALL[..DesignLabel::ALL.len() - 1];
            let design = rng.choose(designs).copied().unwrap_or_default();

            let mut grid = ElementGrid::new(width, height, LevelElement::Void);
            for &pos in &region.cells {
                grid.set(pos, LevelElement::Floor);
            }
            let (start, end) = pick_endpoints(&grid, rng).ok_or(GenerationError::EmptyRegion)?;
            grid.set(end, LevelElement::Exit);
            info!(attempt, floor_tiles = region.len(), %design, "noise level generated");
            return Ok(Level::build(&grid, design, start, end, self.textures.as_ref()));
        }
        Err(GenerationError::EmptyRegion)
    }

    /// One field, its floor mask, and the largest region of that mask.
    pub fn carve(&self, width: usize, height: usize, rng: &mut GenRng) -> NoiseCarving {
        let field = NoiseField::generate(width, height, &self.config.noise.octaves, rng);
        let mask = floor_mask(&field, &self.config.noise);
        let region = largest_region(&connected_regions(&mask, width, height)).cloned();
        NoiseCarving { field, mask, region }
    }
}
