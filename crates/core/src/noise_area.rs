//! Organic levels carved from a coherent-noise field.

mod field;
mod generator;
mod regions;

pub use field::NoiseField;
pub use generator::{NoiseAreaGenerator, NoiseCarving};
pub use regions::{Region, connected_regions, floor_mask, largest_region};
