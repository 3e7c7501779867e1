//! Averaged multi-octave Perlin field normalized to `[0, 1]`.

use noise::{NoiseFn, Perlin};

use crate::rng::GenRng;
use crate::types::Pos;

/// Offsets keep samples off the integer lattice, where Perlin noise is zero.
const OFFSET_RANGE: f64 = 256.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
}

impl NoiseField {
    /// Each entry of `octaves` is the number of lattice cells spanning the
    /// field for one Perlin layer; layers are averaged. An empty list yields a
    /// flat field of `0.5`.
    pub fn generate(width: usize, height: usize, octaves: &[u32], rng: &mut GenRng) -> Self {
        let layers: Vec<(Perlin, f64, f64, f64)> = octaves
            .iter()
            .map(|&cells| {
                let perlin = Perlin::new(rng.next_u32());
                let offset_x = unit(rng) * OFFSET_RANGE;
                let offset_y = unit(rng) * OFFSET_RANGE;
                (perlin, f64::from(cells.max(1)), offset_x, offset_y)
            })
            .collect();

        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                if layers.is_empty() {
                    values.push(0.5);
                    continue;
                }
                let sum: f64 = layers
                    .iter()
                    .map(|(perlin, cells, offset_x, offset_y)| {
                        let sample_x = x as f64 / width as f64 * cells + offset_x;
                        let sample_y = y as f64 / height as f64 * cells + offset_y;
                        perlin.get([sample_x, sample_y])
                    })
                    .sum();
                let average = sum / layers.len() as f64;
                values.push(((average + 1.0) / 2.0).clamp(0.0, 1.0));
            }
        }
        Self { width, height, values }
    }

    pub fn value_at(&self, pos: Pos) -> Option<f64> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        self.values.get(pos.y as usize * self.width + pos.x as usize).copied()
    }
}

fn unit(rng: &mut GenRng) -> f64 {
    f64::from(rng.next_u32()) / f64::from(u32::MAX)
}
