//! Thresholding and 4-connected region extraction.

use std::collections::VecDeque;

use crate::config::NoiseConfig;
use crate::types::Pos;

use super::field::NoiseField;

/// A 4-connected set of floor cells, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub cells: Vec<Pos>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.binary_search(&pos).is_ok()
    }
}

/// Row-major floor flags: a cell is floor when its value lies in the band.
pub fn floor_mask(field: &NoiseField, config: &NoiseConfig) -> Vec<bool> {
    field.values.iter().map(|&value| config.is_floor(value)).collect()
}

/// Regions in order of their first (row-major) cell.
pub fn connected_regions(mask: &[bool], width: usize, height: usize) -> Vec<Region> {
    let mut seen = vec![false; mask.len()];
    let mut regions = Vec::new();

    for start in 0..mask.len().min(width * height) {
        if !mask[start] || seen[start] {
            continue;
        }
        seen[start] = true;
        let mut cells = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(index) = queue.pop_front() {
            let pos = Pos { y: (index / width) as i32, x: (index % width) as i32 };
            cells.push(pos);
            for next in pos.neighbors() {
                if next.x < 0 || next.y < 0 || next.x as usize >= width || next.y as usize >= height
                {
                    continue;
                }
                let next_index = next.y as usize * width + next.x as usize;
                if mask[next_index] && !seen[next_index] {
                    seen[next_index] = true;
                    queue.push_back(next_index);
                }
            }
        }
        cells.sort_unstable();
        regions.push(Region { cells });
    }
    regions
}

/// Largest region; the earliest one wins ties.
pub fn largest_region(regions: &[Region]) -> Option<&Region> {
    let mut best: Option<&Region> = None;
    for region in regions {
        if best.is_none_or(|current| region.len() > current.len()) {
            best = Some(region);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> (Vec<bool>, usize, usize) {
        let width = rows[0].len();
        let mask = rows.iter().flat_map(|row| row.chars().map(|cell| cell == '#')).collect();
        (mask, width, rows.len())
    }

    #[test]
    fn diagonal_cells_are_separate_regions() {
        let (mask, width, height) = mask_from(&["#.", ".#"]);
        let regions = connected_regions(&mask, width, height);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].cells, vec![Pos { y: 0, x: 0 }]);
    }

    #[test]
    fn largest_region_is_picked_by_size() {
        let (mask, width, height) = mask_from(&["##..#", "....#", "###.."]);
        let regions = connected_regions(&mask, width, height);
        assert_eq!(regions.len(), 3);

        let largest = largest_region(&regions).unwrap();
        assert_eq!(largest.len(), 3);
        assert!(largest.contains(Pos { y: 2, x: 1 }));
        assert!(!largest.contains(Pos { y: 0, x: 4 }));
    }

    #[test]
    fn ties_keep_the_earliest_region() {
        let (mask, width, height) = mask_from(&["##.##"]);
        let regions = connected_regions(&mask, width, height);
        assert_eq!(largest_region(&regions), Some(&regions[0]));
        assert_eq!(largest_region(&[]), None);
    }

    #[test]
    fn band_thresholds_the_field() {
        let field = NoiseField { width: 3, height: 1, values: vec![0.2, 0.5, 0.9] };
        assert_eq!(floor_mask(&field, &NoiseConfig::default()), vec![false, true, false]);
    }
}
