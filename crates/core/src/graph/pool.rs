//! Stored graphs loaded from a directory, used as a source of level topologies.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GraphError;
use crate::rng::GenRng;
use crate::types::LevelSize;

use super::Graph;

#[derive(Clone, Debug)]
pub struct GraphPool {
    graphs: Vec<Graph>,
}

impl GraphPool {
    pub fn from_graphs(graphs: Vec<Graph>) -> Option<Self> {
        if graphs.is_empty() { None } else { Some(Self { graphs }) }
    }

    /// Loads every `*.json` file of `dir` in file-name order.
    pub fn load_dir(dir: &Path) -> Result<Self, GraphError> {
        let entries = fs::read_dir(dir)
            .map_err(|source| GraphError::Io { path: dir.to_path_buf(), source })?;
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| GraphError::Io { path: dir.to_path_buf(), source })?;
            let path = entry.path();
            if path.extension().is_some_and(|extension| extension == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let graphs = paths.iter().map(|path| Graph::load(path)).collect::<Result<Vec<_>, _>>()?;
        Self::from_graphs(graphs).ok_or_else(|| GraphError::EmptyPool(dir.to_path_buf()))
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    pub fn pick(&self, rng: &mut GenRng) -> &Graph {
        &self.graphs[rng.below(self.graphs.len())]
    }

    /// First stored graph with exactly this many nodes and cycle-closing edges.
    pub fn find(&self, node_count: usize, cycle_edge_count: usize) -> Option<&Graph> {
        self.graphs.iter().find(|graph| {
            graph.node_count() == node_count && graph.cycle_edges().len() == cycle_edge_count
        })
    }

    /// Random graph whose node count fits `size`; any graph if none fits.
    pub fn pick_for_size(&self, size: LevelSize, rng: &mut GenRng) -> &Graph {
        let (min_nodes, max_nodes) = size.node_count_range();
        let fitting: Vec<&Graph> = self
            .graphs
            .iter()
            .filter(|graph| (min_nodes..=max_nodes).contains(&graph.node_count()))
            .collect();
        match rng.choose(&fitting) {
            Some(graph) => *graph,
            None => self.pick(rng),
        }
    }
}
