//! # terrain_pathfinding
//!
//! Shortest-cost paths on 4-connected terrain grids. Boards are read from text, one
//! character per cell, and every terrain kind carries a cost for stepping onto it.
//! Paths are found with [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) or with
//! breadth-first search as an uninformed baseline. Each search records the exact order
//! in which it finalized cells, which [frames] turns into the frames of an animation.
//! [Connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) are
//! computed when a board is loaded, so [GridSolver::get_path] can avoid flood-filling
//! when no path exists.
//!
//! ```
//! use terrain_pathfinding::{find_path, Algorithm, Heuristic, TerrainGrid};
//!
//! let grid = TerrainGrid::load("A.g\n..B").unwrap();
//! let result = find_path(&grid, Algorithm::AStar(Heuristic::Euclidean)).unwrap();
//! assert_eq!(result.path.len(), 3);
//! assert_eq!(result.cost(&grid).unwrap(), 2);
//! ```
mod cell;
mod error;
pub mod frames;
mod heuristic;
pub mod search;
pub mod solver;
mod terrain;
mod terrain_grid;

use log::info;
use std::fs;
use std::path::Path;

pub use crate::cell::Cell;
pub use crate::error::{Error, Malformed, Result};
pub use crate::heuristic::Heuristic;
pub use crate::search::{ExpansionPolicy, SearchLimits, SearchResult, SearchStatus};
pub use crate::solver::GridSolver;
pub use crate::terrain::{CostTable, Terrain};
pub use crate::terrain_grid::TerrainGrid;

use crate::solver::{astar::AstarSolver, bfs::BfsSolver, dijkstra::DijkstraSolver};

/// A cell has at most 4 neighbours.
pub const N_SMALLVEC_SIZE: usize = 4;

/// Search strategies selectable through [find_path].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    BreadthFirst,
    AStar(Heuristic),
    Dijkstra,
}

impl Default for Algorithm {
    fn default() -> Algorithm {
        Algorithm::AStar(Heuristic::default())
    }
}

impl Algorithm {
    /// A solver for this strategy with default settings.
    pub fn solver(&self) -> Box<dyn GridSolver> {
        match *self {
            Algorithm::BreadthFirst => Box::new(BfsSolver::new()),
            Algorithm::AStar(heuristic) => Box::new(AstarSolver::with_heuristic(heuristic)),
            Algorithm::Dijkstra => Box::new(DijkstraSolver::new()),
        }
    }
}

/// Reads and parses a board file with the default [CostTable].
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<TerrainGrid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = TerrainGrid::load(&text)?;
    info!(
        "Loaded {}x{} grid from {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(grid)
}

/// Searches from the grid's start marker to its goal marker.
pub fn find_path(grid: &TerrainGrid, algorithm: Algorithm) -> Result<SearchResult> {
    algorithm.solver().solve(grid)
}
