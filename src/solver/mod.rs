use crate::search::check_endpoints;
use crate::{Cell, Result, SearchResult, TerrainGrid};

pub mod astar;
pub mod bfs;
pub mod dijkstra;

/// A search strategy over a [TerrainGrid]. Implementors only provide [search](Self::search);
/// the remaining methods build on it.
pub trait GridSolver {
    /// Runs a full search from `start` to `goal`, recording the visit order.
    fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<SearchResult>;

    /// Searches between the start and goal markers of the grid.
    fn solve(&self, grid: &TerrainGrid) -> Result<SearchResult> {
        self.search(grid, grid.start(), grid.goal())
    }

    /// Computes only the path from start to goal. Returns [None] without searching when the
    /// connected components show the goal cannot be reached, and also when the search ends
    /// without finding it. Endpoints outside the grid are an error, as for [search](Self::search).
    fn get_path(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<Option<Vec<Cell>>> {
        check_endpoints(grid, start, goal)?;
        // Check if start and goal are on the same connected component.
        if grid.unreachable(&start, &goal) {
            return Ok(None);
        }
        let result = self.search(grid, start, goal)?;
        Ok(result.is_found().then_some(result.path))
    }

    /// Sums the terrain cost along `path`.
    fn get_path_cost(&self, grid: &TerrainGrid, path: &[Cell]) -> Result<u32> {
        grid.path_cost(path)
    }
}
