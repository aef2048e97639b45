use crate::search::{breadth_first, SearchLimits};
use crate::solver::GridSolver;
use crate::{Cell, Result, SearchResult, TerrainGrid};

/// Uninformed baseline. Finds the path with the fewest steps, whatever the terrain.
#[derive(Clone, Debug, Default)]
pub struct BfsSolver {
    pub limits: SearchLimits,
}

impl BfsSolver {
    pub fn new() -> BfsSolver {
        BfsSolver::default()
    }
}

impl GridSolver for BfsSolver {
    fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<SearchResult> {
        breadth_first(grid, start, goal, self.limits)
    }
}
