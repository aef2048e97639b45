use crate::search::{astar, ExpansionPolicy, SearchLimits};
use crate::solver::GridSolver;
use crate::{Cell, Result, SearchResult, TerrainGrid};

/// A* without a heuristic. Always optimal, at the price of expanding every cell cheaper
/// than the goal.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver {
    pub limits: SearchLimits,
}

impl DijkstraSolver {
    pub fn new() -> DijkstraSolver {
        DijkstraSolver::default()
    }
}

impl GridSolver for DijkstraSolver {
    fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<SearchResult> {
        astar(
            grid,
            start,
            goal,
            |_| 0.0,
            ExpansionPolicy::Relaxing,
            self.limits,
        )
    }
}
