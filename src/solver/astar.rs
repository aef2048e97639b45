use crate::search::{astar, ExpansionPolicy, SearchLimits};
use crate::solver::GridSolver;
use crate::{Cell, Heuristic, Result, SearchResult, TerrainGrid};

#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    /// Scales the heuristic. Values above 1 give weighted A*, which expands fewer cells
    /// but may return a more expensive path.
    pub heuristic_factor: f64,
    pub policy: ExpansionPolicy,
    pub limits: SearchLimits,
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver::with_heuristic(Heuristic::Euclidean)
    }

    pub fn with_heuristic(heuristic: Heuristic) -> AstarSolver {
        AstarSolver {
            heuristic,
            heuristic_factor: 1.0,
            policy: ExpansionPolicy::Relaxing,
            limits: SearchLimits::unlimited(),
        }
    }

    /// The heuristic times the heuristic factor.
    pub fn heuristic(&self, cell: &Cell, goal: &Cell) -> f64 {
        self.heuristic.estimate(cell, goal) * self.heuristic_factor
    }
}

impl GridSolver for AstarSolver {
    fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<SearchResult> {
        astar(
            grid,
            start,
            goal,
            |cell| self.heuristic(cell, &goal),
            self.policy,
            self.limits,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::bfs::BfsSolver;
    use crate::{CostTable, SearchStatus};

    fn uniform(text: &str) -> TerrainGrid {
        TerrainGrid::load_with_costs(text, CostTable::uniform()).unwrap()
    }

    /// Asserts that the optimal 4 step solution is found.
    #[test]
    fn solve_simple_problem() {
        // A..
        // ...
        // ..B
        let grid = uniform("A..\n...\n..B");
        let result = AstarSolver::new().solve(&grid).unwrap();
        assert_eq!(result.status, SearchStatus::Found);
        assert_eq!(result.path.len(), 4);
        assert_eq!(result.path.last(), Some(&Cell::new(2, 2)));
        assert!(!result.path.contains(&grid.start()));
        assert!(
            result.path[0] == Cell::new(0, 1) || result.path[0] == Cell::new(1, 0),
            "{:?}",
            result.path
        );
        assert_eq!(result.cost(&grid).unwrap(), 4);
    }

    /// Same board with the centre blocked: the route goes around the wall.
    #[test]
    fn routes_around_centre_wall() {
        // A..
        // .#.
        // ..B
        let grid = uniform("A..\n.#.\n..B");
        let result = AstarSolver::new().solve(&grid).unwrap();
        assert_eq!(result.path.len(), 4);
        assert!(!result.path.contains(&Cell::new(1, 1)));
        assert_eq!(result.cost(&grid).unwrap(), 4);
        for pair in result.path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(&pair[1]), 1);
        }
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = uniform("A..\n...\n..B");
        let start = grid.start();
        let result = AstarSolver::new().search(&grid, start, start).unwrap();
        assert!(result.is_found());
        assert!(result.path.is_empty());
        assert_eq!(result.visited_order, vec![start]);
        assert_eq!(result.cost(&grid).unwrap(), 0);
    }

    /// The road is the only route costing less than 9; every detour over grass or the
    /// mountain costs at least four more.
    #[test]
    fn prefers_cheap_terrain() {
        // Aggg.
        // rgmgg
        // rrrrB
        let grid = TerrainGrid::load("Aggg.\nrgmgg\nrrrrB").unwrap();
        let result = AstarSolver::new().solve(&grid).unwrap();
        assert_eq!(
            result.path,
            vec![
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(2, 1),
                Cell::new(2, 2),
                Cell::new(2, 3),
                Cell::new(2, 4)
            ]
        );
        assert_eq!(result.cost(&grid).unwrap(), 5);
        let bfs = BfsSolver::new().solve(&grid).unwrap();
        assert!(result.cost(&grid).unwrap() <= bfs.cost(&grid).unwrap());
    }

    #[test]
    fn goal_walled_in() {
        // A..
        // .##
        // .#B
        let grid = uniform("A..\n.##\n.#B");
        let result = AstarSolver::new().solve(&grid).unwrap();
        assert_eq!(result.status, SearchStatus::Unreachable);
        assert!(result.path.is_empty());
        let mut visited = result.visited_order.clone();
        visited.sort();
        assert_eq!(visited, grid.component(grid.start()));
        assert_eq!(
            AstarSolver::new()
                .get_path(&grid, grid.start(), grid.goal())
                .unwrap(),
            None
        );
    }

    #[test]
    fn deterministic() {
        let grid = TerrainGrid::load("A.gf.\n.m.w.\n..#..\nr...B").unwrap();
        let solver = AstarSolver::new();
        let first = solver.solve(&grid).unwrap();
        let second = solver.solve(&grid).unwrap();
        assert_eq!(first, second);
    }

    /// A weighted heuristic still finds a path, and never a cheaper one than plain A*.
    #[test]
    fn heuristic_factor() {
        let grid = TerrainGrid::load_with_costs(
            "A....\n.###.\n.#...\n...#B",
            CostTable::default().with_cost(crate::Terrain::Goal, 1),
        )
        .unwrap();
        let plain = AstarSolver::new().solve(&grid).unwrap();
        let mut weighted = AstarSolver::new();
        weighted.heuristic_factor = 2.0;
        let weighted = weighted.solve(&grid).unwrap();
        assert!(weighted.is_found());
        assert!(weighted.cost(&grid).unwrap() >= plain.cost(&grid).unwrap());
    }
}
