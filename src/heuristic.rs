use crate::cell::Cell;

/// Estimates of the remaining cost from a cell to the goal.
///
/// Both distance heuristics assume a unit cost of 1 per step. They are admissible when
/// every cell a route can enter costs at least that much; on the default cost table the
/// zero-cost goal marker lets them overshoot by at most one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Sum of the row and column offsets, the exact step count on an open 4-grid.
    Manhattan,
    /// Always 0, turning A* into Dijkstra's algorithm.
    Zero,
}

impl Heuristic {
    pub fn estimate(&self, cell: &Cell, goal: &Cell) -> f64 {
        match self {
            Heuristic::Euclidean => cell.euclidean_distance(goal),
            Heuristic::Manhattan => cell.manhattan_distance(goal) as f64,
            Heuristic::Zero => 0.0,
        }
    }
}
