use core::fmt;

/// A coordinate on a [TerrainGrid](crate::TerrainGrid), addressed as `(row, col)`.
///
/// Cells order by row first and column second. The A* frontier relies on this
/// ordering to break ties between entries of equal priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// The 4-neighbourhood in the fixed order up, left, down, right. Neighbours
    /// that would have a negative coordinate are left out; upper bounds are
    /// the grid's business.
    pub fn neumann_neighborhood(&self) -> impl Iterator<Item = Cell> {
        let up = self.row.checked_sub(1).map(|row| Cell::new(row, self.col));
        let left = self.col.checked_sub(1).map(|col| Cell::new(self.row, col));
        let down = Some(Cell::new(self.row + 1, self.col));
        let right = Some(Cell::new(self.row, self.col + 1));
        [up, left, down, right].into_iter().flatten()
    }

    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn euclidean_distance(&self, other: &Cell) -> f64 {
        let dr = self.row.abs_diff(other.row) as f64;
        let dc = self.col.abs_diff(other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
