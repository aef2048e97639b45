use core::fmt;

use itertools::{iproduct, Itertools};
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::Cell;
use crate::error::{Error, Malformed, Result};
use crate::terrain::{CostTable, Terrain};
use crate::N_SMALLVEC_SIZE;

/// [TerrainGrid] holds the parsed board together with its [CostTable] and a [UnionFind] of
/// the 4-connected passable cells. It is read-only once loaded.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    cells: Vec<Terrain>,
    width: usize,
    height: usize,
    start: Cell,
    goal: Cell,
    costs: CostTable,
    components: UnionFind<usize>,
}

impl TerrainGrid {
    /// Parses a board using the default [CostTable].
    pub fn load(text: &str) -> Result<TerrainGrid> {
        Self::load_with_costs(text, CostTable::default())
    }

    /// Parses a board, one row per line. Rows must all have the same length and exactly
    /// one start (`A`) and one goal (`B`) marker must be present. Every passable symbol
    /// on the board needs a cost in `costs`. Blank lines at the end of the text are
    /// ignored; a blank line between rows is a ragged row.
    pub fn load_with_costs(text: &str, costs: CostTable) -> Result<TerrainGrid> {
        let lines = text.lines().collect_vec();
        let rows = lines.len() - lines.iter().rev().take_while(|l| l.is_empty()).count();
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;
        let mut start = None;
        let mut goal = None;
        for (row, line) in lines[..rows].iter().enumerate() {
            let mut found = 0;
            for (col, symbol) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                let terrain =
                    Terrain::from_symbol(symbol).ok_or(Error::UnknownTerrain { symbol, cell })?;
                if terrain.is_passable() && costs.cost(terrain).is_none() {
                    return Err(Error::UnknownTerrain { symbol, cell });
                }
                match terrain {
                    Terrain::Start => match start {
                        Some(first) => {
                            return Err(Malformed::DuplicateStart {
                                first,
                                second: cell,
                            }
                            .into())
                        }
                        None => start = Some(cell),
                    },
                    Terrain::Goal => match goal {
                        Some(first) => {
                            return Err(Malformed::DuplicateGoal {
                                first,
                                second: cell,
                            }
                            .into())
                        }
                        None => goal = Some(cell),
                    },
                    _ => {}
                }
                cells.push(terrain);
                found += 1;
            }
            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(Malformed::RaggedRow {
                    row,
                    expected,
                    found,
                }
                .into());
            }
            height += 1;
        }
        let width = width.ok_or(Malformed::Empty)?;
        let start = start.ok_or(Malformed::MissingStart)?;
        let goal = goal.ok_or(Malformed::MissingGoal)?;
        let mut grid = TerrainGrid {
            cells,
            width,
            height,
            start,
            goal,
            costs,
            components: UnionFind::new(0),
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn start(&self) -> Cell {
        self.start
    }
    pub fn goal(&self) -> Cell {
        self.goal
    }
    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    fn get_ix(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// The terrain at `cell`, or [None] outside the grid.
    pub fn terrain(&self, cell: Cell) -> Option<Terrain> {
        if self.in_bounds(cell) {
            Some(self.cells[self.get_ix(cell)])
        } else {
            None
        }
    }

    pub fn can_move_to(&self, cell: Cell) -> bool {
        self.terrain(cell).is_some_and(Terrain::is_passable)
    }

    /// Legal moves from `cell` in the order up, left, down, right.
    pub fn neighbors(&self, cell: Cell) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        cell.neumann_neighborhood()
            .filter(|&n| self.can_move_to(n))
            .collect()
    }

    /// Cost of stepping onto `cell`.
    pub fn cost_of(&self, cell: Cell) -> Result<u32> {
        let terrain = self.terrain(cell).ok_or(Error::OutOfBounds(cell))?;
        self.costs.cost(terrain).ok_or(Error::UnknownTerrain {
            symbol: terrain.symbol(),
            cell,
        })
    }

    /// Every cell in row-major order.
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> {
        iproduct!(0..self.height, 0..self.width).map(Cell::from)
    }

    /// Sum of the cost of entering every cell on `path`. Paths returned by the searches
    /// leave out the start, so its cost is never counted.
    pub fn path_cost(&self, path: &[Cell]) -> Result<u32> {
        path.iter().try_fold(0u32, |total, &cell| {
            total
                .checked_add(self.cost_of(cell)?)
                .ok_or(Error::CostOverflow(cell))
        })
    }

    /// Checks if start and goal are on the same connected component.
    pub fn reachable(&self, start: &Cell, goal: &Cell) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same connected component. Cells outside
    /// the grid and walls are unreachable from everything but themselves.
    pub fn unreachable(&self, start: &Cell, goal: &Cell) -> bool {
        if start == goal {
            return false;
        }
        if self.can_move_to(*start) && self.can_move_to(*goal) {
            !self
                .components
                .equiv(self.get_ix(*start), self.get_ix(*goal))
        } else {
            true
        }
    }

    /// All passable cells connected to `cell`, in row-major order.
    pub fn component(&self, cell: Cell) -> Vec<Cell> {
        if !self.can_move_to(cell) {
            return Vec::new();
        }
        self.all_cells()
            .filter(|other| self.can_move_to(*other) && self.reachable(&cell, other))
            .collect()
    }

    /// Links every passable cell with its passable right and lower neighbours.
    fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.width * self.height);
        for cell in self.all_cells().filter(|c| self.can_move_to(*c)) {
            let parent_ix = self.get_ix(cell);
            [
                Cell::new(cell.row + 1, cell.col),
                Cell::new(cell.row, cell.col + 1),
            ]
            .into_iter()
            .filter(|n| self.can_move_to(*n))
            .for_each(|n| {
                components.union(parent_ix, self.get_ix(n));
            });
        }
        self.components = components;
        info!(
            "Generated connected components for {}x{} grid",
            self.width, self.height
        );
    }
}

impl fmt::Display for TerrainGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            writeln!(f, "{}", row.iter().map(|t| t.symbol()).join(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_locates_markers() {
        let grid = TerrainGrid::load("..A\n.#.\nB..").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.start(), Cell::new(0, 2));
        assert_eq!(grid.goal(), Cell::new(2, 0));
        assert_eq!(grid.terrain(Cell::new(1, 1)), Some(Terrain::Wall));
        assert_eq!(grid.terrain(Cell::new(3, 0)), None);
    }

    #[test]
    fn load_accepts_crlf_and_trailing_newline() {
        let grid = TerrainGrid::load("A.\r\n.B\r\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.goal(), Cell::new(1, 1));
    }

    #[test]
    fn load_ignores_trailing_blank_lines() {
        let grid = TerrainGrid::load("A.\n.B\n\n\r\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.to_string(), "A.\n.B\n");
        assert!(matches!(
            TerrainGrid::load("\n\n"),
            Err(Error::MalformedGrid(Malformed::Empty))
        ));
    }

    #[test]
    fn load_rejects_malformed_boards() {
        let cases = [
            ("", Malformed::Empty),
            ("A..\n..\n..B", Malformed::RaggedRow { row: 1, expected: 3, found: 2 }),
            ("A.\n\n.B", Malformed::RaggedRow { row: 1, expected: 2, found: 0 }),
            ("...\n..B", Malformed::MissingStart),
            ("A..\n...", Malformed::MissingGoal),
            (
                "A.A\n..B",
                Malformed::DuplicateStart {
                    first: Cell::new(0, 0),
                    second: Cell::new(0, 2),
                },
            ),
            (
                "AB.\n..B",
                Malformed::DuplicateGoal {
                    first: Cell::new(0, 1),
                    second: Cell::new(1, 2),
                },
            ),
        ];
        for (text, expected) in cases {
            match TerrainGrid::load(text) {
                Err(Error::MalformedGrid(m)) => assert_eq!(m, expected, "{text:?}"),
                other => panic!("{text:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn load_rejects_unknown_symbols() {
        let err = TerrainGrid::load("A.\n?B").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownTerrain { symbol: '?', cell } if cell == Cell::new(1, 0)
        ));
    }

    #[test]
    fn load_rejects_uncosted_terrain() {
        let costs = CostTable::default().without(Terrain::Water);
        let err = TerrainGrid::load_with_costs("Aw\n.B", costs).unwrap_err();
        assert!(matches!(err, Error::UnknownTerrain { symbol: 'w', .. }));
        // Walls need no cost.
        assert!(TerrainGrid::load_with_costs("A#\n.B", costs).is_ok());
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        // A.#
        // .#.
        // ..B
        let grid = TerrainGrid::load("A.#\n.#.\n..B").unwrap();
        assert_eq!(
            grid.neighbors(Cell::new(0, 0)).to_vec(),
            vec![Cell::new(1, 0), Cell::new(0, 1)]
        );
        assert_eq!(grid.neighbors(Cell::new(0, 1)).to_vec(), vec![Cell::new(0, 0)]);
        assert_eq!(
            grid.neighbors(Cell::new(2, 1)).to_vec(),
            vec![Cell::new(2, 0), Cell::new(2, 2)]
        );
        assert_eq!(
            grid.neighbors(Cell::new(1, 2)).to_vec(),
            vec![Cell::new(2, 2)]
        );
    }

    #[test]
    fn cost_lookup() {
        let grid = TerrainGrid::load("Awm\nfgB").unwrap();
        assert_eq!(grid.cost_of(Cell::new(0, 0)).unwrap(), 0);
        assert_eq!(grid.cost_of(Cell::new(0, 1)).unwrap(), 100);
        assert_eq!(grid.cost_of(Cell::new(0, 2)).unwrap(), 50);
        assert_eq!(grid.cost_of(Cell::new(1, 0)).unwrap(), 10);
        assert_eq!(grid.cost_of(Cell::new(1, 1)).unwrap(), 5);
        assert!(matches!(
            grid.cost_of(Cell::new(5, 5)),
            Err(Error::OutOfBounds(_))
        ));
        assert_eq!(
            grid.path_cost(&[Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)])
                .unwrap(),
            15
        );
    }

    #[test]
    fn path_cost_reports_overflow() {
        let costs = CostTable::default().with_cost(Terrain::Water, u32::MAX);
        let grid = TerrainGrid::load_with_costs("AwwB", costs).unwrap();
        assert_eq!(grid.path_cost(&[Cell::new(0, 1)]).unwrap(), u32::MAX);
        assert!(matches!(
            grid.path_cost(&[Cell::new(0, 1), Cell::new(0, 2), Cell::new(0, 3)]),
            Err(Error::CostOverflow(c)) if c == Cell::new(0, 2)
        ));
    }

    #[test]
    fn wall_cost_is_unknown() {
        let grid = TerrainGrid::load("A#B").unwrap();
        assert!(matches!(
            grid.cost_of(Cell::new(0, 1)),
            Err(Error::UnknownTerrain { symbol: '#', .. })
        ));
    }

    #[test]
    fn all_cells_row_major() {
        let grid = TerrainGrid::load("A.\n..\n.B").unwrap();
        let cells: Vec<Cell> = grid.all_cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(0, 1));
        assert_eq!(cells[2], Cell::new(1, 0));
        assert_eq!(cells[5], Cell::new(2, 1));
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // A.#.
        // ..#B
        let grid = TerrainGrid::load("A.#.\n..#B").unwrap();
        assert!(grid.reachable(&Cell::new(0, 0), &Cell::new(1, 1)));
        assert!(grid.unreachable(&Cell::new(0, 0), &grid.goal()));
        assert!(grid.reachable(&Cell::new(0, 3), &grid.goal()));
        assert!(grid.unreachable(&Cell::new(0, 0), &Cell::new(0, 2)));
        assert_eq!(
            grid.component(grid.start()),
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1)
            ]
        );
        assert!(grid.component(Cell::new(0, 2)).is_empty());
    }

    #[test]
    fn display_prints_board() {
        let text = "A.#\nwmB\n";
        assert_eq!(TerrainGrid::load(text).unwrap().to_string(), text);
    }
}
