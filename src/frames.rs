//! Turns a [SearchResult] into the frame sequence an animation is made of. A frame is a
//! copy of the board with every cell tagged by the state the search had put it in; the
//! grid itself is never touched. Painting the frames is left to the caller.
use core::fmt;

use itertools::Itertools;

use crate::{Cell, SearchResult, Terrain, TerrainGrid};

/// State of a cell in a [Frame].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Open,
    /// Finalized by the search.
    Closed,
    /// Part of the final route.
    Path,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    cells: Vec<(Terrain, Mark)>,
}

impl Frame {
    /// The board with nothing marked.
    pub fn blank(grid: &TerrainGrid) -> Frame {
        Frame {
            width: grid.width(),
            cells: grid
                .all_cells()
                .filter_map(|c| grid.terrain(c))
                .map(|t| (t, Mark::Open))
                .collect(),
        }
    }

    /// The board with `path` highlighted.
    pub fn solution(grid: &TerrainGrid, path: &[Cell]) -> Frame {
        let mut frame = Frame::blank(grid);
        frame.mark_all(path, Mark::Path);
        frame
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.cells.len() / self.width
        }
    }

    pub fn get(&self, cell: Cell) -> Option<(Terrain, Mark)> {
        if cell.col >= self.width {
            return None;
        }
        self.cells.get(cell.row * self.width + cell.col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(Terrain, Mark)]> {
        self.cells.chunks(self.width.max(1))
    }

    fn mark(&mut self, cell: Cell, mark: Mark) {
        if cell.col < self.width {
            if let Some(entry) = self.cells.get_mut(cell.row * self.width + cell.col) {
                entry.1 = mark;
            }
        }
    }

    fn mark_all(&mut self, cells: &[Cell], mark: Mark) {
        for &cell in cells {
            self.mark(cell, mark);
        }
    }
}

/// Closed cells print as `x` and path cells as `O`. Start and goal markers are always
/// shown.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            let line = row
                .iter()
                .map(|&(terrain, mark)| match mark {
                    _ if terrain.is_marker() => terrain.symbol(),
                    Mark::Open => terrain.symbol(),
                    Mark::Closed => 'x',
                    Mark::Path => 'O',
                })
                .join("");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Iterator returned by [animation_frames].
pub struct Frames<'a> {
    result: &'a SearchResult,
    current: Frame,
    next: usize,
    path_shown: bool,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if let Some(&cell) = self.result.visited_order.get(self.next) {
            self.next += 1;
            self.current.mark(cell, Mark::Closed);
            return Some(self.current.clone());
        }
        if self.result.is_found() && !self.path_shown {
            self.path_shown = true;
            self.current.mark_all(&self.result.path, Mark::Path);
            return Some(self.current.clone());
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let mut left = self.result.visited_order.len() - self.next;
        if self.result.is_found() && !self.path_shown {
            left += 1;
        }
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// One frame per prefix of the visit order, each adding the next finalized cell, then a
/// last frame with the path highlighted if the goal was found.
pub fn animation_frames<'a>(grid: &TerrainGrid, result: &'a SearchResult) -> Frames<'a> {
    Frames {
        result,
        current: Frame::blank(grid),
        next: 0,
        path_shown: false,
    }
}
